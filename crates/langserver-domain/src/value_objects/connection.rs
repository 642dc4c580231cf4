//! Connection identity and lifecycle states

use std::fmt;

/// Process-unique connection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a raw identifier
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Connection lifecycle
///
/// `Established → Serving → {ClosedNormally | ClosedOnError}`. Only
/// `Serving` dispatches requests and the terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    /// Transport bound, read loop not started yet
    Established = 0,
    /// Requests are being read and dispatched
    Serving = 1,
    /// Peer closed the stream cleanly
    ClosedNormally = 2,
    /// Protocol or transport failure ended the connection
    ClosedOnError = 3,
}

impl ConnectionState {
    /// Whether the state is one of the two terminal states
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ClosedNormally | Self::ClosedOnError)
    }

    /// Whether moving to `next` is a legal transition
    pub fn can_advance_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Established, Self::Serving) => true,
            (Self::Established | Self::Serving, Self::ClosedNormally | Self::ClosedOnError) => {
                true
            }
            _ => false,
        }
    }

    /// Decode the `repr(u8)` discriminant
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Established),
            1 => Some(Self::Serving),
            2 => Some(Self::ClosedNormally),
            3 => Some(Self::ClosedOnError),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Established => "established",
            Self::Serving => "serving",
            Self::ClosedNormally => "closed-normally",
            Self::ClosedOnError => "closed-on-error",
        };
        f.write_str(name)
    }
}
