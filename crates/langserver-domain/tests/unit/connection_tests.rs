//! Connection state machine tests

use langserver_domain::{ConnectionId, ConnectionState};

#[test]
fn test_forward_transitions_are_legal() {
    use ConnectionState::*;
    assert!(Established.can_advance_to(Serving));
    assert!(Serving.can_advance_to(ClosedNormally));
    assert!(Serving.can_advance_to(ClosedOnError));
    assert!(Established.can_advance_to(ClosedOnError));
}

#[test]
fn test_terminal_states_never_return_to_serving() {
    use ConnectionState::*;
    for terminal in [ClosedNormally, ClosedOnError] {
        assert!(terminal.is_terminal());
        assert!(!terminal.can_advance_to(Serving));
        assert!(!terminal.can_advance_to(ClosedNormally));
        assert!(!terminal.can_advance_to(ClosedOnError));
    }
    assert!(!Serving.can_advance_to(Established));
}

#[test]
fn test_state_discriminant_round_trip() {
    use ConnectionState::*;
    for state in [Established, Serving, ClosedNormally, ClosedOnError] {
        assert_eq!(ConnectionState::from_u8(state as u8), Some(state));
    }
    assert_eq!(ConnectionState::from_u8(9), None);
}

#[test]
fn test_connection_id_display() {
    assert_eq!(ConnectionId::new(7).to_string(), "#7");
    assert_eq!(ConnectionId::new(7).get(), 7);
}
