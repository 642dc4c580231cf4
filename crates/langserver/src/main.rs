//! langserver - Entry Point
//!
//! | Mode | Command | Description |
//! |------|---------|-------------|
//! | **Stdio** | `langserver` | One client over stdin/stdout |
//! | **Tcp** | `langserver --mode=tcp --addr=:2088` | Concurrent clients over TCP |
//!
//! Exits 0 once the server stops, including when the stdio client goes
//! away on error, and 1 when configuration, the log file, the listener or
//! the accept loop fails.

use std::process::ExitCode;

use langserver::{Cli, exit_status, run};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("langserver: cannot start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        let configuration = cli.configuration()?;
        run(configuration).await
    });
    // A pending stdin read holds a blocking thread that cannot be cancelled.
    runtime.shutdown_background();

    if let Err(e) = &result {
        eprintln!("langserver: {e}");
    }
    ExitCode::from(exit_status(&result))
}
