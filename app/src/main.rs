//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point; prints the requested dashboard as JSON.
// FORMAT: dashboard <uni> <command> [args]

use std::process::ExitCode;

use dashboard_lib::{log_error, DashboardError};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match dashboard_lib::run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(DashboardError::InvalidRequest(message)) => {
            eprintln!("{}", message);
            ExitCode::from(2)
        }
        Err(e) => {
            log_error!("SYS", "{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
