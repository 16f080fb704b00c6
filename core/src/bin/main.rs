//! Fluxo CLI
//!
//! Checks, compiles and chats with flow files from the terminal, without the
//! surrounding web application.

use fluxo_core::cli;

fn main() {
    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
