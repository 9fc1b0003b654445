//! netjson CLI - Convert GUNNS drawio network diagrams to GoJS layout JSON

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    let app = cli::NetjsonApp::new();

    match app.run(cli_args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
