use std::process::ExitCode;

use colored::Colorize;

#[tokio::main]
async fn main() -> ExitCode {
    match ontograph::cli::main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
