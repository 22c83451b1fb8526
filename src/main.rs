//! Binary entrypoint for the `lmseval` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env is fine; settings then come from the real environment.
    dotenvy::dotenv().ok();
    match lmseval::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
