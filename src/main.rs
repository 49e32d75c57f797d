//! `tsstat` binary; all logic lives in [`ts_stats::app`].

use std::process::ExitCode;

fn main() -> ExitCode {
    match ts_stats::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
