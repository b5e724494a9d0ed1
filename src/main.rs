use std::process::ExitCode;

use merge_move::MergeMoveError;
use merge_move::cli;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<MergeMoveError>() {
            Some(mm) => ExitCode::from(mm.code()),
            None => ExitCode::from(2),
        },
    }
}
