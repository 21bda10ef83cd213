use std::process::ExitCode;

use copyutil::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = copyutil::cli::parse();
    match app::run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::from(2)
        }
    }
}
