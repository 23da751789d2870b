//! Command-line entry point (native).

use std::process::ExitCode;

fn main() -> ExitCode {
    #[cfg(feature = "native")]
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    log::debug!("Running with {:?}", args);

    match layoutvibe_app::cli::run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
