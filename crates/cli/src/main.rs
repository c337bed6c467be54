use std::process::ExitCode;

fn main() -> ExitCode {
    verdant_cli::run()
}
