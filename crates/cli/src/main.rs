use std::process::ExitCode;

fn main() -> ExitCode {
    supplybot_cli::run()
}
