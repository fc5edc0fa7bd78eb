use std::process::ExitCode;

fn main() -> ExitCode {
    bookbot_cli::run()
}
