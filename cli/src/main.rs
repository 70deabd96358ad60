use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    evalsys::run_cli(std::env::args_os(), &mut io::stdout(), &mut io::stderr()).into()
}
