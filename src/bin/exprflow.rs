use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use exprflow::cli::Cli;
use exprflow::driver::Driver;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut driver = Driver::new(cli.threshold);
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut stdout_lock = stdout.lock();
    let mut stderr_lock = stderr.lock();

    let code = match cli.file {
        Some(path) => match File::open(&path) {
            Ok(file) => driver.run(BufReader::new(file), &mut stdout_lock, &mut stderr_lock),
            Err(err) => {
                eprintln!("exprflow: cannot open {}: {}", path.display(), err);
                return ExitCode::from(1);
            }
        },
        None => {
            let stdin = io::stdin();
            driver.run(stdin.lock(), &mut stdout_lock, &mut stderr_lock)
        }
    };

    ExitCode::from(code as u8)
}
