use std::fs::{self, File};
use std::path::PathBuf;

use backoffice::shell::{self, Shell};
use backoffice::{ShellConfig, ShellError, paths, terminal};
use simplelog::{Config, WriteLogger};

fn init_logging(config: &ShellConfig) -> Result<(), ShellError> {
    let Some(log_file) = paths::log_file() else {
        eprintln!("Warning: no cache directory, logging disabled");
        return Ok(());
    };
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)?;
    }
    paths::rotate_logs();
    WriteLogger::init(config.level(), Config::default(), File::create(&log_file)?)?;
    log::info!("[main] logging to {}", log_file.display());
    Ok(())
}

const INTERACTIVE_FLAG: &str = "--interactive";

fn load_config() -> Result<ShellConfig, ShellError> {
    let path = std::env::args()
        .skip(1)
        .find(|arg| arg != INTERACTIVE_FLAG)
        .map(PathBuf::from);
    match path {
        Some(path) => ShellConfig::load(&path),
        None => match paths::config_file() {
            Some(path) => ShellConfig::load_or_default(&path),
            None => Ok(ShellConfig::default()),
        },
    }
}

fn run() -> Result<(), ShellError> {
    let config = load_config()?;
    init_logging(&config)?;

    let rows = shell::load_products(shell::PRODUCTS_JSON)?;
    let mut shell = Shell::new(&config, rows);
    if std::env::args().any(|arg| arg == INTERACTIVE_FLAG) {
        shell.paint();
        terminal::run_interactive(&mut shell)?;
    } else {
        for line in shell.run_script()? {
            println!("{}", line);
        }
    }
    log::info!("[main] session finished");
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
