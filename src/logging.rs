use std::error::Error;
use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

/// `env_logger` on stderr (`RUST_LOG` overrides `level`), or stderr plus a full-detail
/// file log when `log_file` is given.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match log_file {
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .try_init()?;
        }
        Some(path) => {
            let file = File::create(path)?;
            CombinedLogger::init(vec![
                TermLogger::new(
                    level,
                    Config::default(),
                    TerminalMode::Stderr,
                    ColorChoice::Auto,
                ),
                WriteLogger::new(LevelFilter::Trace, Config::default(), file),
            ])?;
        }
    }
    Ok(())
}
