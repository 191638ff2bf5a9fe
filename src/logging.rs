use std::fs::File;

use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::config::Config;
use crate::error::Result;

/// Installs the global logger. Later calls are no-ops, so every instance can
/// call this on construction.
///
/// If the configured log file can't be created the logger still goes in,
/// writing to stderr, and the I/O error is returned.
pub fn init(config: &Config) -> Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Error);

    if let Some(filter) = &config.log_filter {
        builder.parse_filters(filter);
    }

    let mut failure = None;
    if let Some(path) = &config.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => failure = Some(e),
        }
    }

    let _ = builder.try_init();
    failure.map_or(Ok(()), |e| Err(e.into()))
}
