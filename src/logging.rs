use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Config;

pub const LOG_FILE: &str = "verbdeck.log";

/// Directory the log file lives in. Ephemeral runs never write to the data dir.
pub fn log_dir(config: &Config, ephemeral: bool) -> PathBuf {
    if ephemeral {
        std::env::temp_dir()
    } else {
        config.data_dir()
    }
}

/// Open `<dir>/verbdeck.log` for appending, creating `dir` if needed.
pub fn open_log_file(dir: &Path) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
}

/// Install env_logger writing to the log file, at the config level unless
/// `RUST_LOG` says otherwise. The terminal belongs to the UI, so when the
/// file cannot be opened records are discarded and the error is returned.
pub fn init(config: &Config, ephemeral: bool) -> Result<()> {
    let dir = log_dir(config, ephemeral);
    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.level_filter()).parse_default_env();

    let opened = open_log_file(&dir);
    let target: Box<dyn io::Write + Send> = match &opened {
        Ok(file) => Box::new(file.try_clone()?),
        Err(_) => Box::new(io::sink()),
    };
    builder.target(env_logger::Target::Pipe(target));
    builder.try_init()?;

    opened
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!("cannot open {}: {e}", dir.join(LOG_FILE).display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn log_file_is_created_with_its_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data");
        let mut file = open_log_file(&nested).unwrap();
        writeln!(file, "hello").unwrap();
        assert!(nested.join(LOG_FILE).exists());
    }

    #[test]
    fn unusable_log_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        assert!(open_log_file(&blocker).is_err());
    }

    #[test]
    fn ephemeral_runs_log_outside_the_data_dir() {
        let config = Config {
            data_dir: "/nonexistent/verbdeck".to_string(),
            ..Config::default()
        };
        assert_eq!(log_dir(&config, true), std::env::temp_dir());
        assert_eq!(log_dir(&config, false), PathBuf::from("/nonexistent/verbdeck"));
    }
}
