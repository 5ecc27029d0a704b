use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ChargenError, Result};

const LOG_FILE: &str = "chargen_log.txt";

#[derive(Debug)]
struct SimpleLogger {
    log_path: PathBuf,
}

static LOGGER: OnceCell<SimpleLogger> = OnceCell::new();

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_entry = format!(
                "{} {} [{}] - {}\n",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
            let log_file = self.log_path.join(LOG_FILE);

            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_file) {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

/// Directory shared by the log file and the persisted settings.
pub fn data_dir() -> Result<PathBuf> {
    let home = dir::home_dir().ok_or(ChargenError::HomeDirUnavailable)?;
    Ok(home.join("sharad").join("data"))
}

pub fn init() -> Result<()> {
    init_at(data_dir()?)
}

/// Installs the file logger writing into `log_path`.
///
/// Only the first call wins; later calls report the `log` crate's
/// `SetLoggerError`.
pub fn init_at(log_path: impl AsRef<Path>) -> Result<()> {
    let log_path = log_path.as_ref().to_path_buf();
    create_dir_all(&log_path)?;

    let logger = LOGGER.get_or_init(|| SimpleLogger { log_path });
    log::set_logger(logger)?;
    log::set_max_level(LevelFilter::Debug);
    log::info!("Chargen logging started: {}", chrono::Local::now());
    Ok(())
}
