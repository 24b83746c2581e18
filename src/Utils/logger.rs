//! Logger setup shared by the binary, the demos and the benches.
//!
//! Messages go to the terminal and, optionally, to a file named
//! `log_<date>_<time>.txt` in the given directory.
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use chrono::Local;
use simplelog::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// "debug" | "info" | "warn" | "error" | "off"
pub fn level_filter(loglevel: &str) -> Result<LevelFilter> {
    match loglevel {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        other => Err(AlgebraError::ValueError(format!(
            "loglevel must be debug, info, warn, error or off, got {}",
            other
        ))),
    }
}

/// Installs the global logger. Returns the path of the log file when one was requested.
/// A logger installed earlier in the process stays in place.
pub fn init_logger(loglevel: Option<&str>, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let level = match loglevel {
        Some(l) => level_filter(l)?,
        None => LevelFilter::Info,
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    let mut log_path = None;
    if let Some(dir) = log_dir {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let path = dir.join(format!("log_{}.txt", date_and_time));
        let file = File::create(&path).map_err(|e| {
            AlgebraError::ValueError(format!("cannot create log file {}: {}", path.display(), e))
        })?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
        log_path = Some(path);
    }
    if CombinedLogger::init(loggers).is_err() {
        log::warn!("logger already initialised, keeping the existing one");
    }
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(level_filter("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(level_filter("warn").unwrap(), LevelFilter::Warn);
        assert_eq!(level_filter("off").unwrap(), LevelFilter::Off);
        assert!(matches!(level_filter("loud"), Err(AlgebraError::ValueError(_))));
    }

    #[test]
    fn test_log_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_logger(Some("info"), Some(dir.path())).unwrap().unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("log_") && name.ends_with(".txt"));
        assert!(init_logger(Some("verbose"), None).is_err());
    }
}
