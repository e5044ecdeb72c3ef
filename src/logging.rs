//! Log output for the command line tool.
//!
//! Console output always honours `RUST_LOG`. When a log directory is given,
//! events are also written to a rolling file appender.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationPeriod {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl std::str::FromStr for RotationPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" | "hour" => Ok(RotationPeriod::Hourly),
            "daily" | "day" => Ok(RotationPeriod::Daily),
            "never" | "none" => Ok(RotationPeriod::Never),
            _ => Err(format!(
                "Invalid rotation period '{s}'. Valid options: hourly, daily, never"
            )),
        }
    }
}

impl From<RotationPeriod> for Rotation {
    fn from(period: RotationPeriod) -> Self {
        match period {
            RotationPeriod::Hourly => Rotation::HOURLY,
            RotationPeriod::Daily => Rotation::DAILY,
            RotationPeriod::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Where rolling log files go. `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
    pub log_prefix: String,
    pub rotation: RotationPeriod,
    /// Files kept on disk, 0 keeps everything.
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_prefix: "gpio-control".to_string(),
            rotation: RotationPeriod::Daily,
            max_log_files: 7,
        }
    }
}

/// Keeps the file writer alive. Drop it last so pending lines get flushed.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

pub fn init_logging(config: &LogConfig) -> std::io::Result<LogGuard> {
    let Some(log_dir) = &config.log_dir else {
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(Layer::default().with_writer(std::io::stderr))
            .init();
        return Ok(LogGuard { _guard: None });
    };

    std::fs::create_dir_all(log_dir)?;
    if config.max_log_files > 0 {
        prune_logs(log_dir, &config.log_prefix, config.max_log_files)?;
    }

    let (writer, guard) = tracing_appender::non_blocking(file_appender(config, log_dir)?);

    let file_layer = Layer::default()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(file_layer)
        .with(Layer::default().with_writer(std::io::stderr))
        .init();

    Ok(LogGuard {
        _guard: Some(guard),
    })
}

/// The appender prunes on rollover only when a limit is set.
fn file_appender(config: &LogConfig, log_dir: &Path) -> std::io::Result<RollingFileAppender> {
    let mut builder = RollingFileAppender::builder()
        .rotation(config.rotation.into())
        .filename_prefix(&config.log_prefix)
        .filename_suffix("log");
    if config.max_log_files > 0 {
        builder = builder.max_log_files(config.max_log_files);
    }
    builder.build(log_dir).map_err(std::io::Error::other)
}

/// Deletes all but the `keep` newest `<prefix>*.log` files.
fn prune_logs(log_dir: &Path, prefix: &str, keep: usize) -> std::io::Result<()> {
    let mut logs: Vec<_> = std::fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(prefix) && name.ends_with(".log"))
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((entry.path(), modified))
        })
        .collect();

    logs.sort_by(|a, b| b.1.cmp(&a.1));
    for (path, _) in logs.into_iter().skip(keep) {
        if let Err(e) = std::fs::remove_file(&path) {
            eprintln!("Warning: failed to remove old log file {path:?}: {e}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rotation_period_from_str() {
        assert_eq!("daily".parse::<RotationPeriod>().unwrap(), RotationPeriod::Daily);
        assert_eq!("HOUR".parse::<RotationPeriod>().unwrap(), RotationPeriod::Hourly);
        assert_eq!("none".parse::<RotationPeriod>().unwrap(), RotationPeriod::Never);
        assert!("weekly".parse::<RotationPeriod>().is_err());
    }

    #[test]
    fn prune_keeps_newest() {
        let dir = TempDir::new().unwrap();
        for i in 0..4 {
            std::fs::write(dir.path().join(format!("gpio-{i}.log")), "x").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        std::fs::write(dir.path().join("other.log"), "x").unwrap();

        prune_logs(dir.path(), "gpio-", 2).unwrap();

        let mut left: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        left.sort();
        assert_eq!(left, vec!["gpio-2.log", "gpio-3.log", "other.log"]);
    }

    #[test]
    fn unlimited_appender_keeps_old_files() {
        use std::io::Write;

        let dir = TempDir::new().unwrap();
        for i in 0..3 {
            std::fs::write(dir.path().join(format!("gpio-control.old-{i}.log")), "x").unwrap();
        }
        let config = LogConfig {
            log_dir: Some(dir.path().to_path_buf()),
            rotation: RotationPeriod::Hourly,
            max_log_files: 0,
            ..LogConfig::default()
        };

        let mut appender = file_appender(&config, dir.path()).unwrap();
        appender.write_all(b"started\n").unwrap();
        appender.flush().unwrap();

        let logs = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".log"))
            .count();
        assert_eq!(logs, 4);
    }
}
