//! Subscriber setup from the `logging` config section.
//!
//! Every named section routes its target prefix (e.g. `job_listings`,
//! `listing_db`, `tower_http`) to the console at `console_level` and, when
//! `file` is set, to a rotating JSON file at `file_level`. The `default`
//! section receives everything no named section claims.

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, fmt, prelude::*, Layer, Registry};

use crate::config::{LoggingConfig, Section};
use crate::paths::resolve_under;

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Level filter for one section: its own prefix for named sections, or
/// everything except the named prefixes for `default`.
fn section_targets(name: &str, level: LevelFilter, named: &[&str]) -> Targets {
    if name == DEFAULT_SECTION {
        named
            .iter()
            .fold(Targets::new().with_default(level), |t, n| {
                t.with_target(n.to_string(), LevelFilter::OFF)
            })
    } else {
        Targets::new()
            .with_default(LevelFilter::OFF)
            .with_target(name.to_string(), level)
    }
}

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

impl<'a> fmt::MakeWriter<'a> for RotatingFile {
    type Writer = RotatingFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Rotate by size; keep `max_backups` files, else prune by age.
fn open_rotating(path: &Path, section: &Section) -> std::io::Result<RotatingFile> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let limit = match (section.max_backups, section.max_age_days) {
        (Some(n), _) => FileLimit::MaxFiles(n.max(1)),
        (None, Some(days)) => FileLimit::Age(chrono::Duration::days(i64::from(days.max(1)))),
        (None, None) => FileLimit::Age(chrono::Duration::days(1)),
    };
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let rot = FileRotate::new(
        path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

fn build_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let named: Vec<&str> = cfg
        .keys()
        .map(String::as_str)
        .filter(|k| *k != DEFAULT_SECTION)
        .collect();
    let ansi = atty::is(atty::Stream::Stdout);
    let mut layers = Vec::new();

    for (name, section) in cfg {
        let console = parse_level(&section.console_level);
        if console != LevelFilter::OFF {
            layers.push(
                fmt::layer()
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_filter(section_targets(name, console, &named))
                    .boxed(),
            );
        }

        if section.file.trim().is_empty() {
            continue;
        }
        let file_level = parse_level(&section.file_level);
        if file_level == LevelFilter::OFF {
            continue;
        }
        let path = resolve_under(base_dir, &section.file);
        match open_rotating(&path, section) {
            Ok(writer) => layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(writer)
                    .with_filter(section_targets(name, file_level, &named))
                    .boxed(),
            ),
            Err(e) => eprintln!(
                "Failed to open log file '{}' for '{}': {}",
                path.display(),
                name,
                e
            ),
        }
    }
    layers
}

/// Install the global subscriber. `base_dir` anchors relative log file paths
/// (normally `server.home_dir`). Calling it again is a no-op.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let _ = Registry::default().with(build_layers(cfg, base_dir)).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;
    use tracing::Level;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_age_days: None,
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level("TRACE"), LevelFilter::TRACE);
        assert_eq!(parse_level(" warn "), LevelFilter::WARN);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level("none"), LevelFilter::OFF);
        assert_eq!(parse_level("chatty"), LevelFilter::INFO);
    }

    #[test]
    fn default_section_excludes_named_prefixes() {
        let t = section_targets("default", LevelFilter::INFO, &["listing_db"]);
        assert!(t.would_enable("job_listings::api", &Level::INFO));
        assert!(!t.would_enable("job_listings::api", &Level::DEBUG));
        assert!(!t.would_enable("listing_db::listing", &Level::ERROR));

        let t = section_targets("listing_db", LevelFilter::DEBUG, &["listing_db"]);
        assert!(t.would_enable("listing_db::listing", &Level::DEBUG));
        assert!(!t.would_enable("job_listings", &Level::ERROR));
    }

    #[test]
    fn file_layers_are_built_under_base_dir() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert(
            "listing_db".into(),
            section("off", "logs/db.log", "debug"),
        );
        cfg.insert("tower_http".into(), section("info", "", "debug"));

        let layers = build_layers(&cfg, tmp.path());
        // default console + default file, db file, tower_http console
        assert_eq!(layers.len(), 4);
        assert!(tmp.path().join("logs").is_dir());
    }

    #[test]
    fn rotating_writer_creates_parent_dirs() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("nested/dir/app.log");
        let mut w = open_rotating(&p, &section("info", "x", "info")).unwrap();
        w.write_all(b"hello\n").unwrap();
        w.flush().unwrap();
        assert!(p.exists());
    }
}
