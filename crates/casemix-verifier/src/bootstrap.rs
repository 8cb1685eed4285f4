use std::path::{Path, PathBuf};
use std::sync::Mutex;

use casemix_core::rules::{Rule, RuleSet};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-user directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".casemix-verifier";
/// Log file written while the dashboard owns the terminal.
pub const LOG_FILE_NAME: &str = "casemix-verifier.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.casemix-verifier/` and its `logs/` subdirectory exist and
/// return the former.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

/// Same as [`ensure_directories`] rooted at `home`.
pub fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let app_dir = home.join(APP_DIR_NAME);
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(app_dir)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to an `EnvFilter` directive.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, records are appended to that file without ANSI
/// colours; otherwise they go to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

// ── Rule bootstrap ─────────────────────────────────────────────────────────────

/// Build the starting rule set: the rules file (if any) followed by the
/// `--rule` flags, in that order.
///
/// A rules file that does not exist yet is not an error; it starts empty and
/// is created on the first save. A file that exists but does not parse is.
pub fn load_rules(rules_file: Option<&Path>, extra: &[Rule]) -> anyhow::Result<RuleSet> {
    let mut rules = match rules_file {
        Some(path) if path.exists() => RuleSet::load_from(path)?,
        Some(path) => {
            tracing::warn!(
                "Rules file {} not found; starting with no file rules",
                path.display()
            );
            RuleSet::new()
        }
        None => RuleSet::new(),
    };
    for rule in extra {
        rules.add(rule.clone());
    }
    Ok(rules)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
