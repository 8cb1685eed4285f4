mod bootstrap;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use casemix_core::settings::Settings;
use casemix_data::verifier::AnnotationPolicy;
use casemix_data::writer::{render_report, render_report_json};
use casemix_runtime::session::Session;
use casemix_ui::app::{App, ViewMode, DEFAULT_RULES_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    // The dashboard owns the terminal, so its logs go to a file by default.
    let interactive = !settings.report && settings.export.is_none();
    let app_dir = bootstrap::ensure_directories()?;
    let log_file = settings.log_file.clone().or_else(|| {
        interactive.then(|| app_dir.join("logs").join(bootstrap::LOG_FILE_NAME))
    });
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Casemix verifier v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Top-N: {}",
        settings.view,
        settings.theme,
        settings.top_n
    );

    let rules = bootstrap::load_rules(settings.rules_file.as_deref(), &settings.rules)?;
    tracing::info!("Loaded {} rules", rules.len());

    let policy = if settings.first_match {
        AnnotationPolicy::FirstMatchWins
    } else {
        AnnotationPolicy::LastMatchWins
    };
    let mut session = Session::with_rules(rules).with_policy(policy);
    match &settings.input {
        Some(input) => {
            if let Err(e) = session.load(input) {
                if !interactive {
                    return Err(e).with_context(|| format!("cannot load {}", input.display()));
                }
                // Shown in the dashboard's status line.
                tracing::warn!("Initial load failed: {e}");
            }
        }
        None if !interactive => anyhow::bail!("--input is required with --report or --export"),
        None => {}
    }

    let top_n = settings.top_n as usize;

    if let Some(path) = &settings.export {
        let rows = session.export(path)?;
        println!("Exported {rows} flagged rows to {}", path.display());
    }
    if settings.report {
        let summary = session.summary(top_n);
        if settings.json {
            print!("{}", render_report_json(&summary)?);
        } else {
            print!("{}", render_report(&summary));
        }
    }
    if !interactive {
        return Ok(());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let mut app = App::new(session, &settings.theme, ViewMode::from_name(&settings.view), top_n)
        .with_shutdown(Arc::clone(&shutdown));
    app.rules_path = settings
        .rules_file
        .clone()
        .unwrap_or_else(|| app_dir.join(DEFAULT_RULES_NAME));

    // The TUI loop blocks, so it runs off the async workers. Ctrl+C normally
    // arrives as a key event in raw mode; the OS signal covers the rest.
    let mut ui = tokio::task::spawn_blocking(move || app.run());
    tokio::select! {
        joined = &mut ui => {
            joined.context("dashboard task failed")??;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; closing dashboard");
            shutdown.store(true, Ordering::Relaxed);
            ui.await.context("dashboard task failed")??;
        }
    }

    tracing::info!("Casemix verifier exiting");
    Ok(())
}
