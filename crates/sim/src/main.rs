//! Headless survival session runner.
//!
//! Loads the content catalog, replays an interaction script against the
//! engine and writes the resulting state to the save store.
mod config;
mod logging;
mod runner;
mod script;

use std::sync::Arc;

use anyhow::{Context, Result};
use survival_content::{ContentFactory, SaveStore};

use crate::config::SimConfig;
use crate::runner::Runner;
use crate::script::Script;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = SimConfig::from_env();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref(), config.session_id.as_deref())?;

    let factory = ContentFactory::new(&config.data_dir);
    let game_config = factory.load_config()?;
    let catalog = Arc::new(factory.load_catalog()?);

    let store = SaveStore::new(&config.save_dir)
        .with_context(|| format!("opening save store at {}", config.save_dir.display()))?;
    let resumed = if config.resume {
        let loaded = store.load(&config.save_name)?;
        if loaded.is_none() {
            tracing::warn!(name = %config.save_name, "no save to resume, starting fresh");
        }
        loaded
    } else {
        None
    };

    let script = Script::load(&config.script_path)?;
    tracing::info!(
        script = %config.script_path.display(),
        steps = script.steps.len(),
        resumed = resumed.is_some(),
        "starting run"
    );

    let mut runner = Runner::new(catalog, game_config, &script, resumed);
    let summary = runner.run(&script.steps);
    runner.log_summary();
    tracing::info!(
        steps = summary.steps,
        rejected = summary.rejected,
        events = summary.events,
        "run finished"
    );

    store.save(&config.save_name, &runner.into_state())?;
    Ok(())
}
