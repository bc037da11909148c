//! Runner configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Where the runner reads content and scripts and where it writes saves and logs.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub data_dir: PathBuf,
    pub script_path: PathBuf,
    pub save_dir: PathBuf,
    pub save_name: String,
    /// Load `save_name` before running instead of starting fresh.
    pub resume: bool,
    /// File logging is skipped when `None`.
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("crates/game/content/data"),
            script_path: PathBuf::from("crates/sim/data/script.ron"),
            save_dir: default_save_dir(),
            save_name: "autosave".to_owned(),
            resume: false,
            log_dir: Some(default_log_dir()),
            session_id: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SURVIVAL_DATA_DIR` - Content directory (default: `crates/game/content/data`)
    /// - `SURVIVAL_SCRIPT` - Interaction script (default: `crates/sim/data/script.ron`)
    /// - `SAVE_DATA_DIR` - Directory for save files (default: platform-specific)
    /// - `SURVIVAL_SAVE_NAME` - Save slot name (default: `autosave`)
    /// - `SURVIVAL_RESUME` - Load the save slot before running (default: false)
    /// - `SURVIVAL_LOG_DIR` - Log directory, `none` to disable file logging (default: platform-specific)
    /// - `GAME_SESSION_ID` - Session identifier for log files (default: auto-generated)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("SURVIVAL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(path) = env::var("SURVIVAL_SCRIPT") {
            config.script_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("SAVE_DATA_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Ok(name) = env::var("SURVIVAL_SAVE_NAME") {
            config.save_name = name;
        }
        if let Some(resume) = read_env::<bool>("SURVIVAL_RESUME") {
            config.resume = resume;
        }
        match env::var("SURVIVAL_LOG_DIR").ok().as_deref() {
            Some("none") | Some("") => config.log_dir = None,
            Some(dir) => config.log_dir = Some(PathBuf::from(dir)),
            None => {}
        }
        config.session_id = env::var("GAME_SESSION_ID").ok();

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "survival")
}

/// Platform data directory, e.g. `~/.local/share/survival/saves` on Linux.
fn default_save_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("saves"))
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

/// Platform cache directory, e.g. `~/.cache/survival/logs` on Linux.
fn default_log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("/tmp/survival/logs"))
}
