//! Roster discovery and output settings.

use clap::ValueEnum;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Environment variable naming the roster file
pub const ROSTER_ENV: &str = "COMBO_ROSTER";

/// Roster file name looked up in the working and config directories
pub const ROSTER_FILE: &str = "warriors.csv";

/// When to style terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Places the roster is looked for, in priority order
pub fn roster_candidates(explicit: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path);
        return paths;
    }
    if let Ok(path) = std::env::var(ROSTER_ENV) {
        if !path.trim().is_empty() {
            paths.push(PathBuf::from(path));
        }
    }
    paths.push(PathBuf::from(ROSTER_FILE));
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("combo").join(ROSTER_FILE));
    }
    paths
}

/// First existing roster path; an explicit path is returned as-is so the
/// read error names it.
pub fn resolve_roster(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    roster_candidates(None).into_iter().find(|p| p.is_file())
}
