use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings read from the environment.
///
/// Tunable view knobs (anchor, list bias, popup margin) live in the YAML
/// view settings file instead; see [`crate::view_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub view_config_path: PathBuf,
    pub facilities_path: PathBuf,
    /// Selecting a facility never zooms out below this level.
    pub min_selection_zoom: f64,
    /// Delay between the recenter request and opening the detail popup.
    pub popup_settle: Duration,
    pub scroll_duration: Duration,
}
