/// Configuration schema and defaults for clinic-dash.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[backend]`, `[server]`, `[dashboard]` and `[diagnostics]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level clinic-dash configuration.
///
/// Maps directly to `~/.clinic-dash/config.toml` and `.clinic-dash.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub backend: BackendConfig,
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
    pub diagnostics: DiagnosticsConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where the clinic backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend API (no trailing `/api`).
    pub url: String,
    /// Per-request timeout in milliseconds. AI endpoints are slow, so this is
    /// generous.
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".to_string(),
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Local dashboard server (`clinic-dash serve`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the dashboard binds to.
    pub bind: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:9750".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Tab selected when the dashboard opens.
    pub initial_tab: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            initial_tab: "patients".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [diagnostics]
// ---------------------------------------------------------------------------

/// Diagnostics log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Whether failed backend calls are appended to the diagnostics log.
    pub enabled: bool,
    /// Path to the JSONL log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.clinic-dash/diagnostics.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default file
// ---------------------------------------------------------------------------

impl DashConfig {
    /// Annotated default config written by `clinic-dash config init`.
    pub fn default_toml() -> String {
        r#"# clinic-dash configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (CLINIC_DASH_*)
#   2. Project config (.clinic-dash.toml in current directory)
#   3. User global config (~/.clinic-dash/config.toml)
#   4. Built-in defaults

[backend]
url = "http://localhost:5000"
timeout_ms = 30000          # AI endpoints can take a while

[server]
bind = "127.0.0.1:9750"
open_browser = true

[dashboard]
initial_tab = "patients"    # patients | calendar | chat | prescription | medicine

[diagnostics]
enabled = true
path = "~/.clinic-dash/diagnostics.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back() {
        let config: DashConfig = toml::from_str(&DashConfig::default_toml()).unwrap();
        assert_eq!(config.backend.url, "http://localhost:5000");
        assert_eq!(config.backend.timeout_ms, 30_000);
        assert_eq!(config.server.bind, "127.0.0.1:9750");
        assert_eq!(config.dashboard.initial_tab, "patients");
        assert!(config.diagnostics.enabled);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: DashConfig = toml::from_str("[backend]\nurl = \"http://10.0.0.5:5000\"\n").unwrap();
        assert_eq!(config.backend.url, "http://10.0.0.5:5000");
        assert_eq!(config.backend.timeout_ms, 30_000);
        assert!(config.server.open_browser);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: DashConfig = toml::from_str("").unwrap();
        assert_eq!(config.diagnostics.path, "~/.clinic-dash/diagnostics.jsonl");
    }
}
