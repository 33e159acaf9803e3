//! Runtime configuration.
//!
//! Read from `<config dir>/mousetrap/mousetrap.toml`. A missing file means
//! defaults; every key is optional.
//!
//! ```toml
//! [trap]
//! pad = 4
//!
//! [rearm]
//! interval_ms = 100
//! handoff = "auto"   # or "poll"
//!
//! [navigation]
//! smart_home = true
//! scroll_recentering = false
//! recenter_bias = 3
//! ```

use crate::error::{Result, TrapError};
use crate::geometry::DEFAULT_PAD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_DIR_NAME: &str = "mousetrap";
pub const CONFIG_FILE_NAME: &str = "mousetrap.toml";
pub const DEFAULT_REARM_INTERVAL_MS: u64 = 100;
pub const DEFAULT_RECENTER_BIAS: i32 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapConfig {
    #[serde(default)]
    pub trap: ConfineConfig,
    #[serde(default)]
    pub rearm: RearmConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfineConfig {
    /// Distance kept from the edge when the cursor is warped back.
    #[serde(default = "default_pad")]
    pub pad: i32,
}

impl Default for ConfineConfig {
    fn default() -> Self {
        Self { pad: DEFAULT_PAD }
    }
}

/// How the controller learns that the previous subscription is gone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffMode {
    /// Teardown signal when the host offers one, polling otherwise.
    #[default]
    Auto,
    /// Always poll on a timer.
    Poll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RearmConfig {
    #[serde(default = "default_rearm_interval_ms")]
    pub interval_ms: u64,
    #[serde(default)]
    pub handoff: HandoffMode,
}

impl RearmConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RearmConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_REARM_INTERVAL_MS,
            handoff: HandoffMode::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_true")]
    pub smart_home: bool,
    /// Known to crash some host builds; leave off unless you can reproduce
    /// the focus state safely.
    #[serde(default)]
    pub scroll_recentering: bool,
    #[serde(default = "default_recenter_bias")]
    pub recenter_bias: i32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            smart_home: true,
            scroll_recentering: false,
            recenter_bias: DEFAULT_RECENTER_BIAS,
        }
    }
}

fn default_pad() -> i32 {
    DEFAULT_PAD
}

fn default_rearm_interval_ms() -> u64 {
    DEFAULT_REARM_INTERVAL_MS
}

fn default_recenter_bias() -> i32 {
    DEFAULT_RECENTER_BIAS
}

fn default_true() -> bool {
    true
}

impl TrapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trap.pad < 0 {
            return Err(TrapError::InvalidConfig {
                field: "trap.pad",
                reason: format!("must not be negative (got {})", self.trap.pad),
            });
        }
        if self.rearm.interval_ms == 0 {
            return Err(TrapError::InvalidConfig {
                field: "rearm.interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: TrapConfig =
            toml::from_str(content).map_err(|err| TrapError::ConfigMalformed {
                path: origin.to_path_buf(),
                details: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }
}

/// Returns the default configuration file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads the configuration at `path` (or the default location).
///
/// A missing file yields defaults. An unreadable, malformed or invalid file is
/// an error so callers can decide whether to fall back.
pub fn load_config(path: Option<&Path>) -> Result<TrapConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(TrapConfig::default()),
        },
    };

    if !path.exists() {
        return Ok(TrapConfig::default());
    }

    let content = fs_err::read_to_string(&path).map_err(|source| TrapError::ConfigRead {
        path: path.clone(),
        source,
    })?;
    TrapConfig::from_toml_str(&content, &path)
}

/// Like [`load_config`], but logs and falls back to defaults on error.
pub fn load_config_or_default(path: Option<&Path>) -> TrapConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load mousetrap config; using defaults");
            TrapConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_recentering_disabled() {
        let config = TrapConfig::default();
        assert_eq!(config.trap.pad, 4);
        assert_eq!(config.rearm.interval(), Duration::from_millis(100));
        assert_eq!(config.rearm.handoff, HandoffMode::Auto);
        assert!(config.navigation.smart_home);
        assert!(!config.navigation.scroll_recentering);
        assert_eq!(config.navigation.recenter_bias, 3);
    }

    #[test]
    fn load_config_defaults_when_file_missing() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("missing.toml");
        let config = load_config(Some(&path)).expect("load config");
        assert_eq!(config, TrapConfig::default());
    }

    #[test]
    fn load_config_parses_partial_file() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("mousetrap.toml");
        fs_err::write(
            &path,
            r#"
[trap]
pad = 8

[rearm]
handoff = "poll"

[navigation]
scroll_recentering = true
"#,
        )
        .expect("write config");

        let config = load_config(Some(&path)).expect("load config");
        assert_eq!(config.trap.pad, 8);
        assert_eq!(config.rearm.interval_ms, DEFAULT_REARM_INTERVAL_MS);
        assert_eq!(config.rearm.handoff, HandoffMode::Poll);
        assert!(config.navigation.scroll_recentering);
        assert!(config.navigation.smart_home);
    }

    #[test]
    fn load_config_rejects_malformed_toml() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("mousetrap.toml");
        fs_err::write(&path, "[trap\npad = ").expect("write config");

        let err = load_config(Some(&path)).expect_err("malformed");
        assert!(matches!(err, TrapError::ConfigMalformed { .. }));
    }

    #[test]
    fn load_config_rejects_zero_interval() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("mousetrap.toml");
        fs_err::write(&path, "[rearm]\ninterval_ms = 0\n").expect("write config");

        let err = load_config(Some(&path)).expect_err("invalid");
        assert!(matches!(
            err,
            TrapError::InvalidConfig {
                field: "rearm.interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn negative_pad_is_invalid() {
        let config = TrapConfig {
            trap: ConfineConfig { pad: -1 },
            ..TrapConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn fallback_loader_swallows_errors() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("mousetrap.toml");
        fs_err::write(&path, "[trap]\npad = -3\n").expect("write config");

        assert_eq!(load_config_or_default(Some(&path)), TrapConfig::default());
    }
}
