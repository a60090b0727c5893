use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_APP_NAME: &str = "Ghost";

/// Environment the shell was started in. Only `Test` changes menu behavior.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Production,
    Development,
    Test,
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(RunMode::Production),
            "development" | "dev" => Ok(RunMode::Development),
            "test" => Ok(RunMode::Test),
            other => Err(anyhow!(
                "Invalid environment '{other}'. Expected production, development or test."
            )),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunMode::Production => "production",
            RunMode::Development => "development",
            RunMode::Test => "test",
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    /// Display name used for the macOS app menu and the About/Hide labels.
    #[serde(default)]
    pub app_name: Option<String>,

    #[serde(default)]
    pub environment: Option<RunMode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub app_name: String,
    pub mode: RunMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            mode: RunMode::default(),
        }
    }
}

/// Reads the config file (if any) and applies the `SHELLMENU_ENV` override.
pub fn load() -> Result<Settings> {
    let cfg = load_optional()?;
    let env_mode = env::var("SHELLMENU_ENV").ok();
    resolve(cfg.as_ref(), env_mode.as_deref())
}

pub fn load_optional() -> Result<Option<Config>> {
    let Some(path) = resolve_config_path() else {
        return Ok(None);
    };
    load_from(&path)
}

/// `Ok(None)` when `path` does not exist.
pub fn load_from(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let cfg: Config =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(p) = env::var("SHELLMENU_CONFIG") {
        if !p.trim().is_empty() {
            return Some(PathBuf::from(p));
        }
    }

    let local = PathBuf::from("shellmenu.json");
    if local.exists() {
        return Some(local);
    }

    if let Some(appdata) = env::var_os("APPDATA") {
        return Some(PathBuf::from(appdata).join("shellmenu").join("config.json"));
    }

    if let Some(home) = env::var_os("HOME") {
        return Some(PathBuf::from(home).join(".config").join("shellmenu").join("config.json"));
    }

    None
}

pub fn resolve(config: Option<&Config>, env_mode: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(cfg) = config {
        if let Some(name) = cfg.app_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                settings.app_name = name.to_string();
            }
        }
        if let Some(mode) = cfg.environment {
            settings.mode = mode;
        }
    }

    if let Some(raw) = env_mode.filter(|s| !s.trim().is_empty()) {
        settings.mode = raw.parse::<RunMode>().context("SHELLMENU_ENV")?;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("shellmenu-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_without_config() {
        let settings = resolve(None, None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.app_name, "Ghost");
        assert_eq!(settings.mode, RunMode::Production);
    }

    #[test]
    fn config_values_apply() {
        let cfg = Config {
            app_name: Some("  Blogdesk ".to_string()),
            environment: Some(RunMode::Development),
        };
        let settings = resolve(Some(&cfg), None).unwrap();
        assert_eq!(settings.app_name, "Blogdesk");
        assert_eq!(settings.mode, RunMode::Development);
    }

    #[test]
    fn blank_app_name_keeps_default() {
        let cfg = Config {
            app_name: Some("   ".to_string()),
            environment: None,
        };
        assert_eq!(resolve(Some(&cfg), None).unwrap().app_name, DEFAULT_APP_NAME);
    }

    #[test]
    fn env_overrides_config_mode() {
        let cfg = Config {
            app_name: None,
            environment: Some(RunMode::Production),
        };
        let settings = resolve(Some(&cfg), Some("test")).unwrap();
        assert_eq!(settings.mode, RunMode::Test);

        let err = resolve(Some(&cfg), Some("staging")).unwrap_err();
        assert!(format!("{err:#}").contains("staging"));
    }

    #[test]
    fn missing_file_is_none() {
        let path = env::temp_dir().join("shellmenu-definitely-missing.json");
        assert!(load_from(&path).unwrap().is_none());
    }

    #[test]
    fn reads_json_file() {
        let path = scratch_file(
            "ok.json",
            r#"{ "app_name": "Ghost Beta", "environment": "test" }"#,
        );
        let cfg = load_from(&path).unwrap().unwrap();
        assert_eq!(cfg.app_name.as_deref(), Some("Ghost Beta"));
        assert_eq!(cfg.environment, Some(RunMode::Test));
    }

    #[test]
    fn parse_error_names_the_file() {
        let path = scratch_file("bad.json", "{ not json");
        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
