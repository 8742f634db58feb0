//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (`--base-dir`, `--no-color`, applied by [`AppConfig::apply_flags`])
//! 2. Environment variables (`INFRAKIT_<SECTION>__<KEY>`)
//! 3. Config file (`--config`, else the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::cli::global::GlobalArgs;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub runtime: RuntimeConfig,
    pub prerequisites: PrerequisitesConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the `<catalog>/<name>/` instance tree. A leading `~` is
    /// expanded to the home directory.
    pub base_dir: PathBuf,
    /// Directory of `<catalog>/<name>/` bundles overriding the built-ins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub binary: String,
    /// Shared external network every instance joins.
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrerequisitesConfig {
    /// Answer used when the install prompt is confirmed with Enter.
    pub default_answer: bool,
    pub assume_yes: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                base_dir: default_base_dir(),
                templates_dir: None,
            },
            runtime: RuntimeConfig {
                binary: "docker".into(),
                network: "infrakit-net".into(),
            },
            prerequisites: PrerequisitesConfig {
                default_answer: true,
                assume_yes: false,
            },
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the TOML file, then the environment.
    ///
    /// An explicit `--config` file must exist unless `allow_missing` is set
    /// (`init` is about to create it); the default location is optional.
    pub fn load(config_file: Option<&PathBuf>, allow_missing: bool) -> anyhow::Result<Self> {
        let path = config_file
            .cloned()
            .unwrap_or_else(Self::default_config_path);

        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let mut cfg: Self = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path.clone())
                    .format(FileFormat::Toml)
                    .required(config_file.is_some() && !allow_missing),
            )
            .add_source(
                Environment::with_prefix("INFRAKIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")?;

        cfg.paths.base_dir = expand_home(&cfg.paths.base_dir);
        cfg.paths.templates_dir = cfg.paths.templates_dir.as_deref().map(expand_home);
        Ok(cfg)
    }

    /// Layer the CLI flags on top of the loaded values.
    pub fn apply_flags(&mut self, args: &GlobalArgs) {
        if let Some(base_dir) = &args.base_dir {
            self.paths.base_dir = expand_home(base_dir);
        }
        if args.no_color {
            self.output.no_color = true;
        }
    }

    /// The file `init` writes and `load` reads: `--config` if given.
    pub fn config_path(args: &GlobalArgs) -> PathBuf {
        args.config.clone().unwrap_or_else(Self::default_config_path)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.infrakit.toml` in the current directory.
    pub fn default_config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "infrakit", "infrakit")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".infrakit.toml"))
    }

    /// Look up a dotted key such as `runtime.network`.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut value = toml::Value::try_from(self).ok()?;
        for part in key.split('.') {
            value = value.get(part)?.clone();
        }
        match value {
            toml::Value::String(s) => Some(s),
            toml::Value::Table(_) => None,
            other => Some(other.to_string()),
        }
    }
}

fn default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join("infrakit"))
        .unwrap_or_else(|| PathBuf::from("infrakit"))
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match directories::BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("infrakit.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.runtime.binary, "docker");
        assert_eq!(cfg.runtime.network, "infrakit-net");
        assert!(cfg.prerequisites.default_answer);
        assert!(!cfg.prerequisites.assume_yes);
        assert!(cfg.paths.base_dir.ends_with("infrakit"));
    }

    #[test]
    fn file_values_override_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            "[runtime]\nnetwork = \"lab-net\"\n\n[paths]\nbase_dir = \"/srv/stack\"\n",
        );

        let cfg = AppConfig::load(Some(&path), false).unwrap();
        assert_eq!(cfg.runtime.network, "lab-net");
        assert_eq!(cfg.runtime.binary, "docker", "untouched keys keep defaults");
        assert_eq!(cfg.paths.base_dir, PathBuf::from("/srv/stack"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing), false).is_err());
        assert!(AppConfig::load(Some(&missing), true).is_ok());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_config(tmp.path(), "[runtime\nnetwork = ");
        assert!(AppConfig::load(Some(&path), true).is_err());
    }

    #[test]
    fn flags_win_over_loaded_values() {
        let mut cfg = AppConfig::default();
        let args = GlobalArgs {
            base_dir: Some(PathBuf::from("/tmp/override")),
            no_color: true,
            ..Default::default()
        };
        cfg.apply_flags(&args);
        assert_eq!(cfg.paths.base_dir, PathBuf::from("/tmp/override"));
        assert!(cfg.output.no_color);
    }

    #[test]
    fn tilde_is_expanded() {
        let expanded = expand_home(Path::new("~/stacks"));
        assert!(expanded.ends_with("stacks"));
        if directories::BaseDirs::new().is_some() {
            assert!(!expanded.starts_with("~"));
        }
        assert_eq!(expand_home(Path::new("/abs/path")), PathBuf::from("/abs/path"));
    }

    #[test]
    fn get_dotted_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("runtime.network").as_deref(), Some("infrakit-net"));
        assert_eq!(cfg.get("prerequisites.default_answer").as_deref(), Some("true"));
        assert_eq!(cfg.get("runtime"), None, "sections are not leaf values");
        assert_eq!(cfg.get("does.not.exist"), None);
    }

    #[test]
    fn default_config_path_is_not_empty() {
        assert!(!AppConfig::default_config_path().as_os_str().is_empty());
    }
}
