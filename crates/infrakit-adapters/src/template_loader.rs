//! Filesystem-based template bundle loader.
//!
//! Lets users replace the embedded artifacts of a known resource with their
//! own files, without rebuilding the binary.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── infra/
//! │   └── redis/
//! │       ├── docker-compose.yml   ← required
//! │       ├── .env                 ← required
//! │       ├── bundle.toml          ← optional manifest
//! │       └── config/
//! │           └── redis.conf
//! └── monitoring/
//!     └── grafana/
//!         └── ...
//! ```
//!
//! # `bundle.toml` format
//!
//! ```toml
//! # Config payloads that must be written with the executable bit.
//! executable = ["config/init.sh"]
//! ```
//!
//! A bundle only ever overrides a name the built-in catalog already declares.
//! Unknown names and incomplete bundles emit a `WARN` log and are skipped.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use infrakit_core::{
    domain::{
        COMPOSE_FILE, CatalogType, ConfigFile, DomainError, ENV_FILE, RelativePath,
        ResourceArtifacts,
    },
    error::{InfrakitError, InfrakitResult},
};

use crate::catalog::BuiltinCatalog;

const MANIFEST_FILE: &str = "bundle.toml";

/// Deserialised `bundle.toml`.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct BundleManifest {
    /// Config payload paths, relative to the bundle root.
    pub executable: Vec<String>,
}

/// Replacement artifacts for one known resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBundle {
    pub catalog: CatalogType,
    pub name: String,
    pub artifacts: ResourceArtifacts,
}

/// Loads [`TemplateBundle`]s from `<dir>/<catalog>/<name>/`.
pub struct TemplateBundleLoader {
    templates_dir: PathBuf,
}

impl TemplateBundleLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Load every valid bundle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the templates directory does not
    /// exist or cannot be read. Problems inside one bundle only skip it.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> InfrakitResult<Vec<TemplateBundle>> {
        if !self.templates_dir.is_dir() {
            return Err(InfrakitError::Configuration {
                message: format!(
                    "templates directory not found: {}",
                    self.templates_dir.display()
                ),
            });
        }

        let mut bundles = Vec::new();
        for catalog in CatalogType::ALL {
            let catalog_dir = self.templates_dir.join(catalog.as_str());
            if !catalog_dir.is_dir() {
                continue;
            }

            for dir in subdirectories(&catalog_dir)? {
                let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                    continue;
                };

                if BuiltinCatalog::find(catalog, &name).is_none() {
                    warn!(
                        dir = %dir.display(),
                        "skipping bundle: '{name}' is not a known {catalog} resource"
                    );
                    continue;
                }

                match self.load_bundle(&dir, &name) {
                    Ok(artifacts) => {
                        debug!(
                            %catalog,
                            %name,
                            files = artifacts.config_files.len(),
                            "loaded bundle"
                        );
                        bundles.push(TemplateBundle {
                            catalog,
                            name,
                            artifacts,
                        });
                    }
                    Err(e) => {
                        warn!(
                            dir = %dir.display(),
                            error = %e,
                            "skipping bundle due to load error"
                        );
                    }
                }
            }
        }

        debug!(count = bundles.len(), "finished loading bundles");
        Ok(bundles)
    }

    /// Read one bundle directory into validated artifacts.
    fn load_bundle(&self, dir: &Path, name: &str) -> Result<ResourceArtifacts, DomainError> {
        let invalid = |reason: String| DomainError::InvalidArtifacts {
            resource: name.to_string(),
            reason,
        };
        let read = |file: &Path| {
            fs::read_to_string(file)
                .map_err(|e| invalid(format!("failed to read '{}': {e}", file.display())))
        };

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest: BundleManifest = if manifest_path.is_file() {
            toml::from_str(&read(&manifest_path)?).map_err(|e| {
                invalid(format!("failed to parse '{}': {e}", manifest_path.display()))
            })?
        } else {
            BundleManifest::default()
        };

        let mut artifacts =
            ResourceArtifacts::new(read(&dir.join(COMPOSE_FILE))?, read(&dir.join(ENV_FILE))?);

        let config_dir = dir.join("config");
        if config_dir.is_dir() {
            for entry in WalkDir::new(&config_dir).sort_by_file_name() {
                let entry = entry.map_err(|e| invalid(format!("failed to walk config/: {e}")))?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let relative = entry
                    .path()
                    .strip_prefix(dir)
                    .map_err(|e| invalid(e.to_string()))?;
                let path = RelativePath::try_new(relative)?;
                let executable = manifest
                    .executable
                    .iter()
                    .any(|p| Path::new(p) == path.as_path());

                let mut file = ConfigFile::new(path, read(entry.path())?);
                if executable {
                    file = file.executable();
                }
                artifacts = artifacts.with_config(file);
            }
        }

        artifacts.validate(name)?;
        Ok(artifacts)
    }
}

fn subdirectories(dir: &Path) -> InfrakitResult<Vec<PathBuf>> {
    let read_dir = fs::read_dir(dir).map_err(|e| InfrakitError::Configuration {
        message: format!("failed to read '{}': {e}", dir.display()),
    })?;

    let mut dirs: Vec<PathBuf> = read_dir
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_complete_bundle_for_known_name() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "infra/redis/docker-compose.yml", "services: {}\n");
        write(tmp.path(), "infra/redis/.env", "REDIS_PORT=6380\n");
        write(tmp.path(), "infra/redis/config/redis.conf", "maxmemory 1gb\n");
        write(tmp.path(), "infra/redis/config/init.sh", "#!/bin/sh\n");
        write(
            tmp.path(),
            "infra/redis/bundle.toml",
            "executable = [\"config/init.sh\"]\n",
        );

        let bundles = TemplateBundleLoader::new(tmp.path()).load_all().unwrap();

        assert_eq!(bundles.len(), 1);
        let bundle = &bundles[0];
        assert_eq!(bundle.catalog, CatalogType::Infra);
        assert_eq!(bundle.name, "redis");
        assert_eq!(bundle.artifacts.env, "REDIS_PORT=6380\n");

        let files: Vec<_> = bundle
            .artifacts
            .config_files
            .iter()
            .map(|f| (f.path.to_string(), f.executable))
            .collect();
        assert_eq!(
            files,
            vec![
                ("config/init.sh".to_string(), true),
                ("config/redis.conf".to_string(), false)
            ]
        );
    }

    #[test]
    fn unknown_names_are_never_registered() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "infra/kafka/docker-compose.yml", "services: {}\n");
        write(tmp.path(), "infra/kafka/.env", "A=1\n");

        let bundles = TemplateBundleLoader::new(tmp.path()).load_all().unwrap();
        assert!(bundles.is_empty());
    }

    #[test]
    fn incomplete_bundle_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "monitoring/loki/docker-compose.yml", "services: {}\n");

        let bundles = TemplateBundleLoader::new(tmp.path()).load_all().unwrap();
        assert!(bundles.is_empty());
    }

    #[test]
    fn missing_directory_is_configuration_error() {
        let tmp = TempDir::new().unwrap();
        let err = TemplateBundleLoader::new(tmp.path().join("nope"))
            .load_all()
            .unwrap_err();
        assert!(matches!(err, InfrakitError::Configuration { .. }));
    }
}
