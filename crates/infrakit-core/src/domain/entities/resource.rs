//! Catalog entries and the artifacts they generate.
//!
//! A [`ResourceDescriptor`] is a compile-time row of the catalog table: a
//! name, the catalog it belongs to, and a pure generator producing the three
//! artifacts (compose descriptor, environment template, config payloads).

use std::collections::HashSet;
use std::fmt;

use crate::domain::{
    entities::common::RelativePath, error::DomainError, value_objects::CatalogType,
};

/// File name of the compose descriptor inside an instance directory.
pub const COMPOSE_FILE: &str = "docker-compose.yml";
/// File name of the environment template inside an instance directory.
pub const ENV_FILE: &str = ".env";
/// Subdirectories every instance gets, whether or not they hold files.
pub const INSTANCE_DIRS: [&str; 3] = ["config", "volumes", "data"];

/// Pure function rendering a resource's artifacts.
pub type Generator = fn() -> ResourceArtifacts;

/// One entry in a resource catalog.
#[derive(Clone, Copy)]
pub struct ResourceDescriptor {
    pub name: &'static str,
    pub catalog: CatalogType,
    /// One-line description shown by `list`.
    pub summary: &'static str,
    pub generator: Generator,
}

impl ResourceDescriptor {
    pub const fn new(
        name: &'static str,
        catalog: CatalogType,
        summary: &'static str,
        generator: Generator,
    ) -> Self {
        Self {
            name,
            catalog,
            summary,
            generator,
        }
    }

    /// Run the generator.
    pub fn generate(&self) -> ResourceArtifacts {
        (self.generator)()
    }
}

impl PartialEq for ResourceDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.catalog == other.catalog && self.name == other.name
    }
}

impl Eq for ResourceDescriptor {}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("name", &self.name)
            .field("catalog", &self.catalog)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.catalog, self.name)
    }
}

/// An auxiliary configuration payload, relative to the instance root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: RelativePath,
    pub content: String,
    pub executable: bool,
}

impl ConfigFile {
    pub fn new(path: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            executable: false,
        }
    }

    /// Mark as executable (entrypoint init scripts).
    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// Everything a resource instance is made of.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceArtifacts {
    pub compose: String,
    pub env: String,
    pub config_files: Vec<ConfigFile>,
}

impl ResourceArtifacts {
    pub fn new(compose: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            compose: compose.into(),
            env: env.into(),
            config_files: Vec::new(),
        }
    }

    pub fn with_config(mut self, file: ConfigFile) -> Self {
        self.config_files.push(file);
        self
    }

    /// Check the triple is complete before anything touches the disk.
    ///
    /// Config payloads must live under `config/` and must not collide.
    pub fn validate(&self, resource: &str) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidArtifacts {
            resource: resource.to_string(),
            reason: reason.to_string(),
        };

        if self.compose.trim().is_empty() {
            return Err(invalid("compose descriptor is empty"));
        }
        if self.env.trim().is_empty() {
            return Err(invalid("environment template is empty"));
        }

        let mut seen = HashSet::new();
        for file in &self.config_files {
            if file.path.first_component() != Some("config") {
                return Err(invalid(&format!(
                    "config payload '{}' must live under config/",
                    file.path
                )));
            }
            if !seen.insert(file.path.as_path()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }

        Ok(())
    }
}
