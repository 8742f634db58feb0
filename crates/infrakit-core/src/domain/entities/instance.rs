use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::{
    entities::{
        common::Permissions,
        resource::{COMPOSE_FILE, ENV_FILE, INSTANCE_DIRS, ResourceArtifacts},
    },
    error::DomainError,
};

/// On-disk realization of a resource, ready for materialization.
///
/// Directories come first, then the compose descriptor, the environment
/// template and the config payloads, so a writer walking `entries` in order
/// never needs to create parents on its own.
#[derive(Debug, Clone)]
pub struct ResourceInstance {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<FsEntry>,
}

impl ResourceInstance {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    /// Lay out the full instance for a set of rendered artifacts.
    pub fn from_artifacts(root: impl Into<PathBuf>, artifacts: &ResourceArtifacts) -> Self {
        let mut instance = Self::new(root);

        for dir in INSTANCE_DIRS {
            instance.add_directory(dir);
        }

        // Nested config directories (grafana provisioning, ...).
        let mut nested = HashSet::new();
        for file in &artifacts.config_files {
            if let Some(parent) = file.path.as_path().parent() {
                if parent != Path::new("config") && nested.insert(parent.to_path_buf()) {
                    instance.add_directory(parent);
                }
            }
        }

        instance.add_file(
            COMPOSE_FILE,
            artifacts.compose.clone(),
            Permissions::read_write(),
        );
        instance.add_file(ENV_FILE, artifacts.env.clone(), Permissions::read_write());

        for file in &artifacts.config_files {
            let perms = if file.executable {
                Permissions::executable()
            } else {
                Permissions::read_write()
            };
            instance.add_file(file.path.as_path(), file.content.clone(), perms);
        }

        instance
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: String, perms: Permissions) {
        self.entries.push(FsEntry::File(FileToWrite {
            path: path.into(),
            content,
            permissions: perms,
        }));
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(FsEntry::Directory(DirectoryToCreate { path: path.into() }));
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidArtifacts {
                resource: self.root.display().to_string(),
                reason: "instance layout is empty".into(),
            });
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            let path = entry.path();

            if path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed {
                    path: path.display().to_string(),
                });
            }

            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath {
                    path: path.display().to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn compose_path(&self) -> PathBuf {
        self.root.join(COMPOSE_FILE)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::File(f) => Some(f),
            _ => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Directory(d) => Some(d),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
    pub permissions: Permissions,
}

#[derive(Debug, Clone)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
}
