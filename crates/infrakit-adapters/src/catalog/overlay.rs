//! Built-in catalog with user template bundles layered on top.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use infrakit_core::{
    application::ports::ResourceCatalog,
    domain::{CatalogType, ResourceArtifacts, ResourceDescriptor},
    error::InfrakitResult,
};

use crate::catalog::BuiltinCatalog;
use crate::template_loader::{TemplateBundle, TemplateBundleLoader};

/// Same names and order as [`BuiltinCatalog`]; rendering prefers a loaded
/// bundle over the embedded artifacts.
#[derive(Debug, Clone, Default)]
pub struct OverlayCatalog {
    overrides: HashMap<(CatalogType, String), ResourceArtifacts>,
}

impl OverlayCatalog {
    pub fn new(bundles: Vec<TemplateBundle>) -> Self {
        Self {
            overrides: bundles
                .into_iter()
                .map(|b| ((b.catalog, b.name), b.artifacts))
                .collect(),
        }
    }

    /// Load every bundle under `dir`.
    pub fn from_dir(dir: &Path) -> InfrakitResult<Self> {
        let bundles = TemplateBundleLoader::new(dir).load_all()?;
        info!(count = bundles.len(), dir = %dir.display(), "Template overrides loaded");
        Ok(Self::new(bundles))
    }

    pub fn is_overridden(&self, catalog: CatalogType, name: &str) -> bool {
        self.overrides.contains_key(&(catalog, name.to_string()))
    }
}

impl ResourceCatalog for OverlayCatalog {
    fn list(&self, catalog: CatalogType) -> Vec<ResourceDescriptor> {
        BuiltinCatalog.list(catalog)
    }

    fn render(&self, descriptor: &ResourceDescriptor) -> InfrakitResult<ResourceArtifacts> {
        Ok(self
            .overrides
            .get(&(descriptor.catalog, descriptor.name.to_string()))
            .cloned()
            .unwrap_or_else(|| descriptor.generate()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_replaces_only_its_resource() {
        let custom = ResourceArtifacts::new("services: {custom: {}}\n", "X=1\n");
        let catalog = OverlayCatalog::new(vec![TemplateBundle {
            catalog: CatalogType::Infra,
            name: "redis".into(),
            artifacts: custom.clone(),
        }]);

        let redis = BuiltinCatalog::find(CatalogType::Infra, "redis").unwrap();
        let postgres = BuiltinCatalog::find(CatalogType::Infra, "postgres").unwrap();

        assert!(catalog.is_overridden(CatalogType::Infra, "redis"));
        assert_eq!(catalog.render(&redis).unwrap(), custom);
        assert_eq!(catalog.render(&postgres).unwrap(), postgres.generate());
        assert_eq!(catalog.list(CatalogType::Infra).len(), 5);
    }
}
