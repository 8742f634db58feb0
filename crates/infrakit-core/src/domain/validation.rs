use crate::domain::{
    entities::{ResourceArtifacts, ResourceDescriptor, ResourceInstance},
    error::DomainError,
    value_objects::CatalogType,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    /// Every name must be in the catalog; the first unknown name rejects the
    /// whole batch.
    pub fn validate_batch(
        catalog: CatalogType,
        known: &[ResourceDescriptor],
        names: &[String],
    ) -> Result<(), DomainError> {
        if names.is_empty() {
            return Err(DomainError::EmptyBatch {
                catalog: catalog.to_string(),
            });
        }

        for name in names {
            if !known.iter().any(|d| d.catalog == catalog && d.name == name.as_str()) {
                return Err(DomainError::UnknownResource {
                    catalog: catalog.to_string(),
                    name: name.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn validate_artifacts(
        resource: &str,
        artifacts: &ResourceArtifacts,
    ) -> Result<(), DomainError> {
        artifacts.validate(resource)
    }

    pub fn validate_instance(instance: &ResourceInstance) -> Result<(), DomainError> {
        instance.validate()
    }
}
