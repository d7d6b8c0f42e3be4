//! Public certificate verification.

use std::sync::Arc;

use alumni_cache::keys::id_key;
use alumni_cache::{CacheRegistry, Namespace};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{ServiceError, VERIFY};
use crate::directory::{Student, StudentDirectory};

/// Resultado de una verificacion de certificado.
///
/// Unknown ids produce `found: false`; that answer is cached like a positive
/// one so repeated lookups of a bad id do not reach the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_number: Option<String>,
}

impl Verification {
    /// The negative answer.
    pub fn not_found() -> Self {
        Self {
            found: false,
            student_id: None,
            full_name: None,
            department: None,
            faculty: None,
            graduation_year: None,
            certificate_number: None,
        }
    }

    /// Public view of a student. Email is deliberately left out.
    pub fn from_student(student: &Student) -> Self {
        Self {
            found: true,
            student_id: Some(student.student_id.clone()),
            full_name: Some(student.full_name()),
            department: Some(student.department.clone()),
            faculty: Some(student.faculty.clone()),
            graduation_year: Some(student.graduation_year),
            certificate_number: student.certificate_number.clone(),
        }
    }
}

/// Verifies student ids against the directory through the `verify` namespace.
#[derive(Clone)]
pub struct VerificationService {
    cache: Arc<Namespace<Verification>>,
    directory: Arc<dyn StudentDirectory>,
}

impl VerificationService {
    /// Creates the service. The `verify` namespace must be registered.
    pub fn new(
        cache: &CacheRegistry,
        directory: Arc<dyn StudentDirectory>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            cache: cache.namespace::<Verification>(VERIFY)?,
            directory,
        })
    }

    /// Verifica un id de estudiante (`grw-001` y `GRW-001` son el mismo).
    #[instrument(skip(self))]
    pub async fn verify(&self, student_id: &str) -> Result<Verification, ServiceError> {
        let key = id_key(student_id);
        let directory = Arc::clone(&self.directory);
        let lookup_id = key.clone();

        let verification = self
            .cache
            .get(&key, move || async move {
                debug!(student_id = %lookup_id, "Verifying student against directory");
                let student = directory.find_by_student_id(&lookup_id).await?;
                anyhow::Ok(
                    student
                        .as_ref()
                        .map(Verification::from_student)
                        .unwrap_or_else(Verification::not_found),
                )
            })
            .await?;

        Ok(verification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::directory::student::sample;
    use crate::services::{default_namespaces, register_namespaces};

    fn service(students: Vec<Student>) -> VerificationService {
        let cache = CacheRegistry::new();
        register_namespaces(&cache, &default_namespaces()).unwrap();
        VerificationService::new(&cache, Arc::new(InMemoryDirectory::with_students(students)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_verify_found() {
        let service = service(vec![sample("GRW-001", "ana@uni.edu", "Physics")]);

        let verification = service.verify("grw-001").await.unwrap();

        assert!(verification.found);
        assert_eq!(verification.full_name.as_deref(), Some("Ana Diaz"));
        assert_eq!(
            verification.certificate_number.as_deref(),
            Some("CERT-GRW-001")
        );
    }

    #[tokio::test]
    async fn test_verify_not_found_is_cached() {
        let service = service(vec![]);

        assert_eq!(
            service.verify("GRW-404").await.unwrap(),
            Verification::not_found()
        );
        assert!(service.cache.contains_key("GRW-404"));
        assert_eq!(service.cache.stats().entries, 1);
    }

    #[tokio::test]
    async fn test_verify_empty_id() {
        let service = service(vec![]);

        let result = service.verify("   ").await;
        assert!(matches!(
            result,
            Err(ServiceError::Cache(alumni_cache::CacheError::EmptyKey))
        ));
    }

    #[test]
    fn test_not_found_serializes_compactly() {
        let json = serde_json::to_value(Verification::not_found()).unwrap();
        assert_eq!(json, serde_json::json!({ "found": false }));
    }

    #[test]
    fn test_new_requires_namespace() {
        let result = VerificationService::new(
            &CacheRegistry::new(),
            Arc::new(InMemoryDirectory::new()),
        );
        assert!(matches!(
            result,
            Err(ServiceError::Cache(alumni_cache::CacheError::NamespaceNotFound(_)))
        ));
    }
}
