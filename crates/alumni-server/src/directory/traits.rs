//! Student directory trait definition.

use async_trait::async_trait;

use super::{DirectoryError, Page, Student};

/// The system of record for graduates.
///
/// Handlers never call a directory directly on hot paths; the services put a
/// cache namespace in front of it. Lookups return `Ok(None)` for unknown
/// students so the absence can be cached too.
///
/// # Implementors
///
/// - `InMemoryDirectory` - Records held in memory, optionally seeded from a file
/// - (Future) a relational backend
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// Finds a student by public id (`GRW-001`). Ids compare case-insensitively.
    async fn find_by_student_id(&self, student_id: &str)
    -> Result<Option<Student>, DirectoryError>;

    /// Finds a student by email. Emails compare case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DirectoryError>;

    /// Lists students ordered by id.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page number
    /// * `per_page` - Page size
    async fn list(&self, page: usize, per_page: usize) -> Result<Page<Student>, DirectoryError>;

    /// Returns every student, for aggregations.
    async fn all(&self) -> Result<Vec<Student>, DirectoryError>;

    /// Inserts or replaces a student. Returns the previous record, if any.
    async fn upsert(&self, student: Student) -> Result<Option<Student>, DirectoryError>;

    /// Verifies that the directory is reachable.
    async fn health_check(&self) -> Result<(), DirectoryError>;

    /// Returns the name of this directory, for logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::student::sample;

    struct FixedDirectory {
        student: Student,
    }

    #[async_trait]
    impl StudentDirectory for FixedDirectory {
        async fn find_by_student_id(
            &self,
            student_id: &str,
        ) -> Result<Option<Student>, DirectoryError> {
            Ok((self.student.student_id == student_id).then(|| self.student.clone()))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DirectoryError> {
            Ok((self.student.email == email).then(|| self.student.clone()))
        }

        async fn list(
            &self,
            page: usize,
            per_page: usize,
        ) -> Result<Page<Student>, DirectoryError> {
            Ok(Page::from_slice(&[self.student.clone()], page, per_page))
        }

        async fn all(&self) -> Result<Vec<Student>, DirectoryError> {
            Ok(vec![self.student.clone()])
        }

        async fn upsert(&self, _student: Student) -> Result<Option<Student>, DirectoryError> {
            Err(DirectoryError::unavailable("read-only"))
        }

        async fn health_check(&self) -> Result<(), DirectoryError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_trait_object_lookup() {
        let directory: Box<dyn StudentDirectory> = Box::new(FixedDirectory {
            student: sample("GRW-001", "ana@uni.edu", "Physics"),
        });

        let found = directory.find_by_student_id("GRW-001").await.unwrap();
        assert_eq!(found.unwrap().email, "ana@uni.edu");
        assert!(directory.find_by_email("bob@uni.edu").await.unwrap().is_none());
        assert_eq!(directory.list(1, 10).await.unwrap().total, 1);
        assert!(directory.upsert(sample("X", "x@uni.edu", "Y")).await.is_err());
        assert_eq!(directory.name(), "fixed");
    }
}
