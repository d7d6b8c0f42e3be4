//! In-memory student directory.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::{DirectoryError, Page, Student, StudentDirectory};

/// Directory backed by an in-process map keyed by upper-cased student id.
///
/// Useful for demos and tests; every instance starts from its own copy of the
/// seed data.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    students: RwLock<BTreeMap<String, Student>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding `students`. Later duplicates win.
    pub fn with_students(students: impl IntoIterator<Item = Student>) -> Self {
        let map = students
            .into_iter()
            .map(|s| (normalize_id(&s.student_id), s))
            .collect();
        Self {
            students: RwLock::new(map),
        }
    }

    /// Loads seed records from a YAML or JSON file (a list of students).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        // YAML is a superset of JSON, so one parser covers both formats.
        let students: Vec<Student> = serde_yaml::from_str(&content)
            .map_err(|e| DirectoryError::parse(path, e.to_string()))?;

        for student in &students {
            student
                .validate()
                .map_err(|reason| DirectoryError::parse(path, reason))?;
        }

        info!(
            path = %path.display(),
            count = students.len(),
            "Student directory loaded from seed file"
        );
        Ok(Self::with_students(students))
    }

    /// Number of students held.
    pub fn len(&self) -> usize {
        self.students.read().len()
    }

    /// Returns true if the directory holds no students.
    pub fn is_empty(&self) -> bool {
        self.students.read().is_empty()
    }
}

fn normalize_id(student_id: &str) -> String {
    student_id.trim().to_uppercase()
}

#[async_trait]
impl StudentDirectory for InMemoryDirectory {
    async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<Student>, DirectoryError> {
        Ok(self.students.read().get(&normalize_id(student_id)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DirectoryError> {
        let email = email.trim();
        Ok(self
            .students
            .read()
            .values()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, page: usize, per_page: usize) -> Result<Page<Student>, DirectoryError> {
        let students: Vec<Student> = self.students.read().values().cloned().collect();
        Ok(Page::from_slice(&students, page, per_page))
    }

    async fn all(&self) -> Result<Vec<Student>, DirectoryError> {
        Ok(self.students.read().values().cloned().collect())
    }

    async fn upsert(&self, student: Student) -> Result<Option<Student>, DirectoryError> {
        student.validate().map_err(DirectoryError::InvalidRecord)?;

        let id = normalize_id(&student.student_id);
        debug!(student_id = %id, "Upserting student");
        Ok(self.students.write().insert(id, student))
    }

    async fn health_check(&self) -> Result<(), DirectoryError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::student::sample;
    use std::io::Write;

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let directory =
            InMemoryDirectory::with_students([sample("GRW-001", "Ana@Uni.edu", "Physics")]);

        assert!(
            directory
                .find_by_student_id("grw-001")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            directory
                .find_by_email("ana@uni.edu")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            directory
                .find_by_student_id("GRW-404")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let directory = InMemoryDirectory::with_students([
            sample("GRW-003", "c@uni.edu", "Physics"),
            sample("GRW-001", "a@uni.edu", "Physics"),
            sample("GRW-002", "b@uni.edu", "Physics"),
        ]);

        let page = directory.list(1, 2).await.unwrap();
        let ids: Vec<&str> = page.items.iter().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids, vec!["GRW-001", "GRW-002"]);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_upsert_returns_previous() {
        let directory = InMemoryDirectory::new();
        let first = sample("GRW-001", "ana@uni.edu", "Physics");

        assert!(directory.upsert(first.clone()).await.unwrap().is_none());

        let mut updated = first.clone();
        updated.department = "Mathematics".to_string();
        let previous = directory.upsert(updated).await.unwrap();

        assert_eq!(previous, Some(first));
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_record() {
        let directory = InMemoryDirectory::new();
        let mut bad = sample("GRW-001", "ana@uni.edu", "Physics");
        bad.email = "nope".to_string();

        let result = directory.upsert(bad).await;
        assert!(matches!(result, Err(DirectoryError::InvalidRecord(_))));
        assert!(directory.is_empty());
    }

    #[test]
    fn test_from_file_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
- studentId: GRW-001
  firstName: Ana
  lastName: Diaz
  email: ana@uni.edu
  department: Physics
  faculty: Science
  graduationYear: 2022
  certificateNumber: CERT-0001
- studentId: GRW-002
  firstName: Luis
  lastName: Mora
  email: luis@uni.edu
  department: History
  faculty: Humanities
  graduationYear: 2021
"#
        )
        .unwrap();

        let directory = InMemoryDirectory::from_file(file.path()).unwrap();
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "- not: [a, student").unwrap();

        let result = InMemoryDirectory::from_file(file.path());
        assert!(matches!(result, Err(DirectoryError::Parse { .. })));
    }

    #[test]
    fn test_from_file_missing() {
        let result = InMemoryDirectory::from_file("/nonexistent/students.yml");
        assert!(matches!(result, Err(DirectoryError::Io(_))));
    }
}
