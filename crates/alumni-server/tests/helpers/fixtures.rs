//! Estado y datos de prueba.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use alumni_server::AppState;
use alumni_server::directory::{
    DirectoryError, InMemoryDirectory, Page, Student, StudentDirectory,
};
use async_trait::async_trait;

/// Builds a student with predictable names.
pub fn student(student_id: &str, email: &str, department: &str, faculty: &str) -> Student {
    Student {
        student_id: student_id.to_string(),
        first_name: "Ana".to_string(),
        last_name: "Diaz".to_string(),
        email: email.to_string(),
        department: department.to_string(),
        faculty: faculty.to_string(),
        graduation_year: 2022,
        certificate_number: Some(format!("CERT-{}", student_id)),
    }
}

/// Directory with three students across two faculties.
pub fn seeded_directory() -> InMemoryDirectory {
    InMemoryDirectory::with_students([
        student("GRW-001", "ana@uni.edu", "Computer Science", "Engineering"),
        student("GRW-002", "luis@uni.edu", "History", "Humanities"),
        student("GRW-003", "eva@uni.edu", "Computer Science", "Engineering"),
    ])
}

/// App state over [`seeded_directory`] with the default namespaces.
pub fn test_state() -> AppState {
    AppState::with_defaults(Arc::new(seeded_directory())).expect("Failed to build state")
}

/// Directory whose reads always fail and count how often they were tried.
pub struct FailingDirectory {
    transient: bool,
    calls: AtomicUsize,
}

impl FailingDirectory {
    /// `transient` selects `Unavailable` (503) over an I/O error (500).
    pub fn new(transient: bool) -> Self {
        Self {
            transient,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> DirectoryError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.transient {
            DirectoryError::unavailable("connection refused")
        } else {
            DirectoryError::Io(std::io::Error::other("disk failure"))
        }
    }
}

#[async_trait]
impl StudentDirectory for FailingDirectory {
    async fn find_by_student_id(
        &self,
        _student_id: &str,
    ) -> Result<Option<Student>, DirectoryError> {
        Err(self.fail())
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<Student>, DirectoryError> {
        Err(self.fail())
    }

    async fn list(&self, _page: usize, _per_page: usize) -> Result<Page<Student>, DirectoryError> {
        Err(self.fail())
    }

    async fn all(&self) -> Result<Vec<Student>, DirectoryError> {
        Err(self.fail())
    }

    async fn upsert(&self, _student: Student) -> Result<Option<Student>, DirectoryError> {
        Err(self.fail())
    }

    async fn health_check(&self) -> Result<(), DirectoryError> {
        Err(self.fail())
    }

    fn name(&self) -> &str {
        "failing"
    }
}
