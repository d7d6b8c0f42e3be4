//! Student lookups and writes.

use std::sync::Arc;

use alumni_cache::keys::{composite_key, email_key, id_key};
use alumni_cache::{CacheRegistry, Namespace};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{DASHBOARD, STUDENT_PAGES, STUDENTS, ServiceError, VERIFY};
use crate::directory::{Page, Student, StudentDirectory};

/// Largest page size accepted by [`StudentService::page`].
pub const MAX_PER_PAGE: usize = 100;

/// Result of [`StudentService::upsert`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertOutcome {
    /// True if no student with that id existed before.
    pub created: bool,
    pub student: Student,
}

/// Servicio de estudiantes con cache por email y por pagina.
#[derive(Clone)]
pub struct StudentService {
    cache: CacheRegistry,
    by_email: Arc<Namespace<Option<Student>>>,
    pages: Arc<Namespace<Page<Student>>>,
    directory: Arc<dyn StudentDirectory>,
}

impl StudentService {
    /// Creates the service. The `students` and `student_pages` namespaces must
    /// be registered.
    pub fn new(
        cache: &CacheRegistry,
        directory: Arc<dyn StudentDirectory>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            cache: cache.clone(),
            by_email: cache.namespace::<Option<Student>>(STUDENTS)?,
            pages: cache.namespace::<Page<Student>>(STUDENT_PAGES)?,
            directory,
        })
    }

    /// Busca un estudiante por email. Unknown emails are cached as `None`.
    #[instrument(skip(self))]
    pub async fn by_email(&self, email: &str) -> Result<Option<Student>, ServiceError> {
        let key = email_key(email);
        let directory = Arc::clone(&self.directory);
        let lookup = key.clone();

        let student = self
            .by_email
            .get(&key, move || async move {
                debug!(email = %lookup, "Loading student by email");
                anyhow::Ok(directory.find_by_email(&lookup).await?)
            })
            .await?;

        Ok(student)
    }

    /// Returns one page of the student listing.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page number
    /// * `per_page` - Page size, between 1 and [`MAX_PER_PAGE`]
    #[instrument(skip(self))]
    pub async fn page(&self, page: usize, per_page: usize) -> Result<Page<Student>, ServiceError> {
        if page == 0 {
            return Err(ServiceError::invalid_input("page must be at least 1"));
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(ServiceError::invalid_input(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }

        let key = page_key(page, per_page);
        let directory = Arc::clone(&self.directory);

        let listing = self
            .pages
            .get(&key, move || async move {
                anyhow::Ok(directory.list(page, per_page).await?)
            })
            .await?;

        Ok(listing)
    }

    /// Writes a student through to the directory and drops every cached view
    /// that may include it.
    ///
    /// Invalidates the old and new email keys, the verification result, every
    /// cached page and the whole dashboard namespace.
    #[instrument(skip(self, student))]
    pub async fn upsert(
        &self,
        student_id: &str,
        mut student: Student,
    ) -> Result<UpsertOutcome, ServiceError> {
        let id = id_key(student_id);
        if id.is_empty() {
            return Err(ServiceError::invalid_input("student id cannot be empty"));
        }
        if !student.student_id.trim().is_empty() && id_key(&student.student_id) != id {
            return Err(ServiceError::invalid_input(format!(
                "student id in body '{}' does not match path '{}'",
                student.student_id, id
            )));
        }
        student.student_id = id.clone();
        student.validate().map_err(ServiceError::InvalidInput)?;

        let previous = self.directory.upsert(student.clone()).await?;

        self.by_email.invalidate(&email_key(&student.email));
        if let Some(previous) = &previous {
            self.by_email.invalidate(&email_key(&previous.email));
        }
        self.cache.invalidate(VERIFY, &id)?;
        let pages = self.pages.invalidate_matching("page:*");
        let dashboard = self.cache.clear(DASHBOARD)?;

        info!(
            student_id = %id,
            created = previous.is_none(),
            pages_invalidated = pages.count,
            dashboard_cleared = dashboard,
            "Student saved, dependent cache entries invalidated"
        );

        Ok(UpsertOutcome {
            created: previous.is_none(),
            student,
        })
    }
}

/// Key of a cached listing page, e.g. `page:2:20`.
pub fn page_key(page: usize, per_page: usize) -> String {
    composite_key(&["page".to_string(), page.to_string(), per_page.to_string()])
}
