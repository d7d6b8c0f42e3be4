//! Dashboard aggregates.

use std::collections::BTreeMap;
use std::sync::Arc;

use alumni_cache::{CacheRegistry, Namespace};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{DASHBOARD, ServiceError};
use crate::directory::{Student, StudentDirectory};

const SUMMARY_KEY: &str = "summary";

/// Resumen agregado para el dashboard de administracion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_students: usize,
    pub with_certificate: usize,
    pub by_department: BTreeMap<String, usize>,
    pub by_faculty: BTreeMap<String, usize>,
    pub by_graduation_year: BTreeMap<u16, usize>,
}

impl DashboardSummary {
    /// Aggregates a full student listing.
    pub fn from_students(students: &[Student]) -> Self {
        let mut summary = Self {
            total_students: students.len(),
            ..Self::default()
        };

        for student in students {
            if student.certificate_number.is_some() {
                summary.with_certificate += 1;
            }
            *summary
                .by_department
                .entry(student.department.clone())
                .or_default() += 1;
            *summary
                .by_faculty
                .entry(student.faculty.clone())
                .or_default() += 1;
            *summary
                .by_graduation_year
                .entry(student.graduation_year)
                .or_default() += 1;
        }

        summary
    }
}

/// Serves the dashboard summary stale-while-revalidate from the `dashboard`
/// namespace.
#[derive(Clone)]
pub struct DashboardService {
    cache: Arc<Namespace<DashboardSummary>>,
    directory: Arc<dyn StudentDirectory>,
}

impl DashboardService {
    /// Creates the service. The `dashboard` namespace must be registered.
    pub fn new(
        cache: &CacheRegistry,
        directory: Arc<dyn StudentDirectory>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            cache: cache.namespace::<DashboardSummary>(DASHBOARD)?,
            directory,
        })
    }

    /// Returns the current summary.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<DashboardSummary, ServiceError> {
        let directory = Arc::clone(&self.directory);

        let summary = self
            .cache
            .get(SUMMARY_KEY, move || async move {
                let students = directory.all().await?;
                debug!(count = students.len(), "Aggregating dashboard summary");
                anyhow::Ok(DashboardSummary::from_students(&students))
            })
            .await?;

        Ok(summary)
    }
}
