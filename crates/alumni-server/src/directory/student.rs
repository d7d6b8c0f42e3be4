//! Student records and paging.

use serde::{Deserialize, Serialize};

/// A graduate as stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Public identifier printed on certificates, e.g. `GRW-001`.
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub faculty: String,
    pub graduation_year: u16,
    /// Numero de certificado, si ya fue emitido
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_number: Option<String>,
}

impl Student {
    /// Nombre completo para mostrar.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Valida los campos obligatorios.
    pub fn validate(&self) -> Result<(), String> {
        if self.student_id.trim().is_empty() {
            return Err("Student id cannot be empty".to_string());
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("Student name cannot be empty".to_string());
        }
        if !self.email.contains('@') {
            return Err(format!("Invalid email address: {}", self.email));
        }
        if self.department.trim().is_empty() || self.faculty.trim().is_empty() {
            return Err("Department and faculty are required".to_string());
        }
        Ok(())
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// Slices `all` into the requested page. Pages past the end are empty.
    pub fn from_slice(all: &[T], page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = all.len();
        let start = (page - 1).saturating_mul(per_page).min(total);
        let end = start.saturating_add(per_page).min(total);

        Self {
            items: all[start..end].to_vec(),
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample(student_id: &str, email: &str, department: &str) -> Student {
    Student {
        student_id: student_id.to_string(),
        first_name: "Ana".to_string(),
        last_name: "Diaz".to_string(),
        email: email.to_string(),
        department: department.to_string(),
        faculty: "Engineering".to_string(),
        graduation_year: 2023,
        certificate_number: Some(format!("CERT-{}", student_id)),
    }
}
