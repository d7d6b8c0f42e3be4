//! Key normalization helpers for cache consumers.
//!
//! The cache compares keys byte for byte. Callers that derive keys from
//! user input normalize them here so `Ana@Uni.edu` and `ana@uni.edu` share
//! an entry.

/// Normaliza un email: sin espacios y en minusculas.
///
/// ```
/// use alumni_cache::keys::email_key;
///
/// assert_eq!(email_key("  Ana.Diaz@Uni.EDU "), "ana.diaz@uni.edu");
/// ```
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normaliza un identificador (ej. `grw-001` -> `GRW-001`).
///
/// ```
/// use alumni_cache::keys::id_key;
///
/// assert_eq!(id_key(" grw-001"), "GRW-001");
/// ```
pub fn id_key(id: &str) -> String {
    id.trim().to_uppercase()
}

/// Joins key parts with `:`, e.g. `page:2:20`.
///
/// ```
/// use alumni_cache::keys::composite_key;
///
/// assert_eq!(composite_key(&["page", "2", "20"]), "page:2:20");
/// ```
pub fn composite_key<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_key_normalization() {
        assert_eq!(email_key("Ana@Uni.edu"), email_key("ana@uni.edu "));
    }

    #[test]
    fn test_id_key_normalization() {
        assert_eq!(id_key("grw-001"), "GRW-001");
        assert_eq!(id_key("GRW-001"), "GRW-001");
    }

    #[test]
    fn test_composite_key() {
        let page = 3.to_string();
        assert_eq!(composite_key(&["page", page.as_str(), "50"]), "page:3:50");
        assert_eq!(composite_key(&[String::from("single")]), "single");
        assert_eq!(composite_key::<&str>(&[]), "");
    }
}
