use serde::Serialize;

use crate::{auth::password::verify_password, config::AdminConfig, db::escape_like, personas::Persona};

pub const PER_PAGE: i64 = 20;

/// Chat totals keyed by stored character name.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct PersonaCounts {
    pub english_teacher: i64,
    pub doctor: i64,
    pub lawyer: i64,
}

impl PersonaCounts {
    pub fn from_rows(rows: &[(String, i64)]) -> Self {
        let mut counts = Self::default();
        for (character, n) in rows {
            match Persona::from_character(character) {
                Some(Persona::English) => counts.english_teacher += n,
                Some(Persona::Doctor) => counts.doctor += n,
                Some(Persona::Lawyer) => counts.lawyer += n,
                None => {}
            }
        }
        counts
    }
}

/// Clamps a 1-based page and returns it with its row offset.
pub fn page_offset(page: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    (page, (page - 1).saturating_mul(PER_PAGE))
}

pub fn total_pages(total: i64) -> i64 {
    (total + PER_PAGE - 1) / PER_PAGE
}

/// Case-insensitive "contains" pattern for `ILIKE`, or `None` for blank input.
pub fn contains_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)))
}

/// Checks a login attempt against the configured admin credential.
/// `None` means the panel is disabled.
pub fn check_credentials(cfg: &AdminConfig, email: &str, password: &str) -> Option<bool> {
    let (Some(admin_email), Some(hash)) = (cfg.email.as_deref(), cfg.password_hash.as_deref())
    else {
        return None;
    };
    if !email.trim().eq_ignore_ascii_case(admin_email) {
        return Some(false);
    }
    Some(verify_password(password, hash).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    #[test]
    fn pages_are_one_based_and_clamped() {
        assert_eq!(page_offset(None), (1, 0));
        assert_eq!(page_offset(Some(3)), (3, 40));
        assert_eq!(page_offset(Some(-4)), (1, 0));
        assert_eq!(page_offset(Some(i64::MAX)), (i64::MAX, i64::MAX));
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(20), 1);
        assert_eq!(total_pages(21), 2);
    }

    #[test]
    fn search_patterns() {
        assert_eq!(contains_pattern(None), None);
        assert_eq!(contains_pattern(Some("   ")), None);
        assert_eq!(contains_pattern(Some(" Bob ")).as_deref(), Some("%Bob%"));
        assert_eq!(contains_pattern(Some("50%")).as_deref(), Some("%50\\%%"));
    }

    #[test]
    fn persona_counts_ignore_unknown_characters() {
        let rows = vec![
            ("lawyer".to_string(), 4),
            ("english_teacher".to_string(), 1),
            ("pirate".to_string(), 9),
        ];
        assert_eq!(
            PersonaCounts::from_rows(&rows),
            PersonaCounts {
                english_teacher: 1,
                doctor: 0,
                lawyer: 4
            }
        );
    }

    #[test]
    fn credentials() {
        let disabled = AdminConfig {
            email: None,
            password_hash: None,
        };
        assert_eq!(check_credentials(&disabled, "a@b.c", "x"), None);

        let cfg = AdminConfig {
            email: Some("admin@example.com".into()),
            password_hash: Some(hash_password("s3cret!").unwrap()),
        };
        assert_eq!(check_credentials(&cfg, "Admin@Example.com", "s3cret!"), Some(true));
        assert_eq!(check_credentials(&cfg, "admin@example.com", "wrong"), Some(false));
        assert_eq!(check_credentials(&cfg, "other@example.com", "s3cret!"), Some(false));
    }
}
