//! Listing primitives: filters, sorting, pagination and aggregates

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

use super::entity::User;

/// Page size used when the caller gives no usable limit
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Column a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    FirstName,
    #[default]
    LastName,
}

impl SortKey {
    pub fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Requested ordering. Without a direction no ordering is applied and the
/// store returns rows in whatever order it likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserSort {
    pub key: SortKey,
    pub direction: Option<SortDirection>,
}

impl UserSort {
    pub fn new(key: Option<SortKey>, direction: Option<SortDirection>) -> Self {
        Self {
            key: key.unwrap_or_default(),
            direction,
        }
    }

    /// The effective ordering, if any
    pub fn order(&self) -> Option<(SortKey, SortDirection)> {
        self.direction.map(|direction| (self.key, direction))
    }
}

/// Which soft-delete state a single-record lookup accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    Active,
    Removed,
    Any,
}

impl RecordScope {
    pub fn admits(self, user: &User) -> bool {
        match self {
            Self::Active => !user.is_deleted,
            Self::Removed => user.is_deleted,
            Self::Any => true,
        }
    }
}

/// Listing filter. Both variants only ever match users that are not
/// soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// Case-insensitive substring match on first name OR last name
    NameContains(String),
    /// Decimal text of the identity-card number starts with the prefix
    IdentityCardPrefix(String),
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if user.is_deleted {
            return false;
        }

        match self {
            Self::NameContains(search) => {
                let needle = search.to_lowercase();
                user.first_name.to_lowercase().contains(&needle)
                    || user.last_name.to_lowercase().contains(&needle)
            }
            Self::IdentityCardPrefix(prefix) => user.dni.to_string().starts_with(prefix.as_str()),
        }
    }

    /// LIKE pattern for the store, with wildcards in the input escaped
    pub fn like_pattern(&self) -> String {
        match self {
            Self::NameContains(search) => format!("%{}%", escape_like(search)),
            Self::IdentityCardPrefix(prefix) => format!("{}%", escape_like(prefix)),
        }
    }
}

/// Escape LIKE special characters (`%`, `_`, `\`) so they match literally
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Offset/limit window over a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a window from raw query-string values. Absent, non-numeric or
    /// negative values fall back to the defaults; a zero limit does too.
    /// Numbers too large to represent saturate.
    pub fn parse(limit: Option<&str>, skip: Option<&str>) -> Self {
        let limit = limit
            .and_then(parse_count)
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        let skip = skip.and_then(parse_count).unwrap_or(0);

        Self { skip, limit }
    }

    /// Number of pages needed for `count` matching rows
    pub fn page_count(&self, count: u64) -> u64 {
        if count == 0 {
            return 0;
        }
        (count - 1) / self.limit + 1
    }
}

fn parse_count(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

/// One page of a user listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPage {
    pub data: Vec<User>,
    /// Rows matching the filter across all pages
    pub count: u64,
    /// Number of pages
    pub total: u64,
}

/// Registration statistics for the current day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserStats {
    pub total: u64,
    pub today: u64,
    pub percentage: f64,
}

impl UserStats {
    pub fn new(total: u64, today: u64) -> Self {
        let percentage = if today == 0 || total == 0 {
            0.0
        } else {
            today as f64 * 100.0 / total as f64
        };

        Self {
            total,
            today,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(first: &str, last: &str, dni: i32, deleted: bool) -> User {
        let now = Utc::now();
        User {
            id: 1,
            first_name: first.to_string(),
            last_name: last.to_string(),
            dni,
            area_code: 11,
            phone: 1122223333,
            email: None,
            is_deleted: deleted,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_page_request_defaults() {
        assert_eq!(PageRequest::parse(None, None), PageRequest::default());
        assert_eq!(PageRequest::default().limit, 100);
        assert_eq!(PageRequest::default().skip, 0);
    }

    #[test]
    fn test_page_request_parses_numbers() {
        let page = PageRequest::parse(Some("25"), Some("50"));
        assert_eq!(page.limit, 25);
        assert_eq!(page.skip, 50);
    }

    #[test]
    fn test_page_request_falls_back_on_garbage() {
        let page = PageRequest::parse(Some("many"), Some("-3"));
        assert_eq!(page, PageRequest::default());

        let zero = PageRequest::parse(Some("0"), None);
        assert_eq!(zero.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_page_request_keeps_large_values() {
        let page = PageRequest::parse(Some("5000000000"), Some("5000000000"));
        assert_eq!(page.limit, 5_000_000_000);
        assert_eq!(page.skip, 5_000_000_000);

        let page = PageRequest::parse(None, Some("99999999999999999999999"));
        assert_eq!(page.skip, u64::MAX);
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_page_count() {
        let page = PageRequest::parse(Some("10"), None);
        assert_eq!(page.page_count(0), 0);
        assert_eq!(page.page_count(1), 1);
        assert_eq!(page.page_count(10), 1);
        assert_eq!(page.page_count(11), 2);
        assert_eq!(PageRequest::default().page_count(250), 3);
    }

    #[test]
    fn test_sort_defaults_to_last_name_without_order() {
        let sort = UserSort::new(None, None);
        assert_eq!(sort.key, SortKey::LastName);
        assert!(sort.order().is_none());

        let sort = UserSort::new(None, Some(SortDirection::Desc));
        assert_eq!(sort.order(), Some((SortKey::LastName, SortDirection::Desc)));
    }

    #[test]
    fn test_sort_key_deserializes_from_query_names() {
        let key: SortKey = serde_json::from_str("\"firstName\"").unwrap();
        assert_eq!(key, SortKey::FirstName);
        assert!(serde_json::from_str::<SortKey>("\"dni\"").is_err());
    }

    #[test]
    fn test_name_filter_is_case_insensitive_on_either_name() {
        let filter = UserFilter::NameContains("RNAN".to_string());
        assert!(filter.matches(&user("Lucia", "Fernandez", 30123456, false)));
        assert!(filter.matches(&user("Hernan", "Paz", 30123457, false)));
        assert!(!filter.matches(&user("Ana", "Paz", 30123458, false)));
    }

    #[test]
    fn test_filters_never_match_removed_users() {
        let filter = UserFilter::NameContains(String::new());
        assert!(!filter.matches(&user("Lucia", "Fernandez", 30123456, true)));

        let filter = UserFilter::IdentityCardPrefix("30".to_string());
        assert!(!filter.matches(&user("Lucia", "Fernandez", 30123456, true)));
    }

    #[test]
    fn test_identity_card_prefix() {
        let filter = UserFilter::IdentityCardPrefix("123".to_string());
        assert!(filter.matches(&user("Ana", "Paz", 1234567, false)));
        assert!(!filter.matches(&user("Ana", "Paz", 4123567, false)));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let filter = UserFilter::NameContains("50%_off".to_string());
        assert_eq!(filter.like_pattern(), "%50\\%\\_off%");

        let filter = UserFilter::IdentityCardPrefix("123".to_string());
        assert_eq!(filter.like_pattern(), "123%");
    }

    #[test]
    fn test_user_stats_percentage() {
        let stats = UserStats::new(8, 5);
        assert_eq!(stats.percentage, 62.5);

        let stats = UserStats::new(8, 0);
        assert_eq!(stats.percentage, 0.0);
    }
}
