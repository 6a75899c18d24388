//! # Employee Records - Domain Model
//!
//! Core entities, request payloads and value objects for the employee
//! records service. These types are shared by the persistence layer and the
//! HTTP API, and are the only shapes ever serialized to clients or the cache.

use chrono::{DateTime, FixedOffset, Months, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Accepted date-of-birth input format, e.g. `1990-01-01 00:00 +0000`.
pub const DOB_FORMAT: &str = "%Y-%m-%d %H:%M %z";

/// Minimum age, in years, an employee must have at create/update time.
pub const MINIMUM_AGE_YEARS: u32 = 20;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 10_000;
pub const DEFAULT_PAGE: i64 = 1;

// =============================================================================
// ENTITIES
// =============================================================================

/// Employee snapshot as seen by clients and stored in the cache.
///
/// The soft-delete `active` flag lives only in the record store and is never
/// part of this type. `Default` is the zero value used as a placeholder when
/// an id disappears between listing and fetching.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub dob: DateTime<FixedOffset>,
}

impl Employee {
    pub fn new(id: i64, name: impl Into<String>, dob: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            name: name.into(),
            dob,
        }
    }
}

/// One page of employees plus the total number of active employees.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeList {
    pub employees: Vec<Employee>,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Payload for creating an employee. `dob` is kept raw until validated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeCreateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dob: String,
}

impl EmployeeCreateRequest {
    pub fn new(name: impl Into<String>, dob: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dob: dob.into(),
        }
    }

    /// Trim surrounding whitespace from every field.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.dob);
    }

    /// Check required fields and the age rule, returning the parsed dob.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] describing the first failing rule.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<DateTime<FixedOffset>, DomainError> {
        validate_fields(&self.name, &self.dob, now)
    }
}

/// Payload for updating an employee. The id comes from the request path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeUpdateRequest {
    #[serde(skip)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dob: String,
}

impl EmployeeUpdateRequest {
    pub fn new(id: i64, name: impl Into<String>, dob: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            dob: dob.into(),
        }
    }

    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.dob);
    }

    /// # Errors
    ///
    /// Returns a [`DomainError`] describing the first failing rule.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<DateTime<FixedOffset>, DomainError> {
        validate_fields(&self.name, &self.dob, now)
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn validate_fields(
    name: &str,
    dob: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<FixedOffset>, DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::MissingField("name"));
    }
    if dob.trim().is_empty() {
        return Err(DomainError::MissingField("dob"));
    }
    validate_dob(dob, now)
}

// =============================================================================
// DATE OF BIRTH
// =============================================================================

/// Parse a date of birth in [`DOB_FORMAT`]. Format only, no age rule.
///
/// # Errors
///
/// Returns [`DomainError::InvalidDob`] when the input does not match.
pub fn parse_dob(raw: &str) -> Result<DateTime<FixedOffset>, DomainError> {
    DateTime::parse_from_str(raw.trim(), DOB_FORMAT).map_err(|e| DomainError::InvalidDob {
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a date of birth and require it to be at least
/// [`MINIMUM_AGE_YEARS`] before `now`.
///
/// # Errors
///
/// Returns [`DomainError::InvalidDob`] or [`DomainError::Underage`].
pub fn validate_dob(raw: &str, now: DateTime<Utc>) -> Result<DateTime<FixedOffset>, DomainError> {
    let dob = parse_dob(raw)?;
    let cutoff = now
        .checked_sub_months(Months::new(MINIMUM_AGE_YEARS * 12))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    if dob.with_timezone(&Utc) > cutoff {
        return Err(DomainError::Underage {
            min_years: MINIMUM_AGE_YEARS,
        });
    }
    Ok(dob)
}

// =============================================================================
// QUERY/FILTER TYPES
// =============================================================================

/// Pagination parameters for list queries.
///
/// Only built through [`Pagination::new`] or [`Pagination::from_query`], so
/// `limit` always lies in `[0, MAX_PER_PAGE]` and `page` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    page: i64,
}

impl Pagination {
    /// Build from optional values. A missing or negative `per_page` falls back
    /// to the default and is then clamped to `[0, MAX_PER_PAGE]`; a missing or
    /// non-positive `page` becomes the first page.
    #[must_use]
    pub fn new(per_page: Option<i64>, page: Option<i64>) -> Self {
        let limit = match per_page {
            Some(value) if value >= 0 => value,
            _ => DEFAULT_PER_PAGE,
        }
        .clamp(0, MAX_PER_PAGE);

        let page = match page {
            Some(value) if value > 0 => value,
            _ => DEFAULT_PAGE,
        };

        Self { limit, page }
    }

    /// Build from raw query-string values. Blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPagination`] when a value is not an integer.
    pub fn from_query(per_page: Option<&str>, page: Option<&str>) -> Result<Self, DomainError> {
        let per_page = parse_query_int("perPage", per_page)?;
        let page = parse_query_int("page", page)?;
        Ok(Self::new(per_page, page))
    }

    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.limit.saturating_mul(self.page - 1)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn parse_query_int(param: &'static str, raw: Option<&str>) -> Result<Option<i64>, DomainError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<i64>()
        .map(Some)
        .map_err(|e| DomainError::InvalidPagination {
            param,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid dob '{value}', expected YYYY-MM-DD HH:MM +ZZZZ: {reason}")]
    InvalidDob { value: String, reason: String },

    #[error("dob should be at least {min_years} years before the current date")]
    Underage { min_years: u32 },

    #[error("invalid {param} value '{value}': {reason}")]
    InvalidPagination {
        param: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fake::Fake;
    use fake::faker::name::en::Name;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_dob_keeps_offset() {
        let dob = parse_dob("1990-01-01 00:00 +0530").unwrap();
        assert_eq!(dob.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!(dob.to_rfc3339(), "1990-01-01T00:00:00+05:30");
    }

    #[test]
    fn test_parse_dob_rejects_other_formats() {
        for raw in ["1990-01-01", "01/01/1990 00:00 +0000", "1990-01-01T00:00:00Z", ""] {
            assert!(
                matches!(parse_dob(raw), Err(DomainError::InvalidDob { .. })),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_dob_age_boundary() {
        assert!(validate_dob("2006-10-19 12:00 +0000", now()).is_ok());
        assert_eq!(
            validate_dob("2006-10-19 12:01 +0000", now()),
            Err(DomainError::Underage { min_years: 20 })
        );
        assert!(validate_dob("2010-05-05 00:00 +0000", now()).is_err());
    }

    #[test]
    fn test_create_request_normalize_and_validate() {
        let name: String = Name().fake();
        let mut req = EmployeeCreateRequest::new(format!("  {name} "), " 1990-01-01 00:00 +0000 ");
        req.normalize();

        assert_eq!(req.name, name);
        assert_eq!(req.dob, "1990-01-01 00:00 +0000");
        assert!(req.validate(now()).is_ok());
    }

    #[test]
    fn test_update_request_requires_fields() {
        let req = EmployeeUpdateRequest::new(7, "   ", "1990-01-01 00:00 +0000");
        assert_eq!(req.validate(now()), Err(DomainError::MissingField("name")));

        let req = EmployeeUpdateRequest::new(7, "Alice", "");
        assert_eq!(req.validate(now()), Err(DomainError::MissingField("dob")));
    }

    #[test]
    fn test_update_request_id_not_deserialized() {
        let req: EmployeeUpdateRequest =
            serde_json::from_str(r#"{"id": 99, "name": "Bob", "dob": "1980-02-02 10:30 +0100"}"#)
                .unwrap();
        assert_eq!(req.id, 0);
        assert_eq!(req.name, "Bob");
    }

    #[test]
    fn test_employee_list_json_shape() {
        let dob = parse_dob("1990-01-01 00:00 +0000").unwrap();
        let list = EmployeeList {
            employees: vec![Employee::new(1, "Alice", dob)],
            total_count: 1,
        };
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["employees"][0]["name"], "Alice");
        assert_eq!(json["employees"][0]["dob"], "1990-01-01T00:00:00Z");
        assert!(json["employees"][0].get("active").is_none());
    }

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 20);
        assert_eq!(p.page(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_clamps() {
        assert_eq!(Pagination::new(Some(50_000), None).limit(), MAX_PER_PAGE);
        assert_eq!(Pagination::new(Some(-3), None).limit(), DEFAULT_PER_PAGE);
        assert_eq!(Pagination::new(Some(0), None).limit(), 0);
        assert_eq!(Pagination::new(None, Some(0)).page(), 1);
        assert_eq!(Pagination::new(None, Some(-9)).page(), 1);
    }

    #[test]
    fn test_pagination_invariants_hold_for_extreme_inputs() {
        let extremes = [None, Some(i64::MIN), Some(-5), Some(-1), Some(0), Some(1), Some(i64::MAX)];
        for per_page in extremes {
            for page in extremes {
                let p = Pagination::new(per_page, page);
                assert!((0..=MAX_PER_PAGE).contains(&p.limit()), "{per_page:?}/{page:?}");
                assert!(p.page() >= 1, "{per_page:?}/{page:?}");
                assert!(p.offset() >= 0, "{per_page:?}/{page:?}");
            }
        }

        let p = Pagination::from_query(Some("-5"), Some("-3")).unwrap();
        assert_eq!((p.limit(), p.page(), p.offset()), (DEFAULT_PER_PAGE, 1, 0));
    }

    #[test]
    fn test_pagination_offset() {
        let p = Pagination::new(Some(25), Some(3));
        assert_eq!(p.offset(), 50);

        let p = Pagination::new(Some(MAX_PER_PAGE), Some(i64::MAX));
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn test_pagination_from_query() {
        let p = Pagination::from_query(Some(" 10 "), Some("2")).unwrap();
        assert_eq!((p.limit(), p.page(), p.offset()), (10, 2, 10));

        let p = Pagination::from_query(Some(""), None).unwrap();
        assert_eq!(p, Pagination::default());

        let err = Pagination::from_query(Some("ten"), None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPagination { param: "perPage", .. }));
    }
}
