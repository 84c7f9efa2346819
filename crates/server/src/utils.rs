//! Shared helpers for handlers.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    ColumnTrait,
    Condition,
    DbErr,
    SqlErr,
};

/// Escape `%`, `_` and `\` so user input matches literally inside a LIKE pattern.
pub fn escape_like_wildcards(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match on a column.
pub fn contains_ci<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column)))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Prefix match on a column.
pub fn starts_with<C: ColumnTrait>(column: C, prefix: &str) -> SimpleExpr {
    let pattern = format!("{}%", escape_like_wildcards(prefix));
    Expr::col((column.entity_name(), column)).like(LikeExpr::new(pattern).escape('\\'))
}

/// OR of case-insensitive substring matches; `None` for a blank term.
pub fn search_condition<C: ColumnTrait>(term: Option<&str>, columns: impl IntoIterator<Item = C>) -> Option<Condition> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    Some(
        columns
            .into_iter()
            .fold(Condition::any(), |cond, column| cond.add(contains_ci(column, term))),
    )
}

/// True when the error comes from a unique index.
pub fn is_unique_violation(err: &DbErr) -> bool { matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) }

/// Current UTC calendar day.
pub fn today() -> NaiveDate { Utc::now().date_naive() }

/// The UTC day `days` before today.
pub fn days_ago(days: u64) -> NaiveDate { today().checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN) }

/// Midnight UTC at the start of `date`.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> { date.and_time(NaiveTime::MIN).and_utc() }

/// Canonical form for stored and compared email addresses.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// Trim, mapping blank strings to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `COMP` followed by the last six digits of the current millisecond timestamp.
pub fn generate_company_code() -> String { company_code_from_millis(Utc::now().timestamp_millis()) }

fn company_code_from_millis(millis: i64) -> String { format!("COMP{:06}", millis.rem_euclid(1_000_000)) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("a_b"), "a\\_b");
        assert_eq!(escape_like_wildcards("c:\\x"), "c:\\\\x");
        assert_eq!(escape_like_wildcards("plain"), "plain");
    }

    #[test]
    fn test_company_code_format() {
        assert_eq!(company_code_from_millis(1_760_000_123_456), "COMP123456");
        assert_eq!(company_code_from_millis(1_000_000_000_042), "COMP000042");

        let code = generate_company_code();
        assert_eq!(code.len(), 10);
        assert!(code.starts_with("COMP"));
        assert!(code[4 ..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Acme ".to_string())), Some("Acme".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_day_helpers() {
        assert_eq!(days_ago(0), today());
        assert_eq!((today() - days_ago(7)).num_days(), 7);

        let start = day_start(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(start.to_rfc3339(), "2026-03-14T00:00:00+00:00");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Asha@Example.COM "), "asha@example.com");
    }

    #[test]
    fn test_search_condition_blank_is_none() {
        use entity::visitors::Column;
        assert!(search_condition(Some("  "), [Column::Phone]).is_none());
        assert!(search_condition(None, [Column::Phone]).is_none());
        assert!(search_condition(Some("asha"), [Column::Phone, Column::FullName]).is_some());
    }
}
