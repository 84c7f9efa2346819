//! # CSV Export

use error::{AppError, Result};

use crate::dto::leads::LeadRow;

/// Header row of the export, in column order.
pub const CSV_HEADERS: [&str; 14] = [
    "lead_id",
    "created_at",
    "visitor_name",
    "visitor_phone",
    "visitor_email",
    "organization",
    "designation",
    "city",
    "country",
    "interests",
    "notes",
    "follow_up_date",
    "employee_name",
    "company_name",
];

fn record(row: &LeadRow) -> [String; 14] {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    [
        row.id.to_string(),
        row.created_at.to_rfc3339(),
        row.visitor_name.clone(),
        row.visitor_phone.clone(),
        text(&row.visitor_email),
        text(&row.organization),
        text(&row.designation),
        text(&row.city),
        text(&row.country),
        row.interests
            .map(|i| i.to_string())
            .unwrap_or_default(),
        text(&row.notes),
        row.follow_up_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        row.employee_name.clone(),
        row.company_name.clone(),
    ]
}

/// Render rows as CSV with a header line.
pub fn render_csv(rows: &[LeadRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
    for row in rows {
        writer
            .write_record(record(row))
            .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))
}
