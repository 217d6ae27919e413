//! CSV serializer for the export view. The column set and order are an
//! external contract — downstream sheets parse this file.

use super::Gender;
use crate::models::attendance::AttendanceRecord;

/// Standard export carries the nine contract columns; the rich variant
/// appends the localized name columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportVariant {
    Standard,
    Rich,
}

const HEADERS: [&str; 9] = [
    "First Name",
    "Middle Name",
    "Last Name",
    "SMK No",
    "Mobile No",
    "Status",
    "Gender",
    "Date",
    "Time",
];

const RICH_HEADERS: [&str; 3] = [
    "First Name (Guj)",
    "Middle Name (Guj)",
    "Last Name (Guj)",
];

/// RFC-4180 escaping: cells containing a comma, double-quote, or newline are
/// wrapped in quotes with internal quotes doubled.
fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// `HH:MM` (24-hour) to 12-hour clock with AM/PM suffix. Malformed input
/// renders empty rather than garbled.
pub fn format_to_12_hour(time: &str) -> String {
    let Some((h, m)) = time.split_once(':') else {
        return String::new();
    };
    let Ok(hours) = h.parse::<u32>() else {
        return String::new();
    };
    let period = if hours >= 12 { "PM" } else { "AM" };
    let hours12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{hours12}:{m} {period}")
}

/// Serialize an ordered record list to CSV text, one row per record, with
/// the fixed header row first.
pub fn to_csv(records: &[AttendanceRecord], variant: ExportVariant) -> String {
    let mut header: Vec<&str> = HEADERS.to_vec();
    if variant == ExportVariant::Rich {
        header.extend(RICH_HEADERS);
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        header
            .iter()
            .map(|h| escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        let member = &record.member;
        let mut row = vec![
            escape(&member.first_name),
            escape(&member.middle_name),
            escape(&member.last_name),
            escape(&member.smk_no),
            escape(&member.mobile_no),
            escape(record.status.label()),
            escape(Gender::decode(&member.gender).word()),
            escape(&record.date),
            escape(&format_to_12_hour(&record.time)),
        ];
        if variant == ExportVariant::Rich {
            row.push(escape(&member.first_name_guj));
            row.push(escape(&member.middle_name_guj));
            row.push(escape(&member.last_name_guj));
        }
        lines.push(row.join(","));
    }

    lines.join("\n")
}
