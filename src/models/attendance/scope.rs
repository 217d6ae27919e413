use chrono::NaiveDate;

use crate::errors::AppError;

/// Resolved fetch scope for attendance queries: a session id bypasses date
/// filtering entirely; date scopes are inclusive closed intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Ravisabha(i64),
    Range { start: NaiveDate, end: NaiveDate },
    Day(NaiveDate),
}

impl Scope {
    /// Resolve request parameters into a scope. Precedence: session id, then
    /// explicit start/end (both required together), then single day. The
    /// caller must always supply one disambiguating parameter.
    pub fn resolve(
        ravisabha_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        date: Option<&str>,
    ) -> Result<Scope, AppError> {
        if let Some(raw) = ravisabha_id {
            let id = raw
                .parse::<i64>()
                .map_err(|_| AppError::InvalidIdentifier(raw.to_string()))?;
            return Ok(Scope::Ravisabha(id));
        }
        if let (Some(s), Some(e)) = (start_date, end_date) {
            return Ok(Scope::Range {
                start: parse_date(s)?,
                end: parse_date(e)?,
            });
        }
        if let Some(d) = date {
            return Ok(Scope::Day(parse_date(d)?));
        }
        Err(AppError::MissingScope)
    }

    /// Inclusive `recorded_at` text bounds for date-based scopes: start of
    /// day to end of day. Stored instants carry no fractional seconds, so
    /// the `.999` end bound is inclusive under text comparison.
    pub fn recorded_at_bounds(&self) -> Option<(String, String)> {
        let (start, end) = match self {
            Scope::Ravisabha(_) => return None,
            Scope::Range { start, end } => (*start, *end),
            Scope::Day(d) => (*d, *d),
        };
        Some((
            format!("{}T00:00:00", start.format("%Y-%m-%d")),
            format!("{}T23:59:59.999", end.format("%Y-%m-%d")),
        ))
    }

    /// Tag identifying this scope for staleness comparison in the report
    /// session (last-requested-scope wins).
    pub fn tag(&self) -> String {
        match self {
            Scope::Ravisabha(id) => format!("ravisabha:{id}"),
            Scope::Range { start, end } => format!("range:{start}..{end}"),
            Scope::Day(d) => format!("day:{d}"),
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {raw}")))
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    first_of_next.pred_opt()
}

/// Calendar-month interval for a `YYYY-MM` parameter.
pub fn month_interval(raw: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let invalid = || AppError::Validation(format!("Invalid month: {raw}"));
    let (y, m) = raw.split_once('-').ok_or_else(invalid)?;
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = last_day_of_month(year, month).ok_or_else(invalid)?;
    Ok((start, end))
}

/// Calendar-year interval for a `YYYY` parameter.
pub fn year_interval(raw: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let invalid = || AppError::Validation(format!("Invalid year: {raw}"));
    let year: i32 = raw.parse().map_err(|_| invalid())?;
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
    Ok((start, end))
}

/// The month containing `today` — the default session-list interval.
pub fn current_month_interval(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    use chrono::Datelike;
    let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .unwrap_or(today);
    let end = last_day_of_month(today.year(), today.month()).unwrap_or(today);
    (start, end)
}
