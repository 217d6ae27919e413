//! View-state types for the attendance report: per-column filters, sort
//! configuration, and pagination. Shared by the list, report, and export
//! endpoints.

use crate::models::attendance::Status;

pub mod csv;
pub mod engine;

pub const PAGE_SIZE: usize = 15;

/// Status column filter. `All` is the sentinel that disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Present,
    Absent,
}

impl StatusFilter {
    pub fn from_param(raw: Option<&str>) -> StatusFilter {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("present") => StatusFilter::Present,
            Some("absent") => StatusFilter::Absent,
            _ => StatusFilter::All,
        }
    }

    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Present => status == Status::Present,
            StatusFilter::Absent => status == Status::Absent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    SmkNo,
    MobileNo,
    DateTime,
    Status,
}

impl SortKey {
    pub fn from_param(raw: &str) -> Option<SortKey> {
        match raw {
            "name" => Some(SortKey::Name),
            "smkNo" => Some(SortKey::SmkNo),
            "mobileNo" => Some(SortKey::MobileNo),
            "dateTime" => Some(SortKey::DateTime),
            "status" => Some(SortKey::Status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub dir: SortDir,
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig {
            key: SortKey::DateTime,
            dir: SortDir::Desc,
        }
    }
}

/// Per-column predicates; active predicates are ANDed together. Empty
/// strings (and `StatusFilter::All`) mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilters {
    pub name: String,
    pub smk_no: String,
    pub mobile_no: String,
    pub date: String,
    pub status: StatusFilter,
}

impl RecordFilters {
    pub fn is_active(&self) -> bool {
        !self.name.is_empty()
            || !self.smk_no.is_empty()
            || !self.mobile_no.is_empty()
            || !self.date.is_empty()
            || self.status != StatusFilter::All
    }
}

/// Engine-local, never persisted. Reinitialized to defaults whenever the
/// underlying record set's scope changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub filters: RecordFilters,
    pub sort: SortConfig,
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            filters: RecordFilters::default(),
            sort: SortConfig::default(),
            page: 1,
        }
    }
}

impl ViewState {
    /// Column-header click: the active key flips direction, a new key resets
    /// to ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        let dir = if self.sort.key == key && self.sort.dir == SortDir::Asc {
            SortDir::Desc
        } else {
            SortDir::Asc
        };
        self.sort = SortConfig { key, dir };
    }

    /// Reset filters, sort, and page in one step; partial resets are not
    /// permitted.
    pub fn clear(&mut self) {
        *self = ViewState::default();
    }
}

/// Gender encoding found in member data: numeric codes or string tokens.
/// Anything outside the decode table lands in Unknown rather than being
/// silently folded into "neither".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn decode(code: &str) -> Gender {
        match code.trim().to_ascii_lowercase().as_str() {
            "1" | "male" | "m" => Gender::Male,
            "2" | "female" | "f" => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    /// Literal word for exports; Unknown renders empty.
    pub fn word(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "",
        }
    }
}
