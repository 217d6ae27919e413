use serde::Serialize;

/// Attendance status. Stored lowercase, rendered capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Present,
    Absent,
}

impl Status {
    /// Decode a stored status value. Anything outside {present, absent} is a
    /// data-integrity fault: loud in development, degraded to Absent in
    /// release so one bad row cannot take down the whole view.
    pub fn from_stored(raw: &str) -> Status {
        match raw {
            "present" => Status::Present,
            "absent" => Status::Absent,
            other => {
                debug_assert!(false, "unexpected stored status {other:?}");
                Status::Absent
            }
        }
    }

    /// Parse client input, case-insensitively.
    pub fn parse(input: &str) -> Option<Status> {
        match input.to_ascii_lowercase().as_str() {
            "present" => Some(Status::Present),
            "absent" => Some(Status::Absent),
            _ => None,
        }
    }

    pub fn as_stored(&self) -> &'static str {
        match self {
            Status::Present => "present",
            Status::Absent => "absent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Present => "Present",
            Status::Absent => "Absent",
        }
    }

    pub fn toggled(&self) -> Status {
        match self {
            Status::Present => Status::Absent,
            Status::Absent => Status::Present,
        }
    }
}

/// Point-in-time copy of the attendee embedded in each projected record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSnapshot {
    pub id: i64,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub first_name_guj: String,
    pub middle_name_guj: String,
    pub last_name_guj: String,
    pub smk_no: String,
    pub mobile_no: String,
    pub gender: String,
}

/// Normalized view record consumed by the report engine and CSV serializer.
///
/// `timestamp` is always recomputable as `epoch(date, time)` — it is derived
/// at projection time and never set independently.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i64,
    pub member: MemberSnapshot,
    pub status: Status,
    pub date: String,
    pub time: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ravisabha_id: Option<i64>,
}

/// Raw stored row plus its joined member snapshot, before projection.
#[derive(Debug, Clone)]
pub struct StoredAttendance {
    pub id: i64,
    pub ravisabha_id: Option<i64>,
    pub status: String,
    pub recorded_at: String,
    pub member: MemberSnapshot,
}

/// Insert payload. `recorded_at` defaults to the current local instant.
#[derive(Debug)]
pub struct NewAttendance {
    pub member_id: i64,
    pub ravisabha_id: Option<i64>,
    pub status: Status,
    pub recorded_at: Option<String>,
}
