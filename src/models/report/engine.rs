//! In-memory filter/sort/paginate engine over the projected record set.
//!
//! All computation here is synchronous, runs to completion, and cannot fail:
//! any filter/sort combination over an empty set yields an empty page
//! rendered as page 1 of 1.

use std::cmp::Ordering;

use serde::Serialize;

use super::{Gender, PAGE_SIZE, RecordFilters, SortConfig, SortDir, SortKey, ViewState};
use crate::models::attendance::AttendanceRecord;

/// Counts over the filtered (not paginated) set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderSummary {
    pub male: usize,
    pub female: usize,
    pub unknown: usize,
    pub total: usize,
}

/// One computed view of the record set under a `ViewState`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub records: Vec<AttendanceRecord>,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub page: usize,
    pub gender: GenderSummary,
}

fn matches(record: &AttendanceRecord, filters: &RecordFilters) -> bool {
    if !filters.name.is_empty() {
        let needle = filters.name.to_lowercase();
        let member = &record.member;
        let hit = member.first_name.to_lowercase().contains(&needle)
            || member.last_name.to_lowercase().contains(&needle)
            || member.middle_name.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }
    if !filters.smk_no.is_empty()
        && !record
            .member
            .smk_no
            .to_lowercase()
            .contains(&filters.smk_no.to_lowercase())
    {
        return false;
    }
    if !filters.mobile_no.is_empty() && !record.member.mobile_no.contains(&filters.mobile_no) {
        return false;
    }
    if !filters.date.is_empty() && record.date != filters.date {
        return false;
    }
    filters.status.matches(record.status)
}

fn full_name(record: &AttendanceRecord) -> String {
    format!("{} {}", record.member.first_name, record.member.last_name)
}

fn compare(a: &AttendanceRecord, b: &AttendanceRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => full_name(a).cmp(&full_name(b)),
        SortKey::SmkNo => a.member.smk_no.cmp(&b.member.smk_no),
        SortKey::MobileNo => a.member.mobile_no.cmp(&b.member.mobile_no),
        SortKey::DateTime => a.timestamp.cmp(&b.timestamp),
        SortKey::Status => a.status.label().cmp(b.status.label()),
    }
}

/// The full filtered and ordered set, which is what the CSV export
/// serializes.
pub fn filter_and_sort(
    records: &[AttendanceRecord],
    filters: &RecordFilters,
    sort: &SortConfig,
) -> Vec<AttendanceRecord> {
    let mut result: Vec<AttendanceRecord> = records
        .iter()
        .filter(|r| matches(r, filters))
        .cloned()
        .collect();
    // Stable sort keeps equal keys in their incoming order.
    result.sort_by(|a, b| {
        let ord = compare(a, b, sort.key);
        match sort.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    result
}

pub fn summarize_gender(records: &[AttendanceRecord]) -> GenderSummary {
    let mut summary = GenderSummary {
        total: records.len(),
        ..GenderSummary::default()
    };
    for record in records {
        match Gender::decode(&record.member.gender) {
            Gender::Male => summary.male += 1,
            Gender::Female => summary.female += 1,
            Gender::Unknown => summary.unknown += 1,
        }
    }
    summary
}

/// Compute the visible page and summary counts for a view state. The page
/// number is clamped to `[1, total_pages]` on every recompute, so a filter
/// that shrinks the result set renormalizes the page instead of leaving it
/// pointing past the end.
pub fn run(records: &[AttendanceRecord], state: &ViewState) -> ReportPage {
    let filtered = filter_and_sort(records, &state.filters, &state.sort);
    let gender = summarize_gender(&filtered);
    let total_filtered = filtered.len();
    let total_pages = total_filtered.div_ceil(PAGE_SIZE).max(1);
    let page = state.page.clamp(1, total_pages);

    let start = (page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(total_filtered);
    let records = filtered[start..end].to_vec();

    ReportPage {
        records,
        total_filtered,
        total_pages,
        page,
        gender,
    }
}

/// Context object holding the loaded record set and its view state — the
/// single source of truth for the report views.
///
/// Records are installed through a begin/complete pair tagged with their
/// scope. A fetch that completes after a newer scope was requested is
/// discarded: last-requested-scope wins, not last-to-respond. Installing a
/// different scope resets the view state to defaults.
#[derive(Debug, Default)]
pub struct ReportSession {
    records: Vec<AttendanceRecord>,
    installed_tag: Option<String>,
    requested_tag: Option<String>,
    pub state: ViewState,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `tag` as the newest requested scope.
    pub fn begin(&mut self, tag: &str) {
        self.requested_tag = Some(tag.to_string());
    }

    /// Install fetched records for `tag`. Returns false (and changes
    /// nothing) when a newer scope has been requested since.
    pub fn complete(&mut self, tag: &str, records: Vec<AttendanceRecord>) -> bool {
        if self.requested_tag.as_deref() != Some(tag) {
            return false;
        }
        if self.installed_tag.as_deref() != Some(tag) {
            self.state = ViewState::default();
        }
        self.installed_tag = Some(tag.to_string());
        self.records = records;
        true
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn view(&self) -> ReportPage {
        run(&self.records, &self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::projection::epoch_millis;
    use crate::models::attendance::{MemberSnapshot, Status};
    use crate::models::report::StatusFilter;

    fn record(
        id: i64,
        first: &str,
        last: &str,
        smk: &str,
        gender: &str,
        status: Status,
        date: &str,
        time: &str,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id,
            member: MemberSnapshot {
                id,
                first_name: first.to_string(),
                middle_name: String::new(),
                last_name: last.to_string(),
                first_name_guj: String::new(),
                middle_name_guj: String::new(),
                last_name_guj: String::new(),
                smk_no: smk.to_string(),
                mobile_no: format!("98000000{id:02}"),
                gender: gender.to_string(),
            },
            status,
            date: date.to_string(),
            time: time.to_string(),
            timestamp: epoch_millis(date, time).unwrap(),
            ravisabha_id: None,
        }
    }

    fn sample() -> Vec<AttendanceRecord> {
        vec![
            record(1, "Asha", "Shah", "SMK-001", "2", Status::Present, "2024-03-01", "09:00"),
            record(2, "Bhavin", "Patel", "SMK-002", "1", Status::Absent, "2024-03-01", "09:05"),
            record(3, "Chirag", "Desai", "SMK-003", "1", Status::Present, "2024-03-02", "10:00"),
            record(4, "Daya", "Shah", "SMK-004", "x", Status::Absent, "2024-03-03", "08:45"),
        ]
    }

    fn ids(records: &[AttendanceRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn filters_are_anded_together() {
        let records = sample();
        let filters = RecordFilters {
            name: "shah".to_string(),
            status: StatusFilter::Present,
            ..RecordFilters::default()
        };
        let out = filter_and_sort(&records, &filters, &SortConfig::default());
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = sample();
        let filters = RecordFilters {
            name: "a".to_string(),
            ..RecordFilters::default()
        };
        let sort = SortConfig::default();
        let once = filter_and_sort(&records, &filters, &sort);
        let twice = filter_and_sort(&once, &filters, &sort);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn date_time_desc_is_reverse_of_asc() {
        let records = sample(); // timestamps are unique
        let asc = filter_and_sort(
            &records,
            &RecordFilters::default(),
            &SortConfig { key: SortKey::DateTime, dir: SortDir::Asc },
        );
        let mut desc = filter_and_sort(
            &records,
            &RecordFilters::default(),
            &SortConfig { key: SortKey::DateTime, dir: SortDir::Desc },
        );
        desc.reverse();
        assert_eq!(ids(&asc), ids(&desc));
    }

    #[test]
    fn name_sort_compares_first_last_concatenation() {
        let records = sample();
        let out = filter_and_sort(
            &records,
            &RecordFilters::default(),
            &SortConfig { key: SortKey::Name, dir: SortDir::Asc },
        );
        assert_eq!(ids(&out), vec![1, 2, 3, 4]); // Asha, Bhavin, Chirag, Daya
    }

    #[test]
    fn pages_concatenate_to_the_full_filtered_set() {
        let records: Vec<AttendanceRecord> = (1..=37)
            .map(|i| {
                record(
                    i,
                    "Member",
                    "Test",
                    &format!("SMK-{i:03}"),
                    "1",
                    Status::Present,
                    "2024-03-01",
                    &format!("{:02}:{:02}", 6 + i / 60, i % 60),
                )
            })
            .collect();

        let mut state = ViewState::default();
        let full = filter_and_sort(&records, &state.filters, &state.sort);

        let first = run(&records, &state);
        assert_eq!(first.total_filtered, 37);
        assert_eq!(first.total_pages, 3);

        let mut collected = vec![];
        for page in 1..=first.total_pages {
            state.page = page;
            let view = run(&records, &state);
            assert!(view.records.len() <= PAGE_SIZE);
            collected.extend(ids(&view.records));
        }
        assert_eq!(collected, ids(&full));
    }

    #[test]
    fn page_is_renormalized_when_filters_shrink_the_set() {
        let records: Vec<AttendanceRecord> = (1..=40)
            .map(|i| {
                record(
                    i,
                    if i == 1 { "Asha" } else { "Member" },
                    "Test",
                    &format!("SMK-{i:03}"),
                    "1",
                    Status::Present,
                    "2024-03-01",
                    &format!("{:02}:{:02}", 6 + i / 60, i % 60),
                )
            })
            .collect();

        let mut state = ViewState { page: 3, ..ViewState::default() };
        assert_eq!(run(&records, &state).page, 3);

        state.filters.name = "Asha".to_string();
        let view = run(&records, &state);
        assert_eq!(view.total_filtered, 1);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.page, 1);
        assert_eq!(view.records.len(), 1);
    }

    #[test]
    fn empty_set_renders_page_one_of_one() {
        let view = run(&[], &ViewState::default());
        assert!(view.records.is_empty());
        assert_eq!(view.total_filtered, 0);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.page, 1);
        assert_eq!(view.gender.total, 0);
    }

    #[test]
    fn gender_summary_counts_filtered_set() {
        let records = sample();
        let view = run(&records, &ViewState::default());
        assert_eq!(view.gender.male, 2);
        assert_eq!(view.gender.female, 1);
        assert_eq!(view.gender.unknown, 1);
        assert_eq!(view.gender.total, 4);
        assert!(view.gender.male + view.gender.female <= view.gender.total);

        // Counts follow the filtered, not the full, set.
        let state = ViewState {
            filters: RecordFilters {
                status: StatusFilter::Present,
                ..RecordFilters::default()
            },
            ..ViewState::default()
        };
        let filtered = run(&records, &state);
        assert_eq!(filtered.gender.total, 2);
        assert_eq!(filtered.gender.male, 1);
        assert_eq!(filtered.gender.female, 1);
    }

    #[test]
    fn clear_resets_filters_sort_and_page_atomically() {
        let records = sample();
        let mut state = ViewState {
            filters: RecordFilters {
                name: "shah".to_string(),
                smk_no: "SMK".to_string(),
                mobile_no: "98".to_string(),
                date: "2024-03-01".to_string(),
                status: StatusFilter::Present,
            },
            sort: SortConfig { key: SortKey::Name, dir: SortDir::Asc },
            page: 2,
        };

        state.clear();
        assert_eq!(state, ViewState::default());
        assert!(!state.filters.is_active());

        // Cleared view restores every record, default-sorted, on page 1.
        let view = run(&records, &state);
        assert_eq!(view.total_filtered, records.len());
        assert_eq!(view.page, 1);
        assert_eq!(ids(&view.records), vec![4, 3, 2, 1]); // dateTime desc
        assert!(view.records.iter().any(|r| r.status == Status::Absent));
    }

    #[test]
    fn report_session_discards_stale_fetch() {
        let mut session = ReportSession::new();

        session.begin("day:2024-03-01");
        session.begin("day:2024-03-02"); // user changed scope mid-flight

        // The older fetch returns last; it must be discarded.
        assert!(!session.complete("day:2024-03-01", sample()));
        assert!(session.records().is_empty());

        let newer = vec![sample().remove(2)];
        assert!(session.complete("day:2024-03-02", newer));
        assert_eq!(ids(session.records()), vec![3]);
    }

    #[test]
    fn report_session_resets_view_state_on_scope_change() {
        let mut session = ReportSession::new();
        session.begin("day:2024-03-01");
        assert!(session.complete("day:2024-03-01", sample()));

        session.state.filters.name = "shah".to_string();
        session.state.page = 2;

        // Same scope refreshed: view state survives.
        session.begin("day:2024-03-01");
        assert!(session.complete("day:2024-03-01", sample()));
        assert_eq!(session.state.filters.name, "shah");

        // New scope installed: view state back to defaults.
        session.begin("ravisabha:7");
        assert!(session.complete("ravisabha:7", vec![]));
        assert_eq!(session.state, ViewState::default());
        assert_eq!(session.view().page, 1);
    }
}
