use crate::sync::types::Record;
use chrono::DateTime;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Non-destructive merge of the previously persisted set with the
/// freshly fetched one. Fresh records win on id overlap (they carry the
/// refreshed reaction counts); previous records whose id no longer
/// appears upstream are kept verbatim. Returns the merged set sorted
/// newest-first and the number of preserved records.
pub fn merge_records(previous: Vec<Record>, fresh: Vec<Record>) -> (Vec<Record>, usize) {
    let fresh_ids = fresh.iter().map(|r| r.id.clone()).collect::<HashSet<_>>();

    let mut merged = fresh;
    let mut preserved = 0usize;
    for record in previous {
        if !fresh_ids.contains(&record.id) {
            merged.push(record);
            preserved += 1;
        }
    }

    sort_newest_first(&mut merged);
    (merged, preserved)
}

pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by_key(|r| Reverse(date_sort_key(&r.date)));
}

// Unparseable dates sort last rather than poisoning the order.
fn date_sort_key(date: &str) -> i64 {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.timestamp_millis())
        .unwrap_or(i64::MIN)
}
