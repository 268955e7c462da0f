use crate::fetcher::RecordEntry;

// Case-sensitive, matched as a literal substring of the colleges field.
pub const DEFAULT_NEEDLE: &str = "College of IT";

// Keeps records whose colleges field contains the needle. Records without a
// colleges value are dropped, order is preserved.
pub fn matching_records(records: Vec<RecordEntry>, needle: &str) -> Vec<RecordEntry> {
    records
        .into_iter()
        .filter(|record| {
            record
                .fields
                .colleges
                .as_deref()
                .is_some_and(|colleges| colleges.contains(needle))
        })
        .collect()
}
