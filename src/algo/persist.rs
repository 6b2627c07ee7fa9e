use crate::core::{Gene, Lesson};
use crate::data::{Repository, StoreError};

/// Expands a schedule into lesson rows, one per attending group of every gene.
/// Rows are numbered from 1.
#[must_use]
pub fn lessons(schedule: &[Gene]) -> Vec<Lesson> {
    let mut rows = Vec::with_capacity(schedule.iter().map(|gene| gene.group_ids.len()).sum());
    let mut next_id = 1;

    for gene in schedule {
        rows.extend(gene.rows(next_id));
        next_id += u32::try_from(gene.group_ids.len()).unwrap_or(u32::MAX);
    }

    rows
}

/// Replaces the stored lesson table with the given schedule.
/// Returns the number of stored rows.
///
/// # Errors
/// - If the repository rejects the write. The previous table is kept.
pub fn persist(repository: &mut dyn Repository, schedule: &[Gene]) -> Result<usize, StoreError> {
    let rows = lessons(schedule);
    let count = rows.len();
    repository.replace_lessons(rows)?;
    Ok(count)
}
