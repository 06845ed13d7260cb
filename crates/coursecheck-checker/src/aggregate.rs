//! Result aggregator: groups conflict records into report categories.

use indexmap::IndexMap;

use coursecheck_core::{Category, ConflictGroup, ConflictRecord};

/// Group records by category
///
/// Groups appear in the order their first record appears; records keep their
/// emission order inside each group.
pub fn group_by_category(records: &[ConflictRecord]) -> Vec<ConflictGroup> {
    let mut groups: IndexMap<Category, Vec<ConflictRecord>> = IndexMap::new();
    for record in records {
        groups
            .entry(Category::of(record.kind))
            .or_default()
            .push(record.clone());
    }

    groups
        .into_iter()
        .map(|(category, records)| ConflictGroup { category, records })
        .collect()
}
