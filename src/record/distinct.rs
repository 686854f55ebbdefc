//! Distinct counting over one or more paths.

use std::collections::HashSet;
use std::slice;

use crate::error::InsightsResult;
use crate::types::AsRecord;

use super::extract::CompositeKey;
use super::visit::visit_string;

/// Returns the number of unique non-null value combinations for `paths`.
///
/// Each record contributes the combination of its values at every path, in path order. When a
/// wildcard path yields several values for one record, every combination is considered. A
/// combination counts only if at least one of its parts is non-null; null records are skipped.
///
/// Values are compared by their textual form, lowercased unless `case_sensitive`.
pub fn count_distinct<R: AsRecord, P: AsRef<str>>(
    records: &[R],
    paths: &[P],
    case_sensitive: bool,
) -> InsightsResult<usize> {
    let mut distinct: HashSet<CompositeKey> = HashSet::new();

    for item in records {
        if item.as_record().is_none() {
            continue;
        }
        let mut keys = vec![CompositeKey::default()];
        for path in paths {
            let mut values = Vec::with_capacity(1);
            visit_string(slice::from_ref(item), path.as_ref(), case_sensitive, |value, _| {
                values.push(value);
                Ok(())
            })?;
            if values.is_empty() {
                continue;
            }
            keys = keys
                .iter()
                .flat_map(|key| values.iter().map(move |value| key.with(value.clone())))
                .collect();
        }
        distinct.extend(keys.into_iter().filter(CompositeKey::has_value));
    }

    Ok(distinct.len())
}
