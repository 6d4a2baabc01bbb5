//! Small collection helpers shared across crates.

use std::collections::HashSet;
use std::hash::Hash;

/// Remove duplicates while keeping the first occurrence of each value.
pub fn dedup_ordered<T>(values: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
