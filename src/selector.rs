use crate::models::{Catalog, CategoryCounter};
use tracing::warn;

/// Find the catalog entry whose label equals `label` exactly.
///
/// Matching is case and whitespace sensitive. When the catalog repeats a
/// label the last entry wins and a warning is logged.
pub fn select_by_label<'a>(catalog: &'a Catalog, label: &str) -> Option<&'a CategoryCounter> {
    let mut matches = catalog
        .category_counters
        .iter()
        .filter(|counter| counter.label == label);

    let first = matches.next()?;
    let (last, duplicates) = matches.fold((first, 0usize), |(_, n), c| (c, n + 1));
    if duplicates > 0 {
        warn!(
            "Label '{}' appears {} times in catalog, using the last entry",
            label,
            duplicates + 1
        );
    }
    Some(last)
}
