//! Fill-only reconciliation between the polled function set and a rate map.

use std::collections::HashMap;

/// Returns a copy of `existing` in which every id in `current_ids` has an
/// entry, inserting 0 for newly seen functions. Ids the host no longer
/// reports keep their entries, so a rate typed for a function that
/// temporarily disappears from the design is still there when it comes back.
/// Existing values are never overwritten.
pub fn reconcile(existing: &HashMap<String, f64>, current_ids: &[String]) -> HashMap<String, f64> {
    let mut merged = existing.clone();
    for id in current_ids {
        merged.entry(id.clone()).or_insert(0.0);
    }
    merged
}
