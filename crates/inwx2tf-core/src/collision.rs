//! Identifier collision resolution
//!
//! Proposed identifiers are not unique: two TXT records at the apex, two
//! contact handles for the same person, or `a.b.de` next to `a_b.de` all
//! propose the same name. Resolution is positional: the first occurrence
//! keeps its identifier, the k-th repeat (k >= 1) gets the numeral `k + 1`
//! appended with no separator. A numbered name that is already taken, or that
//! another entry of the batch proposes itself, is passed over for the next
//! free numeral, so `["a", "a", "a2"]` resolves to `["a", "a3", "a2"]`.
//!
//! The result depends only on input order, so callers must pass entities in
//! the order the registrar listed them.

use std::collections::{HashMap, HashSet};

use crate::render::{PendingResource, RenderedResource};

/// Turn proposed identifiers into unique final identifiers
///
/// ```
/// use inwx2tf_core::collision::resolve_identifiers;
///
/// let resolved = resolve_identifiers(&["a", "b", "a", "a"]);
/// assert_eq!(resolved, vec!["a", "b", "a2", "a3"]);
/// ```
pub fn resolve_identifiers<S: AsRef<str>>(proposed: &[S]) -> Vec<String> {
    let reserved: HashSet<&str> = proposed.iter().map(|p| p.as_ref()).collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(proposed.len());
    let mut next_numeral: HashMap<&str, usize> = HashMap::new();

    proposed
        .iter()
        .map(|identifier| {
            let identifier = identifier.as_ref();

            let resolved = match next_numeral.get_mut(identifier) {
                None => {
                    next_numeral.insert(identifier, 2);
                    identifier.to_string()
                }
                Some(numeral) => loop {
                    let candidate = format!("{}{}", identifier, numeral);
                    *numeral += 1;
                    if !reserved.contains(candidate.as_str()) && !taken.contains(&candidate) {
                        break candidate;
                    }
                },
            };

            taken.insert(resolved.clone());
            resolved
        })
        .collect()
}

/// Resolve identifiers for a batch and render each entry with its final name
pub fn render_batch<P: PendingResource>(pending: &[P]) -> Vec<RenderedResource> {
    let proposed: Vec<&str> = pending.iter().map(|p| p.proposed_identifier()).collect();
    let resolved = resolve_identifiers(&proposed);

    pending
        .iter()
        .zip(resolved)
        .map(|(entry, identifier)| RenderedResource {
            import: entry.build_import(&identifier),
            resource: entry.build_resource(&identifier),
            identifier,
        })
        .collect()
}
