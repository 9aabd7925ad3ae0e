//! Reconciles the operator's stored chapter order and enabled flags with the catalog.
//!
//! The stored order is a comma-joined list of chapter keys in the `order`
//! preference, plus one `status-<key>` preference per chapter (`"on"` means
//! enabled). Both may be stale relative to the catalog: keys introduced by a
//! later release are appended in catalog order, and keys the catalog does not
//! know are dropped.

use crate::{
    catalog::ContentParams,
    prelude::*,
};

pub(crate) const ORDER_PREFERENCE: &str = "order";

pub(crate) fn status_preference(key: &str) -> String {
    format!("status-{key}")
}

/// Resolves the stored order against `catalog`.
///
/// Every catalog key appears exactly once in the result. Keys the operator has
/// already placed keep their relative order; keys they have never seen follow
/// in catalog order.
pub(crate) fn stored_order(catalog: &Catalog, prefs: &impl PreferenceStore) -> Vec<&'static str> {
    let mut order = match prefs.preference(ORDER_PREFERENCE) {
        Some(stored) => {
            let mut seen = HashSet::new();
            let mut order = Vec::default();
            // an empty preference splits into a single empty key
            for raw_key in stored.split(',').map(str::trim).filter(|key| !key.is_empty()) {
                match catalog.key(raw_key) {
                    Some(key) => if seen.insert(key) {
                        order.push(key);
                    } else {
                        log::warn!("dropping duplicate chapter {key:?} from stored order");
                    },
                    None => log::warn!("dropping chapter {raw_key:?} from stored order: not in the catalog"),
                }
            }
            order
        }
        None => catalog.keys().collect(),
    };
    if catalog.len() > order.len() {
        let new_keys = catalog.keys().filter(|key| !order.contains(key)).collect_vec();
        log::info!("appending chapters missing from stored order: {}", new_keys.join(", "));
        order.extend(new_keys);
    }
    order
}

/// Whether the operator has enabled `key`. Chapters never explicitly toggled are enabled.
pub(crate) fn status(prefs: &impl PreferenceStore, key: &str) -> bool {
    prefs.preference(&status_preference(key)).is_none_or(|status| status == "on")
}

/// Builds the full ordered chapter list, including disabled chapters.
pub(crate) fn merge(catalog: &Catalog, prefs: &impl PreferenceStore, params: ContentParams<'_>) -> Result<Vec<Chapter>, crate::catalog::Error> {
    stored_order(catalog, prefs).into_iter().map(|key| -> Result<_, crate::catalog::Error> {
        let metadata = catalog.metadata(key)?;
        Ok(Chapter::new(
            metadata.key,
            metadata.id,
            metadata.heading,
            metadata.level,
            metadata.link,
            status(prefs, key),
            catalog.default_content(key, params)?,
        ))
    }).collect()
}

/// Looks up a chapter's own enabled flag in a merged list. Unknown keys are disabled.
pub(crate) fn is_chapter_enabled(chapters: &[Chapter], key: &str) -> bool {
    chapters.iter().find(|chapter| chapter.key() == key).is_some_and(Chapter::enabled)
}

/// The chapters to render: enabled chapters whose parent section, if any, is enabled too.
pub(crate) fn visible(chapters: &[Chapter]) -> impl Iterator<Item = &Chapter> {
    chapters.iter().filter(|chapter| chapter.enabled() && chapter.parent().is_none_or(|parent| {
        chapters.iter().find(|candidate| candidate.id() == parent).is_some_and(Chapter::enabled)
    }))
}

/// Applies an admin form submission to the stored order and chapter statuses.
///
/// Every status is reset to off first, so a chapter missing from `enabled`
/// (an unchecked checkbox) ends up disabled.
pub(crate) fn save(catalog: &Catalog, prefs: &mut impl PreferenceStore, order: &[&str], enabled: &HashSet<&str>) {
    prefs.set_preference(ORDER_PREFERENCE, &order.join(","));
    for key in catalog.keys() {
        prefs.set_preference(&status_preference(key), if enabled.contains(key) { "on" } else { "0" });
    }
}

/// The chapter order an admin form submitted.
///
/// `order` lists the chapters as the form displayed them; if it is empty, catalog order is used instead.
/// Either way, chapters are then stably sorted by their `positions` ordinal, so an admin moves a chapter
/// by editing its number. Chapters without an ordinal keep their displayed place. On a tie, a chapter whose
/// number was lowered goes first and one whose number was raised goes last, so the edited row lands exactly
/// where its new number points.
pub(crate) fn submitted_order(catalog: &Catalog, order: &[String], positions: &HashMap<String, usize>) -> Vec<&'static str> {
    let displayed = if order.is_empty() {
        catalog.keys().collect_vec()
    } else {
        order.iter().filter_map(|key| catalog.key(key)).unique().collect_vec()
    };
    displayed.into_iter()
        .enumerate()
        .sorted_by_key(|&(idx, key)| {
            let position = positions.get(key).copied().unwrap_or(idx + 1);
            (position, position.cmp(&(idx + 1)))
        })
        .map(|(_, key)| key)
        .collect()
}
