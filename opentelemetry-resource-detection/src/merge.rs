//! Combining and trimming detected resources.
use std::collections::HashSet;

use crate::{resource::Resource, value::Attributes};

/// Picks the schema URL of a merged resource.
///
/// An empty URL yields to the other one. When both are set and differ the
/// current one is kept: attributes are not translated between schema
/// versions, so the first non-empty URL wins.
pub fn merge_schema_url(current: &str, new: &str) -> String {
    if current.is_empty() {
        return new.to_owned();
    }
    current.to_owned()
}

/// Copies the attributes of `from` into `into`.
///
/// With `override_existing` every attribute of `from` replaces the one in
/// `into`. Without it, keys already present in `into` are left untouched.
/// Schema URLs are not touched, see [`merge_schema_url`].
pub fn merge_resource(into: &mut Resource, from: &Resource, override_existing: bool) {
    if is_empty_resource(from) {
        return;
    }

    let attributes = into.attributes_mut();
    for (key, value) in from.iter() {
        if override_existing || !attributes.contains_key(key) {
            attributes.insert(key.clone(), value.clone());
        }
    }
}

pub fn is_empty_resource(resource: &Resource) -> bool {
    resource.is_empty()
}

/// Removes every attribute whose key is not in `attributes_to_keep`.
///
/// Returns the removed keys in iteration order. An empty allow-list keeps
/// everything.
pub fn filter_attributes(
    attributes: &mut Attributes,
    attributes_to_keep: &HashSet<String>,
) -> Vec<String> {
    if attributes_to_keep.is_empty() {
        return Vec::new();
    }

    let mut dropped = Vec::new();
    attributes.retain(|key, _| {
        let keep = attributes_to_keep.contains(key);
        if !keep {
            dropped.push(key.clone());
        }
        keep
    });
    dropped
}
