use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::CoreError;

/// Item hashes the current player already has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnedItemSet {
    hashes: BTreeSet<u32>,
}

impl OwnedItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every numeric `itemHash` found anywhere in a decoded profile
    /// (character inventories, equipment, vault, kiosks).
    pub fn from_profile(profile: &JsonValue) -> Self {
        let mut hashes = BTreeSet::new();
        collect_item_hashes(profile, &mut hashes);
        Self { hashes }
    }

    /// Accepts a flat array of hashes or a whole profile document.
    pub fn from_json_str(text: &str) -> Result<Self, CoreError> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| CoreError::parse(format!("invalid ownership document: {e}")))?;
        match value {
            JsonValue::Array(_) => serde_json::from_value(value)
                .map_err(|e| CoreError::parse(format!("invalid item hash list: {e}"))),
            other => Ok(Self::from_profile(&other)),
        }
    }

    pub fn insert(&mut self, hash: u32) -> bool {
        self.hashes.insert(hash)
    }

    pub fn contains(&self, hash: u32) -> bool {
        self.hashes.contains(&hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.hashes.iter().copied()
    }
}

impl FromIterator<u32> for OwnedItemSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            hashes: iter.into_iter().collect(),
        }
    }
}

fn collect_item_hashes(value: &JsonValue, out: &mut BTreeSet<u32>) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                if key == "itemHash"
                    && let Some(hash) = child.as_u64().and_then(|h| u32::try_from(h).ok())
                {
                    out.insert(hash);
                    continue;
                }
                collect_item_hashes(child, out);
            }
        }
        JsonValue::Array(values) => {
            for child in values {
                collect_item_hashes(child, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::OwnedItemSet;

    #[test]
    fn from_profile_walks_nested_inventories() {
        let profile = json!({
            "profileInventory": { "data": { "items": [ { "itemHash": 11 }, { "itemHash": 12 } ] } },
            "characterEquipment": {
                "data": { "2305843009": { "items": [ { "itemHash": 13, "itemInstanceId": "6917529" } ] } }
            },
            "itemHash": "not-a-number"
        });

        let owned = OwnedItemSet::from_profile(&profile);
        assert_eq!(owned.iter().collect::<Vec<_>>(), vec![11, 12, 13]);
    }

    #[test]
    fn from_json_str_accepts_flat_hash_list() {
        let owned = OwnedItemSet::from_json_str("[55, 7, 55]").expect("hash list should parse");
        assert_eq!(owned.len(), 2);
        assert!(owned.contains(55));
        assert!(!owned.contains(8));
    }
}
