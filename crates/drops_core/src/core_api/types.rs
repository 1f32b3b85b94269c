use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::class_tag::ClassTag;

use super::catalog::{Activity, Item};
use super::keyed::KeyedMap;

/// A catalog item annotated for one player.
///
/// `hash`, `characterClass` and `obtained` take precedence over catalog
/// fields of the same name, which are left out of `item.extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    /// Hash the drop list referenced this item by.
    pub hash: u32,
    #[serde(flatten)]
    pub item: Item,
    pub character_class: ClassTag,
    pub obtained: bool,
}

impl NormalizedItem {
    pub fn display_name(&self) -> &str {
        self.item.item_name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
    pub items: Vec<NormalizedItem>,
}

/// An activity with its drop list resolved.
///
/// `drops` and `sections` are both `None` when the activity has no drop list
/// in the catalog, which is distinct from a drop list with no items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedActivity {
    #[serde(flatten)]
    pub activity: Activity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drops: Option<Vec<NormalizedItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<NormalizedSection>>,
}

impl NormalizedActivity {
    /// Effective display name, after any override.
    pub fn name(&self) -> &str {
        &self.activity.activity_name
    }

    pub fn has_drops(&self) -> bool {
        self.drops.is_some()
    }

    /// Every resolved item: top-level drops first, then each section in order.
    pub fn items(&self) -> impl Iterator<Item = &NormalizedItem> {
        let drops = self.drops.iter().flatten();
        let sections = self
            .sections
            .iter()
            .flatten()
            .flat_map(|section| section.items.iter());
        drops.chain(sections)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub activities: KeyedMap<NormalizedActivity>,
    pub display_list: Vec<NormalizedActivity>,
}

impl NormalizedResult {
    pub fn activity(&self, id: &str) -> Option<&NormalizedActivity> {
        self.activities.get(id)
    }

    pub fn display_list(&self) -> &[NormalizedActivity] {
        &self.display_list
    }
}
