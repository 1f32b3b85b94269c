use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::error::CoreError;
use super::keyed::KeyedMap;

/// One obtainable item. Fields the engine does not read are carried in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_hash: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default)]
    pub item_type_display_name: String,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_hash: Option<u32>,
    #[serde(default)]
    pub activity_name: String,
    #[serde(
        rename = "dropListID",
        default,
        deserialize_with = "id_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub drop_list_id: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

/// Labelled sub-list of a drop list, e.g. the drops of a single encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<u32>>,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

/// Decoded catalog document: activities, their drop lists, and every item
/// those lists reference. All three maps keep document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCatalog")]
pub struct Catalog {
    pub activities: KeyedMap<Activity>,
    pub drop_lists: KeyedMap<DropList>,
    pub items: KeyedMap<Item>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    #[serde(default)]
    activities: KeyedMap<Activity>,
    #[serde(default)]
    drop_lists: KeyedMap<DropList>,
    #[serde(default)]
    items: Option<JsonValue>,
    #[serde(default)]
    strike_item_hashes: Option<JsonValue>,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = serde_json::Error;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        // Older strike documents ship the item table as `strikeItemHashes`.
        let items = match (raw.items, raw.strike_item_hashes) {
            (Some(items), _) if !items.is_null() => items,
            (_, Some(legacy)) => legacy,
            _ => JsonValue::Null,
        };
        let items = match items {
            JsonValue::Object(_) => serde_json::from_value(items)?,
            _ => KeyedMap::new(),
        };

        Ok(Self {
            activities: raw.activities,
            drop_lists: raw.drop_lists,
            items,
        })
    }
}

impl Catalog {
    pub fn from_json_str(text: &str) -> Result<Self, CoreError> {
        serde_json::from_str(text)
            .map_err(|e| CoreError::parse(format!("invalid catalog document: {e}")))
    }

    pub fn from_json_value(value: JsonValue) -> Result<Self, CoreError> {
        serde_json::from_value(value)
            .map_err(|e| CoreError::parse(format!("invalid catalog document: {e}")))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CoreError> {
        let text = fs::read_to_string(path).map_err(|e| CoreError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            CoreError::Parse { message } => {
                CoreError::parse(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.get(id)
    }

    pub fn drop_list(&self, id: &str) -> Option<&DropList> {
        self.drop_lists.get(id)
    }

    pub fn item(&self, hash: u32) -> Option<&Item> {
        self.items.get(&hash.to_string())
    }
}

fn id_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(id)) => Ok(Some(id)),
        Some(JsonValue::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "dropListID must be a string or number, got {other}"
        ))),
    }
}
