use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, warn};

use crate::class_tag::ClassTag;

use super::activity_names;
use super::catalog::{Activity, Catalog, DropList, Item};
use super::error::CoreError;
use super::keyed::KeyedMap;
use super::owned::OwnedItemSet;
use super::types::{NormalizedActivity, NormalizedItem, NormalizedResult, NormalizedSection};

// Output fields serialized beside the flattened catalog fields; a catalog
// field with the same name is dropped so the annotation wins.
const ITEM_ANNOTATION_KEYS: [&str; 3] = ["hash", "characterClass", "obtained"];
const ACTIVITY_ANNOTATION_KEYS: [&str; 2] = ["drops", "sections"];

/// What to do when a drop list names an item hash the catalog does not have.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Fail the whole normalization.
    #[default]
    FailBatch,
    /// Treat the offending activity as having no drop list.
    DropActivity,
    /// Leave the missing item out and keep going.
    SkipItem,
}

impl ReferencePolicy {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::FailBatch => "fail-batch",
            Self::DropActivity => "drop-activity",
            Self::SkipItem => "skip-item",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fail-batch" | "strict" => Some(Self::FailBatch),
            "drop-activity" => Some(Self::DropActivity),
            "skip-item" | "lenient" => Some(Self::SkipItem),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine {
    policy: ReferencePolicy,
}

struct ResolveContext<'a> {
    catalog: &'a Catalog,
    owned: Option<&'a OwnedItemSet>,
    activity_id: &'a str,
    drop_list_id: &'a str,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReferencePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ReferencePolicy {
        self.policy
    }

    /// Resolve every activity's drop list against `catalog`, tag items with
    /// class and ownership, and build the de-duplicated display list.
    ///
    /// `owned` is `None` when no player is signed in; every item is then
    /// reported as not obtained. The result shares nothing with the inputs.
    pub fn normalize(
        &self,
        catalog: &Catalog,
        owned: Option<&OwnedItemSet>,
    ) -> Result<NormalizedResult, CoreError> {
        let mut activities = KeyedMap::new();
        for (id, activity) in catalog.activities.iter() {
            let normalized = self.normalize_activity(catalog, owned, id, activity)?;
            activities.insert(id.clone(), normalized);
        }

        let display_list = build_display_list(&activities);
        debug!(
            activities = activities.len(),
            displayed = display_list.len(),
            owned = owned.map(OwnedItemSet::len),
            policy = self.policy.as_str(),
            "normalized catalog"
        );

        Ok(NormalizedResult {
            activities,
            display_list,
        })
    }

    fn normalize_activity(
        &self,
        catalog: &Catalog,
        owned: Option<&OwnedItemSet>,
        id: &str,
        activity: &Activity,
    ) -> Result<NormalizedActivity, CoreError> {
        let mut renamed = activity.clone();
        renamed.extra = without_keys(renamed.extra, &ACTIVITY_ANNOTATION_KEYS);
        if let Some(name) = activity.activity_hash.and_then(activity_names::lookup) {
            renamed.activity_name = name.to_string();
        }

        let Some((drop_list_id, drop_list)) = activity
            .drop_list_id
            .as_deref()
            .and_then(|list_id| catalog.drop_list(list_id).map(|list| (list_id, list)))
        else {
            return Ok(without_drops(renamed));
        };

        let ctx = ResolveContext {
            catalog,
            owned,
            activity_id: id,
            drop_list_id,
        };
        match self.resolve_drop_list(&ctx, drop_list) {
            Ok((drops, sections)) => Ok(NormalizedActivity {
                activity: renamed,
                drops: Some(drops),
                sections: Some(sections),
            }),
            Err(err) if self.policy == ReferencePolicy::DropActivity => {
                warn!(activity = id, error = %err, "ignoring drop list with dangling reference");
                Ok(without_drops(renamed))
            }
            Err(err) => Err(err),
        }
    }

    fn resolve_drop_list(
        &self,
        ctx: &ResolveContext<'_>,
        drop_list: &DropList,
    ) -> Result<(Vec<NormalizedItem>, Vec<NormalizedSection>), CoreError> {
        let drops = self.resolve_items(ctx, drop_list.items.as_deref().unwrap_or_default())?;

        let mut sections = Vec::new();
        for section in drop_list.sections.iter().flatten() {
            sections.push(NormalizedSection {
                name: section.name.clone(),
                extra: section.extra.clone(),
                items: self.resolve_items(ctx, section.items.as_deref().unwrap_or_default())?,
            });
        }

        Ok((drops, sections))
    }

    fn resolve_items(
        &self,
        ctx: &ResolveContext<'_>,
        hashes: &[u32],
    ) -> Result<Vec<NormalizedItem>, CoreError> {
        let mut out = Vec::with_capacity(hashes.len());
        for &hash in hashes {
            let Some(item) = ctx.catalog.item(hash) else {
                if self.policy == ReferencePolicy::SkipItem {
                    debug!(
                        activity = ctx.activity_id,
                        drop_list = ctx.drop_list_id,
                        item_hash = hash,
                        "skipping missing item"
                    );
                    continue;
                }
                return Err(CoreError::DanglingItem {
                    activity: ctx.activity_id.to_string(),
                    drop_list: ctx.drop_list_id.to_string(),
                    item_hash: hash,
                });
            };
            out.push(annotate_item(item, hash, ctx.owned));
        }
        Ok(out)
    }
}

/// Normalize with the default fail-fast reference policy.
pub fn normalize(
    catalog: &Catalog,
    owned: Option<&OwnedItemSet>,
) -> Result<NormalizedResult, CoreError> {
    Engine::new().normalize(catalog, owned)
}

fn annotate_item(item: &Item, hash: u32, owned: Option<&OwnedItemSet>) -> NormalizedItem {
    let mut item = item.clone();
    item.extra = without_keys(item.extra, &ITEM_ANNOTATION_KEYS);
    NormalizedItem {
        hash,
        character_class: ClassTag::classify(&item.item_type_display_name),
        obtained: owned.is_some_and(|set| set.contains(hash)),
        item,
    }
}

fn without_keys(extra: JsonMap<String, JsonValue>, keys: &[&str]) -> JsonMap<String, JsonValue> {
    extra
        .into_iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .collect()
}

fn without_drops(activity: Activity) -> NormalizedActivity {
    NormalizedActivity {
        activity,
        drops: None,
        sections: None,
    }
}

// First activity per display name wins, in catalog order.
fn build_display_list(activities: &KeyedMap<NormalizedActivity>) -> Vec<NormalizedActivity> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for activity in activities.values() {
        if activity.has_drops() && seen.insert(activity.name()) {
            out.push(activity.clone());
        }
    }
    out
}

#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// No catalog has been supplied yet.
    #[default]
    Loading,
    Failed(CoreError),
    Ready(Arc<NormalizedResult>),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn result(&self) -> Option<&Arc<NormalizedResult>> {
        match self {
            Self::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CoreError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Tracks the current catalog and ownership snapshot and keeps the
/// normalized view in step with them.
///
/// Each input is replaced wholesale; replacing either one recomputes the
/// whole view. Handing back the same `Arc` is a no-op.
#[derive(Debug, Default)]
pub struct Session {
    engine: Engine,
    catalog: Option<Arc<Catalog>>,
    owned: Option<Arc<OwnedItemSet>>,
    state: ViewState,
    last_good: Option<Arc<NormalizedResult>>,
}

impl Session {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        self.catalog.as_ref()
    }

    pub fn owned(&self) -> Option<&Arc<OwnedItemSet>> {
        self.owned.as_ref()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Most recent successful view, kept across later failures.
    pub fn last_good(&self) -> Option<&Arc<NormalizedResult>> {
        self.last_good.as_ref()
    }

    pub fn set_catalog(&mut self, catalog: Arc<Catalog>) -> &ViewState {
        if self
            .catalog
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &catalog))
        {
            return &self.state;
        }
        self.catalog = Some(catalog);
        self.recompute()
    }

    pub fn set_owned(&mut self, owned: Arc<OwnedItemSet>) -> &ViewState {
        if self
            .owned
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &owned))
        {
            return &self.state;
        }
        self.owned = Some(owned);
        self.recompute()
    }

    /// Forget the ownership snapshot, e.g. on sign-out.
    pub fn clear_owned(&mut self) -> &ViewState {
        if self.owned.take().is_none() {
            return &self.state;
        }
        self.recompute()
    }

    fn recompute(&mut self) -> &ViewState {
        let Some(catalog) = self.catalog.as_ref() else {
            self.state = ViewState::Loading;
            return &self.state;
        };

        self.state = match self.engine.normalize(catalog, self.owned.as_deref()) {
            Ok(result) => {
                let result = Arc::new(result);
                self.last_good = Some(Arc::clone(&result));
                ViewState::Ready(result)
            }
            Err(err) => {
                warn!(error = %err, "normalization failed; keeping last good view");
                ViewState::Failed(err)
            }
        };
        &self.state
    }
}
