pub mod activity_names;
mod catalog;
mod engine;
mod error;
mod keyed;
mod owned;
mod types;

pub use catalog::{Activity, Catalog, DropList, Item, Section};
pub use engine::{Engine, ReferencePolicy, Session, ViewState, normalize};
pub use error::{CoreError, CoreErrorCode};
pub use keyed::KeyedMap;
pub use owned::OwnedItemSet;
pub use types::{NormalizedActivity, NormalizedItem, NormalizedResult, NormalizedSection};
