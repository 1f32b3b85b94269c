pub mod class_tag;
pub mod core_api;
pub mod variation;

pub use class_tag::{ClassTag, classify};
pub use core_api::normalize;
