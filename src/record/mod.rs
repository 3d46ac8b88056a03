//! Table rows: raw representation, shape classification and domain mapping

pub mod classify;
pub mod domain;
pub mod raw;

pub use classify::{classify, Classified, CollectionRawRecord, RecipeRawRecord};
pub use domain::{Collection, CollectionsIndex, OwnerId, SavedItem, UsersIndex};
pub use raw::{AttrValue, RawRecord};
