//! Shape detection for rows that carry no type tag
//!
//! The table mixes two row shapes under one schema. Rules, in priority order:
//!
//! 1. a non-empty `collectionType` string marks a collection row
//! 2. otherwise a `userAndCollection` string containing `-` marks a saved-recipe row
//! 3. anything else is unrecognized
//!
//! Extraction is lossy: missing or non-string fields read as empty strings and
//! are left for the domain mapper to reject.

use super::raw::{
    RawRecord, COLLECTION_TYPE, CONTENT_TYPE, LAST_MODIFIED, REFERENCED_OBJECT_ID,
    USER_AND_COLLECTION,
};

/// Separator between owner id and collection id in a recipe row's key
pub const KEY_SEPARATOR: char = '-';

/// A row known to describe a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionRawRecord {
    pub user_and_collection: String,
    pub referenced_object_id: String,
    pub collection_type: String,
    pub content_type: String,
    pub last_modified: String,
}

/// A row known to link a saved recipe into a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeRawRecord {
    pub user_and_collection: String,
    pub referenced_object_id: String,
}

/// Outcome of classifying one raw row
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Collection(CollectionRawRecord),
    Recipe(RecipeRawRecord),
    Unrecognized(RawRecord),
}

impl Classified {
    pub fn kind(&self) -> &'static str {
        match self {
            Classified::Collection(_) => "collection",
            Classified::Recipe(_) => "recipe",
            Classified::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Classify a raw row. Never fails; unknown shapes come back as `Unrecognized`.
pub fn classify(rec: RawRecord) -> Classified {
    if !rec.get_str(COLLECTION_TYPE).is_empty() {
        return Classified::Collection(CollectionRawRecord {
            user_and_collection: rec.get_str(USER_AND_COLLECTION).to_string(),
            referenced_object_id: rec.get_str(REFERENCED_OBJECT_ID).to_string(),
            collection_type: rec.get_str(COLLECTION_TYPE).to_string(),
            content_type: rec.get_str(CONTENT_TYPE).to_string(),
            last_modified: rec.get_str(LAST_MODIFIED).to_string(),
        });
    }

    let key = rec.get_str(USER_AND_COLLECTION);
    if key.contains(KEY_SEPARATOR) {
        return Classified::Recipe(RecipeRawRecord {
            user_and_collection: key.to_string(),
            referenced_object_id: rec.get_str(REFERENCED_OBJECT_ID).to_string(),
        });
    }

    Classified::Unrecognized(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::raw::AttrValue;

    #[test]
    fn test_collection_type_wins_over_everything() {
        // Even a recipe-looking key is a collection when collectionType is set
        let rec = RawRecord::new()
            .with(COLLECTION_TYPE, "veg")
            .with(USER_AND_COLLECTION, "not-a-number")
            .with(LAST_MODIFIED, "garbage");

        match classify(rec) {
            Classified::Collection(c) => {
                assert_eq!(c.collection_type, "veg");
                assert_eq!(c.user_and_collection, "not-a-number");
                assert_eq!(c.last_modified, "garbage");
                assert_eq!(c.content_type, "");
                assert_eq!(c.referenced_object_id, "");
            }
            other => panic!("expected collection, got {:?}", other),
        }
    }

    #[test]
    fn test_content_type_extracted() {
        let rec = RawRecord::new()
            .with(COLLECTION_TYPE, "user")
            .with(CONTENT_TYPE, "recipe");
        let Classified::Collection(c) = classify(rec) else {
            panic!("expected collection");
        };
        assert_eq!(c.content_type, "recipe");
    }

    #[test]
    fn test_composite_key_is_recipe() {
        let rec = RawRecord::new()
            .with(USER_AND_COLLECTION, "42-abc")
            .with(REFERENCED_OBJECT_ID, "item1");
        assert_eq!(
            classify(rec),
            Classified::Recipe(RecipeRawRecord {
                user_and_collection: "42-abc".into(),
                referenced_object_id: "item1".into(),
            })
        );
    }

    #[test]
    fn test_empty_collection_type_falls_through() {
        let rec = RawRecord::new()
            .with(COLLECTION_TYPE, "")
            .with(USER_AND_COLLECTION, "7-x");
        assert_eq!(classify(rec).kind(), "recipe");

        let rec = RawRecord::new()
            .with(COLLECTION_TYPE, AttrValue::N("3".into()))
            .with(USER_AND_COLLECTION, "7");
        assert_eq!(classify(rec).kind(), "unrecognized");
    }

    #[test]
    fn test_unrecognized_keeps_raw_row() {
        let rec = RawRecord::new().with(USER_AND_COLLECTION, "42");
        assert_eq!(classify(rec.clone()), Classified::Unrecognized(rec));

        let rec = RawRecord::new().with(USER_AND_COLLECTION, AttrValue::N("4-2".into()));
        assert_eq!(classify(rec).kind(), "unrecognized");

        assert_eq!(classify(RawRecord::new()).kind(), "unrecognized");
    }
}
