//! Strongly-typed collection entities and the raw-to-domain mapping
//!
//! Mapping is total: every raw record yields either an entity or a
//! [`FieldParseError`] naming the field and raw value that failed. Nothing is
//! defaulted; a record with any bad sub-field is rejected whole.

use super::classify::{CollectionRawRecord, RecipeRawRecord, KEY_SEPARATOR};
use super::raw::{LAST_MODIFIED, REFERENCED_OBJECT_ID, USER_AND_COLLECTION};
use crate::error::{FieldParseError, ParseResult};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use uuid::Uuid;

/// Owner (user) identifier. Values always fit in 32 bits.
pub type OwnerId = i64;

/// Owner id to that owner's collections, in arrival order
pub type UsersIndex = HashMap<OwnerId, Vec<Collection>>;

/// Collection id to the recipes saved into it, in arrival order
pub type CollectionsIndex = HashMap<Uuid, Vec<SavedItem>>;

/// Regex for splitting a recipe row's `<owner>-<collection>` key
static COMPOSITE_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)-(.*)$").expect("Invalid composite key regex")
});

/// Strict RFC3339 layout, checked before chrono parses the value.
/// Leap seconds are rejected.
static RFC3339_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-5][0-9](\.[0-9]+)?(Z|[+-][0-9]{2}:[0-9]{2})$")
        .expect("Invalid timestamp regex")
});

/// A user's collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub collection_id: Uuid,
    pub owner: OwnerId,
    pub collection_type: String,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

impl Collection {
    /// Map a classified collection row into a [`Collection`]
    pub fn from_raw(rec: &CollectionRawRecord) -> ParseResult<Self> {
        let owner = parse_owner(USER_AND_COLLECTION, &rec.user_and_collection)?;
        let collection_id = parse_uuid(REFERENCED_OBJECT_ID, &rec.referenced_object_id)?;
        let last_modified = parse_timestamp(LAST_MODIFIED, &rec.last_modified)?;

        Ok(Self {
            collection_id,
            owner,
            collection_type: rec.collection_type.clone(),
            content_type: rec.content_type.clone(),
            last_modified,
        })
    }

    /// Format back into the raw row shape the table stores
    pub fn to_raw(&self) -> CollectionRawRecord {
        CollectionRawRecord {
            user_and_collection: self.owner.to_string(),
            referenced_object_id: self.collection_id.to_string(),
            collection_type: self.collection_type.clone(),
            content_type: self.content_type.clone(),
            last_modified: self.last_modified.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// A recipe saved into a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedItem {
    pub owner: OwnerId,
    pub collection_id: Uuid,
    /// Opaque, carried through unparsed
    pub recipe_id: String,
}

impl SavedItem {
    /// Map a classified recipe row into a [`SavedItem`]
    ///
    /// A collection id that is not a UUID rejects the row, same as for
    /// collections; it is never replaced by a nil id.
    pub fn from_raw(rec: &RecipeRawRecord) -> ParseResult<Self> {
        let key = &rec.user_and_collection;
        let caps = COMPOSITE_KEY_REGEX.captures(key).ok_or_else(|| {
            FieldParseError::MalformedCompositeKey {
                field: USER_AND_COLLECTION,
                value: key.clone(),
            }
        })?;

        // Both groups always participate in a match
        let owner = parse_owner(USER_AND_COLLECTION, &caps[1])?;
        let collection_id = parse_uuid(USER_AND_COLLECTION, &caps[2])?;

        Ok(Self {
            owner,
            collection_id,
            recipe_id: rec.referenced_object_id.clone(),
        })
    }

    pub fn to_raw(&self) -> RecipeRawRecord {
        RecipeRawRecord {
            user_and_collection: format!("{}{}{}", self.owner, KEY_SEPARATOR, self.collection_id),
            referenced_object_id: self.recipe_id.clone(),
        }
    }
}

fn parse_owner(field: &'static str, value: &str) -> ParseResult<OwnerId> {
    value
        .parse::<i32>()
        .map(OwnerId::from)
        .map_err(|_| FieldParseError::InvalidOwner {
            field,
            value: value.to_string(),
        })
}

fn parse_timestamp(field: &'static str, value: &str) -> ParseResult<DateTime<Utc>> {
    let invalid = || FieldParseError::InvalidTimestamp {
        field,
        value: value.to_string(),
    };
    if !RFC3339_REGEX.is_match(value) {
        return Err(invalid());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| invalid())
}

fn parse_uuid(field: &'static str, value: &str) -> ParseResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| FieldParseError::InvalidCollectionId {
        field,
        value: value.to_string(),
    })
}
