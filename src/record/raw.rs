//! Raw, loosely-typed rows as returned by a table scan

use std::collections::BTreeMap;
use std::fmt;

/// Composite `<owner>` or `<owner>-<collection>` key
pub const USER_AND_COLLECTION: &str = "userAndCollection";
/// Id of the object the row points at (collection uuid or recipe id)
pub const REFERENCED_OBJECT_ID: &str = "referencedObjectId";
/// Present only on collection rows
pub const COLLECTION_TYPE: &str = "collectionType";
pub const CONTENT_TYPE: &str = "contentType";
pub const LAST_MODIFIED: &str = "lastModified";

/// A dynamically-typed attribute value
///
/// Numbers keep their decimal string form, as the store transmits them.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    S(String),
    N(String),
    B(Vec<u8>),
    Bool(bool),
    Null,
    L(Vec<AttrValue>),
    M(BTreeMap<String, AttrValue>),
    Ss(Vec<String>),
    Ns(Vec<String>),
    Bs(Vec<Vec<u8>>),
}

impl AttrValue {
    /// String contents, or `None` for every other kind
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::S(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::S(s)
    }
}

/// One row of a scan page: field name to value, ordered by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<String, AttrValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<AttrValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&AttrValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// String value of `field`; absent and non-string values read as `""`
    pub fn get_str(&self, field: &str) -> &str {
        self.get(field).and_then(AttrValue::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, AttrValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", k, v)?;
        }
        write!(f, "}}")
    }
}
