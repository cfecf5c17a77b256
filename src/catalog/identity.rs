use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Release key for one catalog in the version chain (e.g. `4.0.2`).
///
/// Published catalogs are looked up by this key, and every derived version
/// names the key of the catalog it was cloned from.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionKey(pub String);

/// Stable identifier for a documentation entry; unique within a catalog.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

/// Stable identifier for a category; tracked across versions.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

macro_rules! string_key {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        // Hash/Eq are derived from the inner String, so borrowing as str keeps
        // map lookups consistent.
        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_key!(VersionKey);
string_key!(EntryId);
string_key!(CategoryId);

/// Badge shown next to an entry.
///
/// Known variants keep serialization consistent; `Other` preserves labels
/// introduced by newer catalogs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Label {
    TechnicalPreview,
    Deprecated,
    Other(String),
}

impl Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl Label {
    pub fn as_str(&self) -> &str {
        match self {
            Label::TechnicalPreview => "Technical Preview",
            Label::Deprecated => "Deprecated",
            Label::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "Technical Preview" => Label::TechnicalPreview,
            "Deprecated" => Label::Deprecated,
            other => Label::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
