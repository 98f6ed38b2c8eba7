//! Internal part numbers (IPN) in the `CCC-NNN-VVVV` format

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static IPN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{3})-([0-9]{3})-([0-9]{4})$").expect("IPN pattern is a valid regex")
});

static CATEGORY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("category pattern is a valid regex"));

/// Categories whose part numbers are allocated by us (as opposed to
/// purchased parts that are only referenced by number)
pub const OWN_CATEGORIES: &[&str] = &["PCB", "PCA", "ASY", "DOC", "DFW", "DSW", "DCL", "FIX"];

/// Categories that carry a bill of materials
pub const BOM_CATEGORIES: &[&str] = &["PCA", "ASY"];

/// Largest sequence number that fits in the `NNN` field
pub const MAX_SEQUENCE: i64 = 999;

/// Largest revision that fits in the `VVVV` field
pub const MAX_REVISION: i64 = 9999;

/// An internal part number: category, sequence and revision
///
/// The string form is the identity. Two IPNs are equal iff their strings are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipn(String);

impl Ipn {
    /// Parse and validate an IPN string
    pub fn parse(s: &str) -> Result<Self, IpnError> {
        if IPN_PATTERN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(IpnError::InvalidFormat(s.to_string()))
        }
    }

    /// Build an IPN from its components, zero-padding the numeric fields
    pub fn from_parts(category: &str, sequence: i64, revision: i64) -> Result<Self, IpnError> {
        if !CATEGORY_PATTERN.is_match(category) {
            return Err(IpnError::InvalidCategory(category.to_string()));
        }
        if !(0..=MAX_SEQUENCE).contains(&sequence) {
            return Err(IpnError::SequenceOutOfRange(sequence));
        }
        if !(0..=MAX_REVISION).contains(&revision) {
            return Err(IpnError::RevisionOutOfRange(revision));
        }
        Ok(Self(format!("{}-{:03}-{:04}", category, sequence, revision)))
    }

    /// The raw identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn captures(&self) -> Result<regex::Captures<'_>, IpnError> {
        IPN_PATTERN
            .captures(&self.0)
            .ok_or_else(|| IpnError::InvalidFormat(self.0.clone()))
    }

    /// Category code (`CCC`)
    pub fn category(&self) -> Result<&str, IpnError> {
        let caps = self.captures()?;
        Ok(caps.get(1).map_or("", |m| m.as_str()))
    }

    /// Sequence number within the category (`NNN`)
    pub fn sequence(&self) -> Result<i64, IpnError> {
        let caps = self.captures()?;
        caps[2]
            .parse()
            .map_err(|_| IpnError::InvalidFormat(self.0.clone()))
    }

    /// Revision number (`VVVV`)
    pub fn revision(&self) -> Result<i64, IpnError> {
        let caps = self.captures()?;
        caps[3]
            .parse()
            .map_err(|_| IpnError::InvalidFormat(self.0.clone()))
    }

    /// Revision field as it appears in the identifier, e.g. `"0004"`
    pub fn revision_str(&self) -> Result<&str, IpnError> {
        let caps = self.captures()?;
        Ok(caps.get(3).map_or("", |m| m.as_str()))
    }

    /// True for part numbers allocated in our own namespace
    pub fn is_own(&self) -> Result<bool, IpnError> {
        Ok(OWN_CATEGORIES.contains(&self.category()?))
    }

    /// True for parts that carry a bill of materials
    pub fn has_bom(&self) -> Result<bool, IpnError> {
        Ok(BOM_CATEGORIES.contains(&self.category()?))
    }
}

/// Extract the category from a string that may or may not be a valid IPN
pub fn category_of(s: &str) -> Option<&str> {
    IPN_PATTERN
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract the revision field from a string that may or may not be a valid IPN
pub fn revision_of(s: &str) -> Option<&str> {
    IPN_PATTERN
        .captures(s)
        .and_then(|caps| caps.get(3))
        .map(|m| m.as_str())
}

impl fmt::Display for Ipn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ipn {
    type Err = IpnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Ipn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Ipn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Ipn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing or building IPNs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IpnError {
    #[error("invalid IPN '{0}' (expected CCC-NNN-VVVV, e.g. CAP-001-0001)")]
    InvalidFormat(String),

    #[error("invalid IPN category '{0}' (expected three uppercase letters)")]
    InvalidCategory(String),

    #[error("IPN sequence {0} out of range (0-999)")]
    SequenceOutOfRange(i64),

    #[error("IPN revision {0} out of range (0-9999)")]
    RevisionOutOfRange(i64),
}
