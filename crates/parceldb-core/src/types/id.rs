//! Parcel identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A validated parcel identifier.
///
/// Parcel identifiers are the stable primary key of the store, typically an
/// assessor parcel number such as `"4218-016-018"`. They must be non-empty,
/// at most 255 bytes, and free of control characters; beyond that the format
/// is opaque. Identifiers order lexicographically by their UTF-8 bytes,
/// which is also their storage key order, so deterministic tie-breaking in
/// query results follows the same ordering everywhere.
///
/// # Example
///
/// ```
/// use parceldb_core::ParcelId;
///
/// let id = ParcelId::new("4218-016-018").unwrap();
/// assert_eq!(id.as_str(), "4218-016-018");
/// assert!(ParcelId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParcelId(String);

impl ParcelId {
    /// Create a new validated parcel identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty, longer than 255 bytes,
    /// or contains control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, ParcelIdError> {
        let id = id.into();

        if id.is_empty() {
            return Err(ParcelIdError::Empty);
        }

        // Identifiers end up in storage keys, logs, and reports
        if id.chars().any(char::is_control) {
            return Err(ParcelIdError::InvalidCharacters(id));
        }

        if id.len() > 255 {
            return Err(ParcelIdError::TooLong(id.len()));
        }

        Ok(Self(id))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the identifier's UTF-8 bytes, the form used in storage keys.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Consume and return the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ParcelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when creating a parcel identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParcelIdError {
    #[error("parcel id cannot be empty")]
    Empty,

    #[error("parcel id '{0}' contains control characters")]
    InvalidCharacters(String),

    #[error("parcel id too long: {0} bytes (maximum: 255)")]
    TooLong(usize),
}
