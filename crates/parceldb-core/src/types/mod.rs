//! Core data types for `ParcelDB`.
//!
//! This module defines the record, identifier, attribute, and result types
//! shared across the workspace.

mod id;
mod parcel;
mod scored;
mod value;

pub use id::{ParcelId, ParcelIdError};
pub use parcel::{Parcel, ParcelDraft};
pub use scored::{ScoredId, ScoredParcel};
pub use value::Value;
