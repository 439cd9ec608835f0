//! Controllers driving the presentation layer.
//!
//! Every controller owns its state for the lifetime of a single view, and
//! converts all [`Gateway`] failures into that state.
//!
//! [`Gateway`]: crate::infra::Gateway

pub mod listing;
pub mod registration;

pub use self::{listing::Listing, registration::Form};
