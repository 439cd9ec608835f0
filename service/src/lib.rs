//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod controller;
pub mod domain;
pub mod infra;
pub mod notify;
pub mod query;
pub mod validation;

#[cfg(doc)]
use infra::Gateway;

pub use self::{command::Command, notify::Notifier, query::Query};

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Gw> {
    /// [`Gateway`] of this [`Service`].
    gateway: Gw,
}

impl<Gw> Service<Gw> {
    /// Creates a new [`Service`] on top of the provided [`Gateway`].
    #[must_use]
    pub const fn new(gateway: Gw) -> Self {
        Self { gateway }
    }

    /// Returns [`Gateway`] of this [`Service`].
    #[must_use]
    pub const fn gateway(&self) -> &Gw {
        &self.gateway
    }
}

#[cfg(all(test, feature = "graphql"))]
pub(crate) mod fake;
