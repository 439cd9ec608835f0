//! [`Gateway`] implementations.
//!
//! [`Gateway`]: crate::infra::Gateway

mod catalog;
mod user;
