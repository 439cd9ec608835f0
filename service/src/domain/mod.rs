//! Domain definitions.

pub mod catalog;
pub mod registration;
pub mod user;

pub use self::{
    catalog::{Catalogs, Country, DocumentType},
    registration::Registration,
    user::User,
};
