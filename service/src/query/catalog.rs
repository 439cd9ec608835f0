//! [`Query`] collection related to reference [`Catalogs`].
//!
//! [`Catalogs`]: crate::domain::catalog::Catalogs

use common::operations::By;

use crate::domain::{Country, DocumentType};
#[cfg(doc)]
use crate::Query;

use super::GatewayQuery;

/// Queries all the available [`Country`]s.
pub type Countries = GatewayQuery<By<Vec<Country>, ()>>;

/// Queries all the available [`DocumentType`]s.
pub type DocumentTypes = GatewayQuery<By<Vec<DocumentType>, ()>>;
