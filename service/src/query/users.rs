//! [`Query`] collection related to multiple [`User`]s.

use common::operations::By;

use crate::domain::User;
#[cfg(doc)]
use crate::Query;

use super::GatewayQuery;

/// Queries the summaries of all the registered [`User`]s.
pub type List = GatewayQuery<By<Vec<User>, ()>>;
