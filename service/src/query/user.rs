//! [`Query`] collection related to a single [`User`].

use common::operations::By;

use crate::domain::{
    user::{self, Email, Username},
    User,
};
#[cfg(doc)]
use crate::Query;

use super::GatewayQuery;

/// Queries the full detail of a [`User`] by its [`user::Id`].
pub type ById = GatewayQuery<By<Option<User>, user::Id>>;

/// Queries whether a [`User`] with the provided [`Username`] exists.
pub type UsernameExists = GatewayQuery<By<bool, Username>>;

/// Queries whether a [`User`] with the provided [`Email`] exists.
pub type EmailExists = GatewayQuery<By<bool, Email>>;
