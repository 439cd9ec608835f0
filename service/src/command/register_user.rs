//! [`Command`] for registering a new [`User`].
//!
//! [`User`]: crate::domain::User

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        registration::{self, Registered},
        Registration,
    },
    infra::{gateway, Gateway},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`User`] out of a raw
/// [`registration::Input`].
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct RegisterUser {
    /// [`registration::Input`] to register a new [`User`] with.
    ///
    /// [`User`]: crate::domain::User
    pub input: registration::Input,
}

impl<Gw> Command<RegisterUser> for Service<Gw>
where
    Gw: Gateway<
        Insert<Registration>,
        Ok = Registered,
        Err = Traced<gateway::Error>,
    >,
{
    type Ok = Registered;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RegisterUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let registration = cmd
            .input
            .normalize()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let registered = self
            .gateway()
            .execute(Insert(registration))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!(
            "registered `{}` user with ID `{}`",
            registered.username,
            registered.id,
        );

        Ok(registered)
    }
}

/// Error of [`RegisterUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    Gateway(gateway::Error),

    /// [`registration::Input`] cannot be normalized.
    #[display("Invalid registration: {_0}")]
    InvalidInput(registration::NormalizationError),
}

impl ExecutionError {
    /// Returns a human-readable message describing this [`ExecutionError`].
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Gateway(e) => e.message(),
            Self::InvalidInput(e) => e.to_string(),
        }
    }
}
