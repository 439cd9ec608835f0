//! Remote uniqueness checks of [`Username`]s and [`Email`]s.

use std::future::Future;

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        registration::Field,
        user::{Email, Username},
    },
    infra::{gateway, Gateway},
    query, Query as _, Service,
};

use super::Constraint;

/// Outcome of a remote uniqueness check.
///
/// An unreachable registry yields an unchecked outcome, which is still
/// considered unique: the registry re-checks uniqueness on submission anyway.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Uniqueness {
    /// Indicator whether the registry actually answered.
    pub checked: bool,

    /// Indicator whether the value is not registered yet.
    pub unique: bool,
}

impl Uniqueness {
    /// [`Uniqueness`] of a value the registry couldn't be asked about.
    pub const UNKNOWN: Self = Self {
        checked: false,
        unique: true,
    };

    /// Creates a new [`Uniqueness`] answered by the registry.
    #[must_use]
    pub const fn confirmed(unique: bool) -> Self {
        Self {
            checked: true,
            unique,
        }
    }

    /// Indicates whether this [`Uniqueness`] allows proceeding with the
    /// value.
    #[must_use]
    pub const fn is_unique(self) -> bool {
        self.unique
    }
}

/// Lookup of already registered [`Username`]s and [`Email`]s.
pub trait Checker {
    /// Checks whether the provided [`Username`] is already registered.
    fn username_exists(
        &self,
        username: Username,
    ) -> impl Future<Output = Result<bool, Traced<gateway::Error>>>;

    /// Checks whether the provided [`Email`] is already registered.
    fn email_exists(
        &self,
        email: Email,
    ) -> impl Future<Output = Result<bool, Traced<gateway::Error>>>;
}

impl<Gw> Checker for Service<Gw>
where
    Gw: Gateway<
            Select<By<bool, Username>>,
            Ok = bool,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Select<By<bool, Email>>,
            Ok = bool,
            Err = Traced<gateway::Error>,
        >,
{
    async fn username_exists(
        &self,
        username: Username,
    ) -> Result<bool, Traced<gateway::Error>> {
        self.execute(query::user::UsernameExists::by(username)).await
    }

    async fn email_exists(
        &self,
        email: Email,
    ) -> Result<bool, Traced<gateway::Error>> {
        self.execute(query::user::EmailExists::by(email)).await
    }
}

/// Checks the provided `value` of the provided [`Field`] for uniqueness.
///
/// Returns [`None`] if the [`Field`] is not checked remotely, or the `value`
/// is not well-formed enough to be asked about.
pub async fn check<C>(
    checker: &C,
    field: Field,
    value: &str,
) -> Option<Uniqueness>
where
    C: Checker,
{
    let exists = match field {
        Field::Username => checker.username_exists(Username::new(value)?).await,
        Field::Email => checker.email_exists(Email::new(value)?).await,
        Field::GivenName
        | Field::FamilyName
        | Field::Password
        | Field::ConfirmPassword
        | Field::CellPhone
        | Field::Phone
        | Field::Address
        | Field::City
        | Field::CountryId
        | Field::EmergencyName
        | Field::EmergencyPhone
        | Field::DocumentTypeId
        | Field::DocumentNumber
        | Field::DateOfIssue
        | Field::PlaceOfIssue => return None,
    };
    Some(match exists {
        Ok(exists) => Uniqueness::confirmed(!exists),
        Err(e) => {
            log::warn!(
                "failed to check `{field}` uniqueness, assuming it's \
                 unique: {e}",
            );
            Uniqueness::UNKNOWN
        }
    })
}

/// Returns [`Constraint::Unique`] if the provided `value` of the provided
/// [`Field`] is known to be already registered.
pub async fn violation<C>(
    checker: &C,
    field: Field,
    value: &str,
) -> Option<Constraint>
where
    C: Checker,
{
    check(checker, field, value)
        .await
        .filter(|u| !u.is_unique())
        .map(|_| Constraint::Unique)
}
