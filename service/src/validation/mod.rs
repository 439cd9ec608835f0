//! Validation of a registration [`Input`].
//!
//! Every [`Field`] is checked against an ordered list of [`Constraint`]s, and
//! only the first violated one is reported. [`Username`] and [`Email`] are
//! additionally checked for uniqueness against the registry, which fails
//! open (see [`Uniqueness`]).
//!
//! [`Email`]: crate::domain::user::Email
//! [`Username`]: crate::domain::user::Username

pub mod uniqueness;

use std::collections::{btree_map, BTreeMap};

use common::Date;
use derive_more::Display;
use futures::future;
use strum::IntoEnumIterator as _;

use crate::domain::{
    catalog::{country, document_type, Catalogs},
    registration::{positive_id, Field, Input},
    user,
};

pub use self::uniqueness::{Checker as UniquenessChecker, Uniqueness};

/// Single rule a [`Field`] value must satisfy.
///
/// Its [`Display`] is the human-readable message shown when it's violated.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Constraint {
    /// Value must not be empty.
    #[display("This field is required")]
    Required,

    /// Value must have at least the given number of characters.
    #[display("Must be at least {_0} characters long")]
    MinLength(usize),

    /// Value must have at most the given number of characters.
    #[display("Must be at most {_0} characters long")]
    MaxLength(usize),

    /// Value must consist of ASCII letters, digits and underscores only.
    #[display("Only letters, digits and underscores are allowed")]
    WordCharacters,

    /// Value must be a syntactically valid email address.
    #[display("Must be a valid email address")]
    EmailSyntax,

    /// Value must contain a lowercase letter.
    #[display("Must contain at least one lowercase letter")]
    Lowercase,

    /// Value must contain an uppercase letter.
    #[display("Must contain at least one uppercase letter")]
    Uppercase,

    /// Value must contain a digit.
    #[display("Must contain at least one digit")]
    Digit,

    /// Value must be equal to the password.
    #[display("Passwords do not match")]
    MatchesPassword,

    /// Value must consist of digits only.
    #[display("Only digits are allowed")]
    DigitsOnly,

    /// Value must contain the given character.
    #[display("Must contain a `{_0}` character")]
    Contains(char),

    /// Value must be a positive integer.
    #[display("Must be a positive integer")]
    PositiveInteger,

    /// Value must reference a loaded [`Country`].
    ///
    /// [`Country`]: crate::domain::Country
    #[display("Must be one of the available countries")]
    KnownCountry,

    /// Value must reference a loaded [`DocumentType`].
    ///
    /// [`DocumentType`]: crate::domain::DocumentType
    #[display("Must be one of the available document types")]
    KnownDocumentType,

    /// Value must be a `YYYY-MM-DD` calendar date.
    #[display("Must be a valid date")]
    IsoDate,

    /// Date must not be later than today.
    #[display("Cannot be later than today")]
    NotInFuture,

    /// Value must not be already registered.
    #[display("Already exists")]
    Unique,
}

impl Constraint {
    /// Returns the ordered [`Constraint`]s of the provided [`Field`], not
    /// including the [`Constraint::Unique`] one checked remotely.
    #[must_use]
    pub const fn of(field: Field) -> &'static [Self] {
        use Constraint as C;
        use Field as F;

        match field {
            F::Username => &[
                C::Required,
                C::MinLength(3),
                C::MaxLength(20),
                C::WordCharacters,
            ],
            F::Email => &[C::Required, C::EmailSyntax],
            F::GivenName | F::FamilyName => &[C::Required, C::MinLength(2)],
            F::Password => &[
                C::Required,
                C::MinLength(8),
                C::Lowercase,
                C::Uppercase,
                C::Digit,
            ],
            F::ConfirmPassword => &[C::Required, C::MatchesPassword],
            F::CellPhone | F::Phone | F::EmergencyPhone => &[
                C::Required,
                C::DigitsOnly,
                C::MinLength(7),
                C::MaxLength(15),
            ],
            F::Address => &[C::Required, C::MinLength(5), C::Contains('#')],
            F::City | F::EmergencyName | F::PlaceOfIssue => &[C::Required],
            F::CountryId => &[C::Required, C::PositiveInteger, C::KnownCountry],
            F::DocumentTypeId => {
                &[C::Required, C::PositiveInteger, C::KnownDocumentType]
            }
            F::DocumentNumber => &[
                C::Required,
                C::DigitsOnly,
                C::MinLength(6),
                C::MaxLength(20),
            ],
            F::DateOfIssue => &[C::Required, C::IsoDate, C::NotInFuture],
        }
    }

    /// Indicates whether the provided `value` satisfies this [`Constraint`].
    ///
    /// [`Constraint::Unique`] always holds here, as it can only be checked
    /// remotely.
    #[must_use]
    pub fn holds(self, value: &str, input: &Input, ctx: &Context<'_>) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::MinLength(min) => value.chars().count() >= min,
            Self::MaxLength(max) => value.chars().count() <= max,
            Self::WordCharacters => value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_'),
            Self::EmailSyntax => user::Email::check(value),
            Self::Lowercase => value.chars().any(|c| c.is_ascii_lowercase()),
            Self::Uppercase => value.chars().any(|c| c.is_ascii_uppercase()),
            Self::Digit => value.chars().any(|c| c.is_ascii_digit()),
            Self::MatchesPassword => value == input.get(Field::Password),
            Self::DigitsOnly => value.chars().all(|c| c.is_ascii_digit()),
            Self::Contains(c) => value.contains(c),
            Self::PositiveInteger => positive_id::<i32>(value).is_some(),
            Self::KnownCountry => positive_id::<country::Id>(value)
                .is_some_and(|id| ctx.catalogs.country(id).is_some()),
            Self::KnownDocumentType => {
                positive_id::<document_type::Id>(value)
                    .is_some_and(|id| ctx.catalogs.document_type(id).is_some())
            }
            Self::IsoDate => Date::from_iso(value).is_ok(),
            Self::NotInFuture => {
                Date::from_iso(value).is_ok_and(|d| d <= ctx.today)
            }
            Self::Unique => true,
        }
    }
}

/// Environment the local [`Constraint`]s are checked in.
#[derive(Clone, Copy, Debug)]
pub struct Context<'c> {
    /// Current calendar date.
    pub today: Date,

    /// Loaded reference [`Catalogs`].
    pub catalogs: &'c Catalogs,
}

impl<'c> Context<'c> {
    /// Creates a new [`Context`] of today with the provided [`Catalogs`].
    #[must_use]
    pub fn new(catalogs: &'c Catalogs) -> Self {
        Self {
            today: Date::today(),
            catalogs,
        }
    }
}

/// Returns the first local [`Constraint`] the provided [`Field`] of the
/// provided [`Input`] violates, if any.
#[must_use]
pub fn check(
    field: Field,
    input: &Input,
    ctx: &Context<'_>,
) -> Option<Constraint> {
    let value = input.get(field);
    Constraint::of(field)
        .iter()
        .copied()
        .find(|c| !c.holds(value, input, ctx))
}

/// Validates the provided [`Field`] of the provided [`Input`], checking its
/// uniqueness remotely once every local [`Constraint`] holds.
pub async fn validate_field<C>(
    checker: &C,
    field: Field,
    input: &Input,
    ctx: &Context<'_>,
) -> Option<Constraint>
where
    C: UniquenessChecker,
{
    if let Some(violated) = check(field, input, ctx) {
        return Some(violated);
    }
    uniqueness::violation(checker, field, input.get(field)).await
}

/// Validates every [`Field`] of the provided [`Input`].
///
/// Remote uniqueness checks run concurrently.
pub async fn validate_all<C>(
    checker: &C,
    input: &Input,
    ctx: &Context<'_>,
) -> Errors
where
    C: UniquenessChecker,
{
    let verdicts = future::join_all(
        Field::iter().map(|f| async move {
            (f, validate_field(checker, f, input, ctx).await)
        }),
    )
    .await;

    let mut errors = Errors::default();
    for (field, violated) in verdicts {
        errors.set(field, violated);
    }
    errors
}

/// Per-[`Field`] validation errors.
///
/// Holds at most one violated [`Constraint`] per [`Field`]. Having no errors
/// is represented by an empty collection.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Errors(BTreeMap<Field, Constraint>);

impl Errors {
    /// Returns the violated [`Constraint`] of the provided [`Field`], if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<Constraint> {
        self.0.get(&field).copied()
    }

    /// Returns the error message of the provided [`Field`], if any.
    #[must_use]
    pub fn message(&self, field: Field) -> Option<String> {
        self.get(field).map(|c| c.to_string())
    }

    /// Sets or clears the violated [`Constraint`] of the provided [`Field`].
    pub fn set(&mut self, field: Field, violated: Option<Constraint>) {
        _ = match violated {
            Some(c) => self.0.insert(field, c),
            None => self.0.remove(&field),
        };
    }

    /// Indicates whether there are no errors at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of [`Field`]s having an error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Constraint)> + '_ {
        self.0.iter().map(|(f, c)| (*f, *c))
    }

    /// Removes all the errors.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl IntoIterator for Errors {
    type Item = (Field, Constraint);
    type IntoIter = btree_map::IntoIter<Field, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
