//! [`User`] definitions.

pub mod document;

use std::{fmt, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use itertools::Itertools as _;
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};

pub use self::document::Document;

/// Registered user, as owned by the remote registry.
///
/// The client only ever holds a read-only copy of it.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Username`] of this [`User`].
    pub username: Username,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// Given name of this [`User`].
    pub given_name: Option<String>,

    /// Family name of this [`User`].
    pub family_name: Option<String>,

    /// Indicator whether the [`Email`] of this [`User`] is verified.
    pub email_verified: bool,

    /// [`DateTime`] when this [`User`] was registered.
    ///
    /// [`None`] if the registry didn't report it in a recognizable form.
    pub created_at: Option<CreationDateTime>,

    /// [`ContactInfo`] of this [`User`].
    pub contact_info: Option<ContactInfo>,

    /// [`Document`]s of this [`User`], in the order reported by the
    /// registry.
    pub documents: Vec<Document>,
}

impl User {
    /// Returns the full name of this [`User`] (`given family`).
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|n| !n.is_empty())
            .join(" ")
    }
}

/// Contact information of a [`User`].
#[derive(Clone, Debug, Default)]
pub struct ContactInfo {
    /// Cell phone number.
    pub cell_phone: Option<String>,

    /// Landline phone number.
    pub phone: Option<String>,

    /// Postal address.
    pub address: Option<String>,

    /// City of residence.
    pub city: Option<String>,

    /// Code of the country of residence.
    pub country_code: Option<String>,

    /// Name of the country of residence.
    pub country_name: Option<String>,

    /// Name of the emergency contact.
    pub emergency_name: Option<String>,

    /// Phone number of the emergency contact.
    pub emergency_phone: Option<String>,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(i32);

/// Username of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Username(String);

impl Username {
    /// Creates a new [`Username`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `username` matches the format,
    /// or comes from the registry itself.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// Creates a new [`Username`] if the given `username` is valid.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Option<Self> {
        let username = username.into();
        Self::check(&username).then_some(Self(username))
    }

    /// Checks whether the given `username` is a valid [`Username`].
    fn check(username: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Username`] invariants:
        /// - Must contain only ASCII letters, digits and underscores;
        /// - Must be between 3 and 20 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("valid regex")
        });

        REGEX.is_match(username.as_ref())
    }
}

impl FromStr for Username {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Username`")
    }
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format,
    /// or comes from the registry itself.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    #[must_use]
    pub fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                "^([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                  |\\x5c[\\x00-\\x7f])*\\x22)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x22))*\\x40\
                  ([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d))*$",
            )
            .expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Given or family name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (name.chars().count() >= 2).then_some(Self(name))
    }
}

/// Password of a [`User`].
#[derive(Clone, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is strong enough.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`]:
    /// at least 8 characters with a lowercase letter, an uppercase letter
    /// and a digit.
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        password.chars().count() >= 8
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_digit())
    }

    /// Returns the plain text of this [`Password`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Phone number of a [`User`] or of an emergency contact.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format: 7 to 15 digits.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[0-9]{7,15}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

/// [`DateTime`] when a [`User`] was registered.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Email, Name, Password, Phone, User, Username};

    #[test]
    fn checks_usernames() {
        assert!(Username::new("alice_01").is_some());
        assert!(Username::new("abc").is_some());
        assert!(Username::new("a".repeat(20)).is_some());

        assert!(Username::new("ab").is_none());
        assert!(Username::new("a".repeat(21)).is_none());
        assert!(Username::new("alice-01").is_none());
        assert!(Username::new("álice").is_none());
    }

    #[test]
    fn checks_emails() {
        assert!(Email::new("alice@example.com").is_some());
        assert!(Email::new("alice.smith@mail.example.org").is_some());

        assert!(Email::new("alice").is_none());
        assert!(Email::new("alice@").is_none());
        assert!(Email::new("@example.com").is_none());
        assert!(Email::new("alice smith@example.com").is_none());
    }

    #[test]
    fn checks_passwords() {
        assert!(Password::new("Secret123").is_some());

        assert!(Password::new("Sec123").is_none());
        assert!(Password::new("secret123").is_none());
        assert!(Password::new("SECRET123").is_none());
        assert!(Password::new("SecretPass").is_none());
    }

    #[test]
    fn checks_names_and_phones() {
        assert!(Name::new("Jo").is_some());
        assert!(Name::new("J").is_none());

        assert!(Phone::new("3001234567").is_some());
        assert!(Phone::new("123456").is_none());
        assert!(Phone::new("300-123-4567").is_none());
    }

    #[test]
    fn joins_full_name() {
        #[expect(unsafe_code, reason = "test fixture")]
        let user = User {
            id: 1.into(),
            username: unsafe { Username::new_unchecked("alice") },
            email: unsafe { Email::new_unchecked("alice@example.com") },
            given_name: Some("Alice".into()),
            family_name: None,
            email_verified: false,
            created_at: None,
            contact_info: None,
            documents: vec![],
        };
        assert_eq!(user.full_name(), "Alice");
    }
}
