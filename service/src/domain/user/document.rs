//! [`Document`] definitions.

use std::sync::LazyLock;

use common::{unit, DateOf};
use derive_more::{AsRef, Display};
use regex::Regex;

use crate::domain::catalog::document_type;
#[cfg(doc)]
use crate::domain::{catalog::DocumentType, User};

/// Identity document of a [`User`].
#[derive(Clone, Debug)]
pub struct Document {
    /// ID of the [`DocumentType`] of this [`Document`].
    pub type_id: Option<document_type::Id>,

    /// Name of the [`DocumentType`] of this [`Document`].
    ///
    /// Only reported by the detailed [`User`] view.
    pub type_name: Option<String>,

    /// Number of this [`Document`].
    pub number: Option<String>,

    /// [`IssueDate`] of this [`Document`].
    pub date_of_issue: Option<IssueDate>,

    /// Place where this [`Document`] was issued.
    pub place_of_issue: Option<String>,
}

/// Number of a [`Document`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Number`] format: 6 to 20 digits.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[0-9]{6,20}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

/// Calendar date when a [`Document`] was issued.
pub type IssueDate = DateOf<(Document, unit::Issue)>;

#[cfg(test)]
mod spec {
    use super::Number;

    #[test]
    fn checks_numbers() {
        assert!(Number::new("123456").is_some());
        assert!(Number::new("1".repeat(20)).is_some());

        assert!(Number::new("12345").is_none());
        assert!(Number::new("1".repeat(21)).is_none());
        assert!(Number::new("AB123456").is_none());
    }
}
