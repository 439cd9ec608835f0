//! Read-only reference catalogs used to populate selection inputs.

use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// Country a [`User`] may live in.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Country {
    /// ID of this [`Country`].
    pub id: country::Id,

    /// Short code of this [`Country`] (like `CO`).
    pub code: String,

    /// Human-readable name of this [`Country`].
    pub name: String,
}

pub mod country {
    //! [`Country`] definitions.
    //!
    //! [`Country`]: super::Country

    use super::{Deserialize, Display, From, FromStr, Into, Serialize};

    /// ID of a [`Country`].
    ///
    /// [`Country`]: super::Country
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
}

/// Type of an identity document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentType {
    /// ID of this [`DocumentType`].
    pub id: document_type::Id,

    /// Name of this [`DocumentType`] (like `PASSPORT`).
    pub name: String,
}

pub mod document_type {
    //! [`DocumentType`] definitions.
    //!
    //! [`DocumentType`]: super::DocumentType

    use super::{Deserialize, Display, From, FromStr, Into, Serialize};

    /// ID of a [`DocumentType`].
    ///
    /// [`DocumentType`]: super::DocumentType
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
}

/// Reference catalogs loaded once per form session.
///
/// Immutable for the lifetime of the session.
#[derive(Clone, Debug, Default)]
pub struct Catalogs {
    /// Available [`Country`]s.
    pub countries: Vec<Country>,

    /// Available [`DocumentType`]s.
    pub document_types: Vec<DocumentType>,
}

impl Catalogs {
    /// Returns the [`Country`] with the provided [`country::Id`], if any.
    #[must_use]
    pub fn country(&self, id: country::Id) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }

    /// Returns the [`DocumentType`] with the provided [`document_type::Id`],
    /// if any.
    #[must_use]
    pub fn document_type(
        &self,
        id: document_type::Id,
    ) -> Option<&DocumentType> {
        self.document_types.iter().find(|t| t.id == id)
    }
}
