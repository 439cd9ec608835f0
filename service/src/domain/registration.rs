//! [`Registration`] definitions: raw form [`Input`] and its normalized
//! representation sent to the registry.

use derive_more::{Debug, Display, Error};
use secrecy::SecretBox;
use serde::Deserialize;
use strum::{AsRefStr, EnumIter, EnumString};

use crate::domain::{
    catalog::{country, document_type},
    user::{self, document},
};

/// Section of a registration form.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Group {
    /// Account information.
    #[display("user")]
    User,

    /// Contact information.
    #[display("contactInfo")]
    ContactInfo,

    /// Identity document information.
    #[display("document")]
    Document,
}

/// Field of a registration form, addressed by its `group.name` path.
///
/// Variants are declared in the order the form presents them.
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    strum::Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub enum Field {
    /// [`UserInput::username`].
    #[strum(serialize = "user.username")]
    Username,

    /// [`UserInput::email`].
    #[strum(serialize = "user.email")]
    Email,

    /// [`UserInput::given_name`].
    #[strum(serialize = "user.givenName")]
    GivenName,

    /// [`UserInput::family_name`].
    #[strum(serialize = "user.familyName")]
    FamilyName,

    /// [`UserInput::password`].
    #[strum(serialize = "user.password")]
    Password,

    /// [`UserInput::confirm_password`].
    #[strum(serialize = "user.confirmPassword")]
    ConfirmPassword,

    /// [`ContactInfoInput::cell_phone`].
    #[strum(serialize = "contactInfo.cellPhone")]
    CellPhone,

    /// [`ContactInfoInput::phone`].
    #[strum(serialize = "contactInfo.phone")]
    Phone,

    /// [`ContactInfoInput::address`].
    #[strum(serialize = "contactInfo.address")]
    Address,

    /// [`ContactInfoInput::city`].
    #[strum(serialize = "contactInfo.city")]
    City,

    /// [`ContactInfoInput::country_id`].
    #[strum(serialize = "contactInfo.countryId")]
    CountryId,

    /// [`ContactInfoInput::emergency_name`].
    #[strum(serialize = "contactInfo.emergencyName")]
    EmergencyName,

    /// [`ContactInfoInput::emergency_phone`].
    #[strum(serialize = "contactInfo.emergencyPhone")]
    EmergencyPhone,

    /// [`DocumentInput::document_type_id`].
    #[strum(serialize = "document.documentTypeId")]
    DocumentTypeId,

    /// [`DocumentInput::document_number`].
    #[strum(serialize = "document.documentNumber")]
    DocumentNumber,

    /// [`DocumentInput::date_of_issue`].
    #[strum(serialize = "document.dateOfIssue")]
    DateOfIssue,

    /// [`DocumentInput::place_of_issue`].
    #[strum(serialize = "document.placeOfIssue")]
    PlaceOfIssue,
}

impl Field {
    /// Returns the [`Group`] this [`Field`] belongs to.
    #[must_use]
    pub const fn group(self) -> Group {
        match self {
            Self::Username
            | Self::Email
            | Self::GivenName
            | Self::FamilyName
            | Self::Password
            | Self::ConfirmPassword => Group::User,
            Self::CellPhone
            | Self::Phone
            | Self::Address
            | Self::City
            | Self::CountryId
            | Self::EmergencyName
            | Self::EmergencyPhone => Group::ContactInfo,
            Self::DocumentTypeId
            | Self::DocumentNumber
            | Self::DateOfIssue
            | Self::PlaceOfIssue => Group::Document,
        }
    }

    /// Indicates whether validating this [`Field`] requires a round trip to
    /// the registry.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Username | Self::Email)
    }
}

/// Raw state of a registration form, exactly as typed by a user.
///
/// Every value is kept as text, including the catalog references, so the
/// form can hold any intermediate state.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Input {
    /// Account section.
    pub user: UserInput,

    /// Contact section.
    pub contact_info: ContactInfoInput,

    /// Document section.
    pub document: DocumentInput,
}

/// Account section of an [`Input`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserInput {
    /// Desired username.
    pub username: String,

    /// Email address.
    pub email: String,

    /// Given name.
    pub given_name: String,

    /// Family name.
    pub family_name: String,

    /// Password.
    #[debug(skip)]
    pub password: String,

    /// Password typed a second time.
    #[debug(skip)]
    pub confirm_password: String,
}

/// Contact section of an [`Input`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfoInput {
    /// Cell phone number.
    pub cell_phone: String,

    /// Landline phone number.
    pub phone: String,

    /// Postal address.
    pub address: String,

    /// City of residence.
    pub city: String,

    /// Selected [`country::Id`].
    pub country_id: String,

    /// Name of the emergency contact.
    pub emergency_name: String,

    /// Phone of the emergency contact.
    pub emergency_phone: String,
}

/// Document section of an [`Input`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentInput {
    /// Selected [`document_type::Id`].
    pub document_type_id: String,

    /// Document number.
    pub document_number: String,

    /// Issue date in `YYYY-MM-DD` format.
    pub date_of_issue: String,

    /// Place of issue.
    pub place_of_issue: String,
}

impl Input {
    /// Returns the current value of the provided [`Field`].
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        use Field as F;

        let Self {
            user,
            contact_info: contact,
            document,
        } = self;
        match field {
            F::Username => &user.username,
            F::Email => &user.email,
            F::GivenName => &user.given_name,
            F::FamilyName => &user.family_name,
            F::Password => &user.password,
            F::ConfirmPassword => &user.confirm_password,
            F::CellPhone => &contact.cell_phone,
            F::Phone => &contact.phone,
            F::Address => &contact.address,
            F::City => &contact.city,
            F::CountryId => &contact.country_id,
            F::EmergencyName => &contact.emergency_name,
            F::EmergencyPhone => &contact.emergency_phone,
            F::DocumentTypeId => &document.document_type_id,
            F::DocumentNumber => &document.document_number,
            F::DateOfIssue => &document.date_of_issue,
            F::PlaceOfIssue => &document.place_of_issue,
        }
    }

    /// Replaces the value of the provided [`Field`].
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    /// Returns a mutable reference to the value of the provided [`Field`].
    fn slot(&mut self, field: Field) -> &mut String {
        use Field as F;

        let Self {
            user,
            contact_info: contact,
            document,
        } = self;
        match field {
            F::Username => &mut user.username,
            F::Email => &mut user.email,
            F::GivenName => &mut user.given_name,
            F::FamilyName => &mut user.family_name,
            F::Password => &mut user.password,
            F::ConfirmPassword => &mut user.confirm_password,
            F::CellPhone => &mut contact.cell_phone,
            F::Phone => &mut contact.phone,
            F::Address => &mut contact.address,
            F::City => &mut contact.city,
            F::CountryId => &mut contact.country_id,
            F::EmergencyName => &mut contact.emergency_name,
            F::EmergencyPhone => &mut contact.emergency_phone,
            F::DocumentTypeId => &mut document.document_type_id,
            F::DocumentNumber => &mut document.document_number,
            F::DateOfIssue => &mut document.date_of_issue,
            F::PlaceOfIssue => &mut document.place_of_issue,
        }
    }

    /// Normalizes this [`Input`] into a [`Registration`] ready to be sent to
    /// the registry.
    ///
    /// Catalog references are converted to integers, and the password
    /// confirmation is dropped.
    ///
    /// # Errors
    ///
    /// Errors with the first [`Field`] which value cannot be normalized.
    pub fn normalize(&self) -> Result<Registration, NormalizationError> {
        use Field as F;

        let Self {
            user: account,
            contact_info: contact,
            document: doc,
        } = self;

        if account.password != account.confirm_password {
            return Err(NormalizationError(F::ConfirmPassword));
        }

        Ok(Registration {
            user: NewUser {
                username: valid(user::Username::new(&*account.username), F::Username)?,
                email: valid(user::Email::new(&*account.email), F::Email)?,
                given_name: valid(user::Name::new(&*account.given_name), F::GivenName)?,
                family_name: valid(
                    user::Name::new(&*account.family_name),
                    F::FamilyName,
                )?,
                password: SecretBox::new(Box::new(valid(
                    user::Password::new(&*account.password),
                    F::Password,
                )?)),
            },
            contact_info: NewContactInfo {
                cell_phone: valid(user::Phone::new(&*contact.cell_phone), F::CellPhone)?,
                phone: valid(user::Phone::new(&*contact.phone), F::Phone)?,
                address: valid(
                    Some(contact.address.clone())
                        .filter(|a| a.chars().count() >= 5 && a.contains('#')),
                    F::Address,
                )?,
                city: valid(non_empty(&contact.city), F::City)?,
                country_id: valid(positive_id(&contact.country_id), F::CountryId)?,
                emergency_name: valid(
                    non_empty(&contact.emergency_name),
                    F::EmergencyName,
                )?,
                emergency_phone: valid(
                    user::Phone::new(&*contact.emergency_phone),
                    F::EmergencyPhone,
                )?,
            },
            document: NewDocument {
                type_id: valid(
                    positive_id(&doc.document_type_id),
                    F::DocumentTypeId,
                )?,
                number: valid(
                    document::Number::new(&*doc.document_number),
                    F::DocumentNumber,
                )?,
                date_of_issue: valid(
                    document::IssueDate::from_iso(&doc.date_of_issue).ok(),
                    F::DateOfIssue,
                )?,
                place_of_issue: valid(
                    non_empty(&doc.place_of_issue),
                    F::PlaceOfIssue,
                )?,
            },
        })
    }
}

/// Parses a positive integer catalog reference out of the provided `raw`
/// text.
pub(crate) fn positive_id<Id: From<i32>>(raw: &str) -> Option<Id> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .map(Id::from)
}

/// Returns an owned copy of the provided `value` if it's not empty.
fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

/// Attributes a missing normalized value to the provided [`Field`].
fn valid<T>(value: Option<T>, field: Field) -> Result<T, NormalizationError> {
    value.ok_or(NormalizationError(field))
}

/// Error of normalizing an [`Input`] with an invalid [`Field`] value.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`{_0}` has an invalid value")]
pub struct NormalizationError(#[error(not(source))] pub Field);

/// Normalized registration of a new [`User`].
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Registration {
    /// Account section.
    pub user: NewUser,

    /// Contact section.
    pub contact_info: NewContactInfo,

    /// Document section.
    pub document: NewDocument,
}

/// Normalized account section of a [`Registration`].
#[derive(Clone, Debug)]
pub struct NewUser {
    /// [`user::Username`] of the new user.
    pub username: user::Username,

    /// [`user::Email`] of the new user.
    pub email: user::Email,

    /// Given name of the new user.
    pub given_name: user::Name,

    /// Family name of the new user.
    pub family_name: user::Name,

    /// [`user::Password`] of the new user.
    pub password: SecretBox<user::Password>,
}

/// Normalized contact section of a [`Registration`].
#[derive(Clone, Debug)]
pub struct NewContactInfo {
    /// Cell phone number.
    pub cell_phone: user::Phone,

    /// Landline phone number.
    pub phone: user::Phone,

    /// Postal address.
    pub address: String,

    /// City of residence.
    pub city: String,

    /// [`country::Id`] of the country of residence.
    pub country_id: country::Id,

    /// Name of the emergency contact.
    pub emergency_name: String,

    /// Phone of the emergency contact.
    pub emergency_phone: user::Phone,
}

/// Normalized document section of a [`Registration`].
#[derive(Clone, Debug)]
pub struct NewDocument {
    /// [`document_type::Id`] of the document.
    pub type_id: document_type::Id,

    /// [`document::Number`] of the document.
    pub number: document::Number,

    /// [`document::IssueDate`] of the document.
    pub date_of_issue: document::IssueDate,

    /// Place of issue of the document.
    pub place_of_issue: String,
}

/// Summary of a [`User`] created by a [`Registration`].
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Registered {
    /// [`user::Id`] of the created user.
    pub id: user::Id,

    /// [`user::Username`] of the created user.
    pub username: user::Username,

    /// [`user::Email`] of the created user.
    pub email: user::Email,
}

#[cfg(test)]
pub(crate) mod spec {
    use std::str::FromStr as _;

    use secrecy::ExposeSecret as _;
    use strum::IntoEnumIterator as _;

    use super::{Field, Group, Input};
    use crate::domain::{catalog::country, catalog::document_type};

    /// Returns an [`Input`] passing every structural rule.
    pub(crate) fn valid_input() -> Input {
        let mut input = Input::default();
        for (field, value) in [
            (Field::Username, "alice_01"),
            (Field::Email, "alice@example.com"),
            (Field::GivenName, "Alice"),
            (Field::FamilyName, "Smith"),
            (Field::Password, "Secret123"),
            (Field::ConfirmPassword, "Secret123"),
            (Field::CellPhone, "3001234567"),
            (Field::Phone, "6011234567"),
            (Field::Address, "Calle 10 # 20"),
            (Field::City, "Bogota"),
            (Field::CountryId, "3"),
            (Field::EmergencyName, "Bob Smith"),
            (Field::EmergencyPhone, "3017654321"),
            (Field::DocumentTypeId, "1"),
            (Field::DocumentNumber, "1020304050"),
            (Field::DateOfIssue, "2015-06-01"),
            (Field::PlaceOfIssue, "Medellin"),
        ] {
            input.set(field, value);
        }
        input
    }

    #[test]
    fn addresses_fields_by_path() {
        assert_eq!(Field::Username.to_string(), "user.username");
        assert_eq!(Field::CountryId.as_ref(), "contactInfo.countryId");
        assert_eq!(
            Field::from_str("document.dateOfIssue").unwrap(),
            Field::DateOfIssue,
        );
        assert!(Field::from_str("user.nickname").is_err());

        assert_eq!(Field::iter().count(), 17);
        assert!(Field::iter().all(|f| f
            .to_string()
            .starts_with(&format!("{}.", f.group()))));
        assert_eq!(Field::PlaceOfIssue.group(), Group::Document);
    }

    #[test]
    fn gets_and_sets_every_field() {
        let mut input = Input::default();
        for field in Field::iter() {
            assert_eq!(input.get(field), "");
            input.set(field, field.to_string());
        }
        for field in Field::iter() {
            assert_eq!(input.get(field), field.to_string());
        }
    }

    #[test]
    fn normalizes_catalog_references_to_integers() {
        let registration = valid_input().normalize().unwrap();

        assert_eq!(registration.contact_info.country_id, country::Id::from(3));
        assert_eq!(
            registration.document.type_id,
            document_type::Id::from(1),
        );
        assert_eq!(
            registration.user.password.expose_secret().as_str(),
            "Secret123",
        );
        assert_eq!(registration.document.date_of_issue.to_iso(), "2015-06-01");
    }

    #[test]
    fn refuses_to_normalize_invalid_input() {
        let mut input = valid_input();
        input.set(Field::ConfirmPassword, "Secret124");
        assert_eq!(input.normalize().unwrap_err().0, Field::ConfirmPassword);

        let mut input = valid_input();
        input.set(Field::CountryId, "0");
        assert_eq!(input.normalize().unwrap_err().0, Field::CountryId);

        let mut input = valid_input();
        input.set(Field::Address, "Calle 10");
        assert_eq!(input.normalize().unwrap_err().0, Field::Address);
    }

    #[test]
    fn deserializes_nested_camel_case_input() {
        let input: Input = serde_json::from_value(serde_json::json!({
            "user": {"username": "alice", "confirmPassword": "x"},
            "contactInfo": {"countryId": "3"},
            "document": {"dateOfIssue": "2020-01-01"},
        }))
        .unwrap();

        assert_eq!(input.get(Field::Username), "alice");
        assert_eq!(input.get(Field::ConfirmPassword), "x");
        assert_eq!(input.get(Field::CountryId), "3");
        assert_eq!(input.get(Field::DateOfIssue), "2020-01-01");
        assert_eq!(input.get(Field::City), "");
    }
}
