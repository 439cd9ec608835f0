//! Wire representations of the registry's GraphQL schema.

use secrecy::ExposeSecret as _;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::domain::{
    catalog::{Country, DocumentType},
    registration::{self, Registration},
    user::{self, document, ContactInfo, Document, User},
};

/// Integer the registry may report either as a number or as a numeric
/// string.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum LenientInt {
    Int(i64),
    Text(String),
}

impl LenientInt {
    /// Converts this [`LenientInt`] into an [`i64`], if possible.
    fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Deserializes an `i32` reported either as a number or as a numeric string.
fn int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<i32>,
{
    let raw = LenientInt::deserialize(deserializer)?;
    raw.to_i64()
        .and_then(|i| i32::try_from(i).ok())
        .map(T::from)
        .ok_or_else(|| de::Error::custom(format!("invalid ID: {raw:?}")))
}

/// Deserializes an optional `i32`, treating unrecognizable values as absent.
fn opt_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i32>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|v| LenientInt::deserialize(v).ok())
        .and_then(|i| i.to_i64())
        .and_then(|i| i32::try_from(i).ok())
        .map(T::from))
}

/// Deserializes an optional text the registry may also report as a number.
fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) | None => None,
    })
}

/// [`Country`] as reported by the `countries` query.
#[derive(Debug, Deserialize)]
pub(super) struct CountryDto {
    #[serde(deserialize_with = "int")]
    id: i32,
    #[serde(rename = "CountryCode", default, deserialize_with = "opt_text")]
    code: Option<String>,
    #[serde(rename = "CountryName", default, deserialize_with = "opt_text")]
    name: Option<String>,
}

impl From<CountryDto> for Country {
    fn from(dto: CountryDto) -> Self {
        Self {
            id: dto.id.into(),
            code: dto.code.unwrap_or_default(),
            name: dto.name.unwrap_or_default(),
        }
    }
}

/// [`DocumentType`] as reported by the `typeDocuments` query.
#[derive(Debug, Deserialize)]
pub(super) struct DocumentTypeDto {
    #[serde(deserialize_with = "int")]
    id: i32,
    #[serde(
        rename = "NameTypeDocument",
        default,
        deserialize_with = "opt_text"
    )]
    name: Option<String>,
}

impl From<DocumentTypeDto> for DocumentType {
    fn from(dto: DocumentTypeDto) -> Self {
        Self {
            id: dto.id.into(),
            name: dto.name.unwrap_or_default(),
        }
    }
}

/// [`User`] as reported by the `users` and `user` queries.
#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    #[serde(deserialize_with = "int")]
    id: user::Id,
    #[serde(default, deserialize_with = "opt_text")]
    username: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    email: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "opt_text")]
    given_name: Option<String>,
    #[serde(rename = "LastName", default, deserialize_with = "opt_text")]
    family_name: Option<String>,
    #[serde(rename = "emailVerified", default)]
    email_verified: Option<bool>,
    #[serde(rename = "TimeCreate", default)]
    created_at: Option<Value>,
    #[serde(rename = "contactInfo", default)]
    contact_info: Option<ContactInfoDto>,
    #[serde(default)]
    documents: Option<Vec<DocumentDto>>,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        #[expect(unsafe_code, reason = "bypass")]
        let (username, email) = unsafe {
            (
                user::Username::new_unchecked(
                    dto.username.unwrap_or_default(),
                ),
                user::Email::new_unchecked(dto.email.unwrap_or_default()),
            )
        };
        Self {
            id: dto.id,
            username,
            email,
            given_name: dto.given_name,
            family_name: dto.family_name,
            email_verified: dto.email_verified.unwrap_or_default(),
            created_at: dto.created_at.as_ref().and_then(creation_datetime),
            contact_info: dto.contact_info.map(Into::into),
            documents: dto
                .documents
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Parses a [`user::CreationDateTime`] reported either as an RFC 3339
/// string or as epoch milliseconds (possibly as a numeric string).
fn creation_datetime(raw: &Value) -> Option<user::CreationDateTime> {
    match raw {
        Value::Number(n) => {
            user::CreationDateTime::from_unix_timestamp_millis(n.as_i64()?)
        }
        Value::String(s) => {
            user::CreationDateTime::from_rfc3339(s).ok().or_else(|| {
                user::CreationDateTime::from_unix_timestamp_millis(
                    s.trim().parse().ok()?,
                )
            })
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            None
        }
    }
}

/// [`ContactInfo`] as reported by the `users` and `user` queries.
#[derive(Debug, Deserialize)]
pub(super) struct ContactInfoDto {
    #[serde(rename = "CellPhone", default, deserialize_with = "opt_text")]
    cell_phone: Option<String>,
    #[serde(rename = "Phone", default, deserialize_with = "opt_text")]
    phone: Option<String>,
    #[serde(rename = "Address", default, deserialize_with = "opt_text")]
    address: Option<String>,
    #[serde(rename = "City", default, deserialize_with = "opt_text")]
    city: Option<String>,
    #[serde(default)]
    country: Option<CountryRefDto>,
    #[serde(rename = "EmergencyName", default, deserialize_with = "opt_text")]
    emergency_name: Option<String>,
    #[serde(
        rename = "EmergencyPhone",
        default,
        deserialize_with = "opt_text"
    )]
    emergency_phone: Option<String>,
}

/// Country resolved inside a [`ContactInfoDto`].
#[derive(Debug, Deserialize)]
pub(super) struct CountryRefDto {
    #[serde(rename = "CountryCode", default, deserialize_with = "opt_text")]
    code: Option<String>,
    #[serde(rename = "CountryName", default, deserialize_with = "opt_text")]
    name: Option<String>,
}

impl From<ContactInfoDto> for ContactInfo {
    fn from(dto: ContactInfoDto) -> Self {
        let (country_code, country_name) =
            dto.country.map_or((None, None), |c| (c.code, c.name));
        Self {
            cell_phone: dto.cell_phone,
            phone: dto.phone,
            address: dto.address,
            city: dto.city,
            country_code,
            country_name,
            emergency_name: dto.emergency_name,
            emergency_phone: dto.emergency_phone,
        }
    }
}

/// [`Document`] as reported by the `users` and `user` queries.
#[derive(Debug, Deserialize)]
pub(super) struct DocumentDto {
    #[serde(rename = "TypeDocumentId", default, deserialize_with = "opt_int")]
    type_id: Option<i32>,
    #[serde(rename = "typeDocument", default)]
    type_ref: Option<DocumentTypeRefDto>,
    #[serde(rename = "Document", default, deserialize_with = "opt_text")]
    number: Option<String>,
    #[serde(rename = "DateExpedition", default, deserialize_with = "opt_text")]
    date_of_issue: Option<String>,
    #[serde(
        rename = "PlaceExpedition",
        default,
        deserialize_with = "opt_text"
    )]
    place_of_issue: Option<String>,
}

/// Document type resolved inside a [`DocumentDto`].
#[derive(Debug, Deserialize)]
pub(super) struct DocumentTypeRefDto {
    #[serde(
        rename = "NameTypeDocument",
        default,
        deserialize_with = "opt_text"
    )]
    name: Option<String>,
}

impl From<DocumentDto> for Document {
    fn from(dto: DocumentDto) -> Self {
        Self {
            type_id: dto.type_id.map(Into::into),
            type_name: dto.type_ref.and_then(|t| t.name),
            number: dto.number,
            date_of_issue: dto
                .date_of_issue
                .as_deref()
                .and_then(document::IssueDate::parse_lenient),
            place_of_issue: dto.place_of_issue,
        }
    }
}

/// Result of the `registerUser` mutation.
#[derive(Debug, Deserialize)]
pub(super) struct RegisteredDto {
    #[serde(deserialize_with = "int")]
    id: user::Id,
    #[serde(default, deserialize_with = "opt_text")]
    username: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    email: Option<String>,
}

impl RegisteredDto {
    /// Converts this [`RegisteredDto`] into a [`registration::Registered`],
    /// falling back to the submitted values for anything not echoed back.
    pub(super) fn into_registered(
        self,
        submitted: &Registration,
    ) -> registration::Registered {
        #[expect(unsafe_code, reason = "bypass")]
        let username = self.username.map_or_else(
            || submitted.user.username.clone(),
            |u| unsafe { user::Username::new_unchecked(u) },
        );
        #[expect(unsafe_code, reason = "bypass")]
        let email = self.email.map_or_else(
            || submitted.user.email.clone(),
            |e| unsafe { user::Email::new_unchecked(e) },
        );
        registration::Registered {
            id: self.id,
            username,
            email,
        }
    }
}

/// `RegisterUserInput` of the `registerUser` mutation.
///
/// Contains no password confirmation, and carries catalog references as
/// integers.
#[derive(Debug, Serialize)]
pub(super) struct RegisterUserInput<'a> {
    user: NewUserDto<'a>,
    #[serde(rename = "contactInfo")]
    contact_info: NewContactInfoDto<'a>,
    document: NewDocumentDto<'a>,
}

#[derive(Debug, Serialize)]
struct NewUserDto<'a> {
    username: &'a str,
    email: &'a str,
    #[serde(rename = "Name")]
    given_name: &'a str,
    #[serde(rename = "LastName")]
    family_name: &'a str,
    #[serde(serialize_with = "expose_password")]
    password: &'a secrecy::SecretBox<user::Password>,
}

/// Serializes the plain text of a secret [`user::Password`].
fn expose_password<S: Serializer>(
    password: &&secrecy::SecretBox<user::Password>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(password.expose_secret().as_str())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct NewContactInfoDto<'a> {
    cell_phone: &'a str,
    phone: &'a str,
    address: &'a str,
    city: &'a str,
    #[serde(rename = "CountryID")]
    country_id: i32,
    emergency_name: &'a str,
    emergency_phone: &'a str,
}

#[derive(Debug, Serialize)]
struct NewDocumentDto<'a> {
    #[serde(rename = "TypeDocumentId")]
    type_id: i32,
    #[serde(rename = "Document")]
    number: &'a str,
    #[serde(rename = "DateExpedition")]
    date_of_issue: document::IssueDate,
    #[serde(rename = "PlaceExpedition")]
    place_of_issue: &'a str,
}

impl<'a> From<&'a Registration> for RegisterUserInput<'a> {
    fn from(r: &'a Registration) -> Self {
        let Registration {
            user: account,
            contact_info: contact,
            document: doc,
        } = r;
        Self {
            user: NewUserDto {
                username: account.username.as_ref(),
                email: account.email.as_ref(),
                given_name: account.given_name.as_ref(),
                family_name: account.family_name.as_ref(),
                password: &account.password,
            },
            contact_info: NewContactInfoDto {
                cell_phone: contact.cell_phone.as_ref(),
                phone: contact.phone.as_ref(),
                address: &contact.address,
                city: &contact.city,
                country_id: contact.country_id.into(),
                emergency_name: &contact.emergency_name,
                emergency_phone: contact.emergency_phone.as_ref(),
            },
            document: NewDocumentDto {
                type_id: doc.type_id.into(),
                number: doc.number.as_ref(),
                date_of_issue: doc.date_of_issue,
                place_of_issue: &doc.place_of_issue,
            },
        }
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use super::{
        CountryDto, DocumentTypeDto, RegisterUserInput, RegisteredDto,
        UserDto,
    };
    use crate::domain::{
        catalog::{Country, DocumentType},
        registration::spec::valid_input,
        User,
    };

    #[test]
    fn serializes_registration_with_integer_references() {
        let registration = valid_input().normalize().unwrap();
        let payload =
            serde_json::to_value(RegisterUserInput::from(&registration))
                .unwrap();

        assert_eq!(payload["contactInfo"]["CountryID"], json!(3));
        assert_eq!(payload["document"]["TypeDocumentId"], json!(1));
        assert_eq!(payload["document"]["DateExpedition"], json!("2015-06-01"));
        assert_eq!(payload["user"]["password"], json!("Secret123"));
        assert_eq!(payload["user"]["Name"], json!("Alice"));
        assert_eq!(payload["contactInfo"]["CellPhone"], json!("3001234567"));
        assert_eq!(payload["contactInfo"]["Address"], json!("Calle 10 # 20"));

        let text = payload.to_string();
        assert!(!text.contains("confirmPassword"));
        assert!(!text.contains("confirm_password"));
        assert_eq!(
            payload["user"].as_object().unwrap().len(),
            5,
            "unexpected user fields: {}",
            payload["user"],
        );
    }

    #[test]
    fn decodes_catalogs() {
        let country: Country = serde_json::from_value::<CountryDto>(json!({
            "id": "3",
            "CountryCode": "CO",
            "CountryName": "Colombia",
        }))
        .unwrap()
        .into();
        assert_eq!(i32::from(country.id), 3);
        assert_eq!(country.name, "Colombia");

        let kind: DocumentType = serde_json::from_value::<DocumentTypeDto>(
            json!({"id": 1, "NameTypeDocument": "PASSPORT"}),
        )
        .unwrap()
        .into();
        assert_eq!(i32::from(kind.id), 1);
        assert_eq!(kind.name, "PASSPORT");
    }

    #[test]
    fn decodes_users_leniently() {
        let user: User = serde_json::from_value::<UserDto>(json!({
            "id": "7",
            "username": "alice",
            "email": "alice@example.com",
            "Name": "Alice",
            "LastName": "Smith",
            "emailVerified": true,
            "TimeCreate": "1700000000000",
            "contactInfo": {
                "CellPhone": 3001234567_u64,
                "country": {"CountryCode": "CO", "CountryName": "Colombia"},
            },
            "documents": [{
                "TypeDocumentId": "1",
                "Document": "1020304050",
                "DateExpedition": "2015-06-01T00:00:00.000Z",
                "typeDocument": {"NameTypeDocument": "PASSPORT"},
            }, {
                "DateExpedition": "yesterday",
            }],
        }))
        .unwrap()
        .into();

        assert_eq!(i32::from(user.id), 7);
        assert!(user.email_verified);
        assert_eq!(
            user.created_at.map(|d| d.unix_timestamp()),
            Some(1_700_000_000),
        );
        let contact = user.contact_info.unwrap();
        assert_eq!(contact.cell_phone.as_deref(), Some("3001234567"));
        assert_eq!(contact.country_name.as_deref(), Some("Colombia"));
        assert_eq!(contact.city, None);

        assert_eq!(user.documents.len(), 2);
        let doc = &user.documents[0];
        assert_eq!(doc.type_id.map(i32::from), Some(1));
        assert_eq!(doc.type_name.as_deref(), Some("PASSPORT"));
        assert_eq!(
            doc.date_of_issue.map(|d| d.to_iso()).as_deref(),
            Some("2015-06-01"),
        );
        assert!(user.documents[1].date_of_issue.is_none());
    }

    #[test]
    fn decodes_minimal_users() {
        let user: User = serde_json::from_value::<UserDto>(json!({
            "id": 1,
            "username": "bob",
            "email": "bob@example.com",
            "TimeCreate": "2024-01-02T03:04:05Z",
        }))
        .unwrap()
        .into();

        assert!(!user.email_verified);
        assert!(user.contact_info.is_none());
        assert!(user.documents.is_empty());
        assert!(user.created_at.is_some());

        assert!(serde_json::from_value::<UserDto>(json!({"id": "x"})).is_err());
    }

    #[test]
    fn falls_back_to_submitted_values() {
        let registration = valid_input().normalize().unwrap();
        let registered =
            serde_json::from_value::<RegisteredDto>(json!({"id": 12}))
                .unwrap()
                .into_registered(&registration);

        assert_eq!(i32::from(registered.id), 12);
        assert_eq!(registered.username.to_string(), "alice_01");
        assert_eq!(registered.email.to_string(), "alice@example.com");
    }
}
