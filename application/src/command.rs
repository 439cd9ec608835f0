//! Execution of the administration [`Command`]s.

use std::{fs, io, path::Path};

use derive_more::{Display, Error as StdError, From};
use futures::future;
use service::{
    controller::{
        listing::{self, Detail},
        Form, Listing,
    },
    domain::{registration, user, Catalogs},
    query, Query as _,
};
use strum::IntoEnumIterator as _;
use tracing as log;

use crate::{define_error, view, AsError, Command, Error, Service};

define_error! {
    enum UserError {
        #[code = "USER_NOT_FOUND"]
        #[message = "User not found"]
        NotFound,
    }
}

define_error! {
    enum RegistrationError {
        #[code = "INVALID_REGISTRATION"]
        #[message = "Registration form has invalid fields"]
        Invalid,

        #[code = "REGISTRATION_FAILED"]
        #[message = "Registry refused to register the user"]
        Refused,
    }
}

/// Executes the provided [`Command`] against the provided [`Service`],
/// printing its outcome.
///
/// # Errors
///
/// If the [`Command`] cannot be completed.
pub async fn execute(service: Service, command: Command) -> Result<(), Error> {
    match command {
        Command::Users { page } => users(service, page).await,
        Command::User { id } => user(service, id).await,
        Command::Register { file } => register(service, &file).await,
        Command::Catalogs => catalogs(&service).await,
    }
}

/// Prints the requested page of the registered users.
#[tracing::instrument(skip(service), fields(cli.command = "users"))]
async fn users(service: Service, page: usize) -> Result<(), Error> {
    let mut listing = Listing::new(service, view::Console);
    listing.load_all().await;

    if let listing::State::Failed(message) = listing.state() {
        return Err(Error::gateway(message.clone()));
    }
    println!("{}", view::page(listing.page(page)));
    Ok(())
}

/// Prints the details of the registered user with the provided ID.
#[tracing::instrument(skip(service), fields(cli.command = "user"))]
async fn user(service: Service, id: user::Id) -> Result<(), Error> {
    let mut listing = Listing::new(service, view::Console);
    listing.select_user(id).await;

    match listing.detail() {
        Detail::Loaded(user) => {
            println!("{}", view::detail(user));
            Ok(())
        }
        Detail::Failed { message, .. } => {
            Err(if message == listing::NOT_FOUND_MESSAGE {
                UserError::NotFound.into()
            } else {
                Error::gateway(message.clone())
            })
        }
        Detail::Closed | Detail::Loading(_) => {
            Err(Error::internal(&"user detail was not resolved"))
        }
    }
}

/// Registers a new user out of the registration form values stored in the
/// provided `file`.
///
/// Every value is entered into the [`Form`] as a user would do it: typed in
/// and left, so each one is validated on its own before the submission.
#[tracing::instrument(skip(service), fields(cli.command = "register"))]
async fn register(service: Service, file: &str) -> Result<(), Error> {
    let input = read_registration(file).map_err(AsError::into_error)?;

    let mut form = Form::new(service, view::Console);
    form.initialize().await;
    for field in registration::Field::iter() {
        form.update_field(field, input.get(field));
        form.validate_field(field).await;
    }

    if let Some(registered) = form.submit().await {
        println!("{}", view::registered(&registered));
        return Ok(());
    }
    if form.errors().is_empty() {
        return Err(RegistrationError::Refused.into());
    }
    log::debug!("registration form has {} invalid fields", form.errors().len());
    eprintln!("{}", view::errors(form.errors()));
    Err(RegistrationError::Invalid.into())
}

/// Prints the available countries and document types.
#[tracing::instrument(skip_all, fields(cli.command = "catalogs"))]
async fn catalogs(service: &Service) -> Result<(), Error> {
    let (countries, document_types) = future::try_join(
        service.execute(query::catalog::Countries::all()),
        service.execute(query::catalog::DocumentTypes::all()),
    )
    .await
    .map_err(AsError::into_error)?;

    println!(
        "{}",
        view::catalogs(&Catalogs {
            countries,
            document_types,
        }),
    );
    Ok(())
}

/// Reads a [`registration::Input`] from the provided JSON or TOML file,
/// picking the format by the file extension.
///
/// # Errors
///
/// If the file cannot be read, its extension is not supported, or its
/// contents are malformed.
fn read_registration(
    path: impl AsRef<Path>,
) -> Result<registration::Input, RegistrationFileError> {
    use RegistrationFileError as E;

    let path = path.as_ref();
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match format.as_deref() {
        Some("json") => Ok(serde_json::from_slice(&fs::read(path)?)?),
        Some("toml") => Ok(toml::from_str(&fs::read_to_string(path)?)?),
        Some(_) | None => Err(E::UnsupportedFormat),
    }
}

/// Error of reading a registration file.
#[derive(Debug, Display, From, StdError)]
pub enum RegistrationFileError {
    /// File cannot be read.
    #[display("Failed to read the registration file: {_0}")]
    Io(io::Error),

    /// JSON contents are malformed.
    #[display("Malformed JSON registration file: {_0}")]
    Json(serde_json::Error),

    /// TOML contents are malformed.
    #[display("Malformed TOML registration file: {_0}")]
    Toml(toml::de::Error),

    /// Extension of the file is neither `.json` nor `.toml`.
    #[from(ignore)]
    #[display("Registration file must have a `.json` or `.toml` extension")]
    UnsupportedFormat,
}

impl AsError for RegistrationFileError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "INVALID_REGISTRATION_FILE",
            message: self.to_string(),
            backtrace: None,
        })
    }
}
