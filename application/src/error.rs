//! [`Error`]-related definitions.

use std::fmt;

use config::ConfigError;
use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{command::register_user, infra::gateway};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// User-facing [`Error`] of a command.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an unexpected failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Create a new [`Error`] representing a registry failure with the
    /// provided human-readable `msg`.
    #[must_use]
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self {
            code: "GATEWAY_ERROR",
            message: msg.into(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for gateway::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::gateway(self.message()))
    }
}

impl AsError for register_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Gateway(e) => e.try_as_error(),
            Self::InvalidInput(e) => Some(Error {
                code: "INVALID_REGISTRATION",
                message: e.to_string(),
                backtrace: None,
            }),
        }
    }
}

impl AsError for ConfigError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "INVALID_CONFIG",
            message: self.to_string(),
            backtrace: None,
        })
    }
}
