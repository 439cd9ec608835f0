//! [`Gateway`]-related implementations.

#[cfg(feature = "graphql")]
pub mod graphql;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "graphql")]
pub use self::graphql::GraphQl;

/// Remote registry operation.
pub use common::Handler as Gateway;

/// [`Gateway`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "graphql")]
    /// [`GraphQl`] error.
    GraphQl(graphql::Error),
}

impl Error {
    /// Message shown to a user when no readable reason can be extracted from
    /// an [`Error`].
    pub const FALLBACK_MESSAGE: &'static str =
        "The registry could not process the request, please try again";

    /// Returns the human-readable reason reported by the registry, if the
    /// registry reported any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match *self {
            #[cfg(feature = "graphql")]
            Self::GraphQl(ref e) => e.reason(),
        }
    }

    /// Returns a human-readable message describing this [`Error`].
    ///
    /// Never fails: falls back to the [`FALLBACK_MESSAGE`] whenever the
    /// registry response doesn't carry a recognizable reason.
    ///
    /// [`FALLBACK_MESSAGE`]: Self::FALLBACK_MESSAGE
    #[must_use]
    pub fn message(&self) -> String {
        self.reason()
            .unwrap_or_else(|| Self::FALLBACK_MESSAGE.to_owned())
    }
}

#[cfg(all(test, feature = "graphql"))]
mod spec {
    use reqwest::StatusCode;

    use super::{graphql, Error};

    #[test]
    fn falls_back_to_generic_message() {
        let err = Error::from(graphql::Error::Status(StatusCode::BAD_GATEWAY));
        assert_eq!(err.reason(), None);
        assert_eq!(err.message(), Error::FALLBACK_MESSAGE);

        let err = Error::from(graphql::Error::Rejected(vec![
            graphql::ResponseError {
                message: Some("document.Document must be unique".into()),
                extensions: None,
            },
        ]));
        assert_eq!(err.message(), "Document must be unique");
    }
}
