//! GraphQL-over-HTTP [`Gateway`] implementation.

mod dto;
mod impls;
pub mod response;

use std::time::Duration;

use derive_more::{Display, Error as StdError, From};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::infra::gateway;
#[cfg(doc)]
use crate::infra::Gateway;

pub use reqwest::Url;

pub use self::response::ResponseError;

/// [`GraphQl`] client configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// URL of the GraphQL endpoint.
    #[default(Url::parse("http://localhost:3000/graphql").expect("valid URL"))]
    pub endpoint: Url,

    /// Timeout of a single HTTP request.
    #[default(Duration::from_secs(30))]
    pub timeout: Duration,
}

/// GraphQL [`Gateway`] client talking to a single endpoint.
#[derive(Clone, Debug)]
pub struct GraphQl {
    /// Underlying HTTP client.
    client: Client,

    /// URL of the GraphQL endpoint.
    endpoint: Url,
}

impl GraphQl {
    /// Creates a new [`GraphQl`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to initialize the underlying HTTP client.
    pub fn new(conf: &Config) -> Result<Self, Traced<gateway::Error>> {
        let client = Client::builder()
            .timeout(conf.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            client,
            endpoint: conf.endpoint.clone(),
        })
    }

    /// Executes the provided [`Operation`] with the provided `variables`,
    /// returning the decoded value of its root field.
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the HTTP request fails;
    /// - the registry reports any GraphQL error;
    /// - the response doesn't match the expected shape.
    async fn request<T, V>(
        &self,
        op: &Operation,
        variables: V,
    ) -> Result<T, Traced<gateway::Error>>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        log::debug!("executing `{}` GraphQL operation", op.name);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&Request {
                operation_name: op.name,
                query: op.document,
                variables,
            })
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        decode(op, status, &body).map_err(tracerr::map_from)
    }
}

/// Decodes the root field of the provided [`Operation`] out of a raw HTTP
/// response `body`.
fn decode<T: DeserializeOwned>(
    op: &Operation,
    status: StatusCode,
    body: &[u8],
) -> Result<T, Traced<Error>> {
    let response = match serde_json::from_slice::<response::Response>(body) {
        Ok(r) => r,
        Err(e) if status.is_success() => {
            return Err(tracerr::new!(Error::Decode(e)));
        }
        Err(_) => return Err(tracerr::new!(Error::Status(status))),
    };

    let mut data = response.into_result().map_err(|errors| {
        log::debug!(
            "`{}` GraphQL operation rejected: {errors:?}",
            op.name,
        );
        tracerr::new!(Error::Rejected(errors))
    })?;
    if !status.is_success() {
        return Err(tracerr::new!(Error::Status(status)));
    }

    let field = data
        .remove(op.field)
        .ok_or_else(|| tracerr::new!(Error::MissingData(op.field)))?;
    serde_json::from_value(field).map_err(tracerr::from_and_wrap!(=> Error))
}

/// GraphQL operation executable by a [`GraphQl`] client.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Operation {
    /// Name of this [`Operation`].
    pub(crate) name: &'static str,

    /// Root field this [`Operation`] selects.
    pub(crate) field: &'static str,

    /// GraphQL document of this [`Operation`].
    pub(crate) document: &'static str,
}

/// GraphQL HTTP request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Request<V> {
    /// Name of the operation to execute.
    operation_name: &'static str,

    /// GraphQL document.
    query: &'static str,

    /// Variables of the operation.
    variables: V,
}

/// [`GraphQl`] client error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP transport failed.
    #[display("HTTP transport failed: {_0}")]
    Transport(reqwest::Error),

    /// Response has a non-success HTTP status and no GraphQL payload.
    #[display("Unexpected HTTP status `{_0}`")]
    #[from(ignore)]
    Status(#[error(not(source))] StatusCode),

    /// Response body is not a valid GraphQL response.
    #[display("Malformed GraphQL response: {_0}")]
    Decode(serde_json::Error),

    /// Response doesn't contain the requested root field.
    #[display("`{_0}` is missing in GraphQL response data")]
    #[from(ignore)]
    MissingData(#[error(not(source))] &'static str),

    /// Registry rejected the operation with GraphQL errors.
    #[display(
        "GraphQL operation rejected: {}",
        response::reason(_0).unwrap_or_default(),
    )]
    Rejected(#[error(not(source))] Vec<ResponseError>),
}

impl Error {
    /// Returns the human-readable reason reported by the registry, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Rejected(errors) => response::reason(errors),
            Self::Transport(_)
            | Self::Status(_)
            | Self::Decode(_)
            | Self::MissingData(_) => None,
        }
    }
}

#[cfg(test)]
mod spec {
    use reqwest::StatusCode;
    use serde::Deserialize;

    use super::{decode, Error, Operation};

    const OP: Operation = Operation {
        name: "CheckUsernameExists",
        field: "checkUsernameExists",
        document: "query CheckUsernameExists { checkUsernameExists }",
    };

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i32,
    }

    #[test]
    fn decodes_root_field() {
        let body = br#"{"data": {"checkUsernameExists": true}}"#;
        let exists: bool = decode(&OP, StatusCode::OK, body).unwrap();
        assert!(exists);

        let body = br#"{"data": {"checkUsernameExists": [{"id": 1}]}}"#;
        let items: Vec<Item> = decode(&OP, StatusCode::OK, body).unwrap();
        assert_eq!(items, vec![Item { id: 1 }]);
    }

    #[test]
    fn decodes_null_root_field_as_none() {
        let body = br#"{"data": {"checkUsernameExists": null}}"#;
        let item: Option<Item> = decode(&OP, StatusCode::OK, body).unwrap();
        assert_eq!(item, None);
    }

    #[test]
    fn reports_graphql_errors_regardless_of_status() {
        let body = br#"{
            "errors": [{"message": "Bad Request Exception"}],
            "data": null
        }"#;
        for status in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let err = decode::<bool>(&OP, status, body).unwrap_err();
            assert!(
                matches!(err.as_ref(), Error::Rejected(_)),
                "unexpected error: {err}",
            );
            assert_eq!(
                err.as_ref().reason().as_deref(),
                Some("Bad Request Exception"),
            );
        }
    }

    #[test]
    fn reports_malformed_responses() {
        let err = decode::<bool>(&OP, StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err.as_ref(), Error::Decode(_)));
        assert_eq!(err.as_ref().reason(), None);

        let err = decode::<bool>(&OP, StatusCode::BAD_GATEWAY, b"<html>")
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            Error::Status(StatusCode::BAD_GATEWAY),
        ));

        let err = decode::<bool>(&OP, StatusCode::OK, br#"{"data": {}}"#)
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            Error::MissingData("checkUsernameExists"),
        ));
    }
}
