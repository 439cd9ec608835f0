//! [`User`]-related [`Gateway`] implementations.

use common::operations::{By, Insert, Select};
use serde_json::json;
use tracerr::Traced;

use crate::{
    domain::{
        registration::Registered,
        user::{self, Email, Username},
        Registration, User,
    },
    infra::{
        gateway::{
            self,
            graphql::{
                dto::{RegisterUserInput, RegisteredDto, UserDto},
                Operation,
            },
        },
        Gateway, GraphQl,
    },
};

impl Gateway<Select<By<bool, Username>>> for GraphQl {
    type Ok = bool;
    type Err = Traced<gateway::Error>;

    #[tracing::instrument(skip_all, fields(gql.name = "checkUsernameExists"))]
    async fn execute(
        &self,
        Select(by): Select<By<bool, Username>>,
    ) -> Result<Self::Ok, Self::Err> {
        const OP: Operation = Operation {
            name: "CheckUsernameExists",
            field: "checkUsernameExists",
            document: "\
                query CheckUsernameExists($username: String!) { \
                    checkUsernameExists(username: $username) \
                }",
        };
        let username = by.into_inner();
        self.request(&OP, json!({ "username": username.to_string() }))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Gateway<Select<By<bool, Email>>> for GraphQl {
    type Ok = bool;
    type Err = Traced<gateway::Error>;

    #[tracing::instrument(skip_all, fields(gql.name = "checkEmailExists"))]
    async fn execute(
        &self,
        Select(by): Select<By<bool, Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        const OP: Operation = Operation {
            name: "CheckEmailExists",
            field: "checkEmailExists",
            document: "\
                query CheckEmailExists($email: String!) { \
                    checkEmailExists(email: $email) \
                }",
        };
        let email = by.into_inner();
        self.request(&OP, json!({ "email": email.to_string() }))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Gateway<Select<By<Vec<User>, ()>>> for GraphQl {
    type Ok = Vec<User>;
    type Err = Traced<gateway::Error>;

    #[tracing::instrument(skip_all, fields(gql.name = "users"))]
    async fn execute(
        &self,
        _: Select<By<Vec<User>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const OP: Operation = Operation {
            name: "Users",
            field: "users",
            document: "\
                query Users { \
                    users { \
                        id Name LastName TimeCreate \
                        username email emailVerified \
                        documents { \
                            DateExpedition Document PlaceExpedition \
                            TypeDocumentId \
                        } \
                        contactInfo { \
                            Address CellPhone City Phone \
                            EmergencyName EmergencyPhone \
                            country { CountryCode CountryName } \
                        } \
                    } \
                }",
        };
        Ok(self
            .request::<Vec<UserDto>, _>(&OP, json!({}))
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl Gateway<Select<By<Option<User>, user::Id>>> for GraphQl {
    type Ok = Option<User>;
    type Err = Traced<gateway::Error>;

    #[tracing::instrument(
        skip_all,
        fields(gql.name = "user", user.id = %by.by()),
    )]
    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        const OP: Operation = Operation {
            name: "User",
            field: "user",
            document: "\
                query User($userId: Int!) { \
                    user(id: $userId) { \
                        id Name LastName TimeCreate \
                        username email emailVerified \
                        documents { \
                            DateExpedition Document PlaceExpedition \
                            TypeDocumentId \
                            typeDocument { NameTypeDocument } \
                        } \
                        contactInfo { \
                            Address CellPhone City Phone \
                            EmergencyName EmergencyPhone \
                            country { CountryCode CountryName } \
                        } \
                    } \
                }",
        };
        let id = by.into_inner();
        Ok(self
            .request::<Option<UserDto>, _>(&OP, json!({ "userId": id }))
            .await
            .map_err(tracerr::wrap!())?
            .map(Into::into))
    }
}

impl Gateway<Insert<Registration>> for GraphQl {
    type Ok = Registered;
    type Err = Traced<gateway::Error>;

    #[tracing::instrument(skip_all, fields(gql.name = "registerUser"))]
    async fn execute(
        &self,
        Insert(registration): Insert<Registration>,
    ) -> Result<Self::Ok, Self::Err> {
        const OP: Operation = Operation {
            name: "RegisterUser",
            field: "registerUser",
            document: "\
                mutation RegisterUser($registerUserInput: RegisterUserInput!) { \
                    registerUser(registerUserInput: $registerUserInput) { \
                        id username email \
                    } \
                }",
        };
        let input = RegisterUserInput::from(&registration);
        Ok(self
            .request::<RegisteredDto, _>(
                &OP,
                json!({ "registerUserInput": input }),
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_registered(&registration))
    }
}

#[cfg(test)]
mod spec {
    use std::{
        io,
        sync::{Arc, Mutex},
        time::Duration,
    };

    use common::operations::{By, Select};

    use crate::{
        domain::user::{Email, Username},
        infra::{
            graphql::{self, Url},
            Gateway as _, GraphQl,
        },
    };

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn unreachable_gateway() -> GraphQl {
        GraphQl::new(&graphql::Config {
            endpoint: Url::parse("http://127.0.0.1:9/graphql").unwrap(),
            timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn keeps_checked_values_out_of_logs() {
        let captured = Captured::default();
        let writer = captured.clone();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_ansi(false)
                .with_writer(move || writer.clone())
                .finish(),
        );
        let gateway = unreachable_gateway();

        let username = Username::new("secret_alice").unwrap();
        let email = Email::new("secret.alice@example.com").unwrap();
        _ = gateway.execute(Select(By::<bool, _>::new(username))).await;
        _ = gateway.execute(Select(By::<bool, _>::new(email))).await;

        let logs = captured.contents();
        assert!(logs.contains("checkUsernameExists"), "{logs}");
        assert!(logs.contains("checkEmailExists"), "{logs}");
        assert!(!logs.contains("secret"), "{logs}");
    }
}
