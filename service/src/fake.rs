//! In-memory [`Gateway`] used by tests.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

use common::operations::{By, Insert, Select};
use reqwest::StatusCode;
use tracerr::Traced;

use crate::{
    domain::{
        catalog::{Country, DocumentType},
        registration::Registered,
        user::{self, Email, Username},
        Registration, User,
    },
    infra::{
        gateway::{self, graphql},
        Gateway,
    },
};

/// Name of a [`FakeGateway`] operation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Op {
    Countries,
    DocumentTypes,
    UsernameExists,
    EmailExists,
    Users,
    User,
    Register,
}

/// In-memory [`Gateway`] sharing its state between clones.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeGateway(Rc<RefCell<State>>);

/// State of a [`FakeGateway`].
#[derive(Debug, Default)]
struct State {
    countries: Vec<Country>,
    document_types: Vec<DocumentType>,
    usernames: HashSet<String>,
    emails: HashSet<String>,
    users: Vec<User>,
    details: HashMap<user::Id, User>,
    registrations: Vec<Registration>,
    rejection: Option<String>,
    unavailable: HashSet<Op>,
    calls: HashMap<Op, usize>,
}

impl FakeGateway {
    /// Creates a new [`FakeGateway`] with populated catalogs.
    pub(crate) fn with_catalogs() -> Self {
        let this = Self::default();
        {
            let mut state = this.0.borrow_mut();
            state.countries = vec![
                country(1, "AR", "Argentina"),
                country(2, "BR", "Brazil"),
                country(3, "CO", "Colombia"),
            ];
            state.document_types = vec![
                DocumentType {
                    id: 1.into(),
                    name: "PASSPORT".into(),
                },
                DocumentType {
                    id: 2.into(),
                    name: "ID_CARD".into(),
                },
            ];
        }
        this
    }

    /// Makes the provided [`Op`] fail as if the registry was unreachable.
    pub(crate) fn make_unavailable(&self, op: Op) {
        _ = self.0.borrow_mut().unavailable.insert(op);
    }

    /// Makes the provided [`Op`] succeed again.
    pub(crate) fn make_available(&self, op: Op) {
        _ = self.0.borrow_mut().unavailable.remove(&op);
    }

    /// Marks the provided `username` as taken.
    pub(crate) fn take_username(&self, username: &str) {
        _ = self.0.borrow_mut().usernames.insert(username.to_owned());
    }

    /// Marks the provided `email` as taken.
    pub(crate) fn take_email(&self, email: &str) {
        _ = self.0.borrow_mut().emails.insert(email.to_owned());
    }

    /// Sets the [`User`] summaries reported by the `users` operation.
    pub(crate) fn set_users(&self, users: Vec<User>) {
        self.0.borrow_mut().users = users;
    }

    /// Sets the [`User`] detail reported by the `user` operation.
    pub(crate) fn set_detail(&self, user: User) {
        _ = self.0.borrow_mut().details.insert(user.id, user);
    }

    /// Makes every registration rejected with the provided `reason`.
    pub(crate) fn reject_registrations(&self, reason: &str) {
        self.0.borrow_mut().rejection = Some(reason.to_owned());
    }

    /// Returns all the [`Registration`]s accepted so far.
    pub(crate) fn registrations(&self) -> Vec<Registration> {
        self.0.borrow().registrations.clone()
    }

    /// Returns how many times the provided [`Op`] was executed.
    pub(crate) fn calls(&self, op: Op) -> usize {
        self.0.borrow().calls.get(&op).copied().unwrap_or_default()
    }

    /// Records a call of the provided [`Op`], failing if it's unavailable.
    fn call(&self, op: Op) -> Result<(), Traced<gateway::Error>> {
        let mut state = self.0.borrow_mut();
        *state.calls.entry(op).or_default() += 1;
        if state.unavailable.contains(&op) {
            return Err(tracerr::new!(gateway::Error::from(
                graphql::Error::Status(StatusCode::SERVICE_UNAVAILABLE),
            )));
        }
        Ok(())
    }
}

impl Gateway<Select<By<Vec<Country>, ()>>> for FakeGateway {
    type Ok = Vec<Country>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Country>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call(Op::Countries)?;
        Ok(self.0.borrow().countries.clone())
    }
}

impl Gateway<Select<By<Vec<DocumentType>, ()>>> for FakeGateway {
    type Ok = Vec<DocumentType>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<DocumentType>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call(Op::DocumentTypes)?;
        Ok(self.0.borrow().document_types.clone())
    }
}

impl Gateway<Select<By<bool, Username>>> for FakeGateway {
    type Ok = bool;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<bool, Username>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call(Op::UsernameExists)?;
        Ok(self.0.borrow().usernames.contains(&by.into_inner().to_string()))
    }
}

impl Gateway<Select<By<bool, Email>>> for FakeGateway {
    type Ok = bool;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<bool, Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call(Op::EmailExists)?;
        Ok(self.0.borrow().emails.contains(&by.into_inner().to_string()))
    }
}

impl Gateway<Select<By<Vec<User>, ()>>> for FakeGateway {
    type Ok = Vec<User>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<User>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call(Op::Users)?;
        Ok(self.0.borrow().users.clone())
    }
}

impl Gateway<Select<By<Option<User>, user::Id>>> for FakeGateway {
    type Ok = Option<User>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call(Op::User)?;
        Ok(self.0.borrow().details.get(by.by()).cloned())
    }
}

impl Gateway<Insert<Registration>> for FakeGateway {
    type Ok = Registered;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(registration): Insert<Registration>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call(Op::Register)?;

        let mut state = self.0.borrow_mut();
        if let Some(reason) = state.rejection.clone() {
            return Err(tracerr::new!(gateway::Error::from(
                graphql::Error::Rejected(vec![graphql::ResponseError {
                    message: Some(reason),
                    extensions: None,
                }]),
            )));
        }

        let registered = Registered {
            id: i32::try_from(state.registrations.len() + 1)
                .unwrap_or(i32::MAX)
                .into(),
            username: registration.user.username.clone(),
            email: registration.user.email.clone(),
        };
        state.registrations.push(registration);
        Ok(registered)
    }
}

/// Creates a new [`Country`] with the provided parameters.
fn country(id: i32, code: &str, name: &str) -> Country {
    Country {
        id: id.into(),
        code: code.into(),
        name: name.into(),
    }
}

/// Creates a new [`User`] summary with the provided `id` and `username`.
pub(crate) fn user(id: i32, username: &str) -> User {
    #[expect(unsafe_code, reason = "test fixture")]
    let (username, email) = unsafe {
        (
            Username::new_unchecked(username),
            Email::new_unchecked(format!("{username}@example.com")),
        )
    };
    User {
        id: id.into(),
        username,
        email,
        given_name: Some("Given".into()),
        family_name: Some("Family".into()),
        email_verified: id % 2 == 0,
        created_at: None,
        contact_info: None,
        documents: vec![],
    }
}
