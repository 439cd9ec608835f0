//! Registration [`Form`] controller.

use std::collections::HashMap;

use futures::future;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{register_user, RegisterUser},
    domain::{
        catalog::Catalogs,
        registration::{Field, Input, Registered},
        Country, DocumentType,
    },
    infra::gateway,
    notify::{Notification, Notifier},
    query,
    validation::{self, Constraint, Context, Errors, UniquenessChecker},
    Command, Query,
};

/// Message notified when the [`Catalogs`] cannot be loaded.
pub const CATALOGS_FAILURE_MESSAGE: &str =
    "Failed to load the registration form data";

/// Message notified when a new user is registered.
pub const SUCCESS_MESSAGE: &str = "User registered successfully";

/// Lifecycle state of a [`Form`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// [`Catalogs`] are being loaded.
    Loading,

    /// [`Form`] is editable.
    Ready,

    /// [`Input`] is being submitted.
    Submitting,
}

/// Controller of a registration form.
///
/// Owns the raw [`Input`], the loaded [`Catalogs`] and the per-[`Field`]
/// [`Errors`].
#[derive(Debug)]
pub struct Form<Svc, N> {
    /// Service performing remote operations.
    service: Svc,

    /// [`Notifier`] of user-facing messages.
    notifier: N,

    /// Current [`State`] of this [`Form`].
    state: State,

    /// [`Catalogs`] loaded by [`Form::initialize()`].
    catalogs: Catalogs,

    /// Current [`Input`].
    input: Input,

    /// Current per-[`Field`] [`Errors`].
    errors: Errors,

    /// Latest generation of every [`Field`] remote check.
    generations: HashMap<Field, u64>,

    /// Generations of the remote checks still in flight.
    pending: HashMap<Field, u64>,

    /// Indicator whether the last submission succeeded and nothing was
    /// edited since.
    succeeded: bool,

    /// Message of the last failed submission, until the next edit.
    last_error: Option<String>,
}

impl<Svc, N> Form<Svc, N> {
    /// Creates a new [`Form`] in the [`State::Loading`] state.
    #[must_use]
    pub fn new(service: Svc, notifier: N) -> Self {
        Self {
            service,
            notifier,
            state: State::Loading,
            catalogs: Catalogs::default(),
            input: Input::default(),
            errors: Errors::default(),
            generations: HashMap::new(),
            pending: HashMap::new(),
            succeeded: false,
            last_error: None,
        }
    }

    /// Returns the current [`State`] of this [`Form`].
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Returns the loaded [`Catalogs`].
    #[must_use]
    pub const fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Returns the current [`Input`].
    #[must_use]
    pub const fn input(&self) -> &Input {
        &self.input
    }

    /// Returns the current [`Errors`].
    #[must_use]
    pub const fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Indicates whether the last submission succeeded and the [`Form`]
    /// wasn't edited since.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.succeeded
    }

    /// Returns the message of the last failed submission, if nothing was
    /// edited since.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Indicates whether a remote check of the provided [`Field`] is in
    /// flight.
    #[must_use]
    pub fn is_pending(&self, field: Field) -> bool {
        self.pending.contains_key(&field)
    }

    /// Indicates whether the submit action is enabled.
    ///
    /// It's disabled while loading, while submitting, and while any remote
    /// check is in flight.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state == State::Ready && self.pending.is_empty()
    }

    /// Replaces the value of the provided [`Field`].
    ///
    /// Doesn't validate anything, but invalidates any remote check of the
    /// [`Field`] still in flight, along with a [`Constraint::Unique`]
    /// violation reported for a different value.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if self.input.get(field) != value
            && self.errors.get(field) == Some(Constraint::Unique)
        {
            self.errors.set(field, None);
        }
        self.input.set(field, value);
        self.succeeded = false;
        self.last_error = None;
        if self.pending.remove(&field).is_some() {
            log::debug!("`{field}` changed while its remote check is pending");
        }
    }

    /// Validates the provided [`Field`] locally, as on a focus loss.
    ///
    /// Returns a [`PendingCheck`] to be [run](PendingCheck::run) and
    /// [applied](Form::apply) if the [`Field`] also requires a remote check.
    pub fn blur(&mut self, field: Field) -> Option<PendingCheck> {
        let ctx = Context::new(&self.catalogs);
        let violated = validation::check(field, &self.input, &ctx);
        self.errors.set(field, violated);

        if violated.is_some() || !field.is_remote() {
            _ = self.pending.remove(&field);
            return None;
        }

        let generation = self.generations.entry(field).or_default();
        *generation += 1;
        let generation = *generation;
        _ = self.pending.insert(field, generation);

        Some(PendingCheck {
            field,
            value: self.input.get(field).to_owned(),
            generation,
        })
    }

    /// Applies the provided [`CheckOutcome`] of a [`PendingCheck`].
    ///
    /// Outcomes of outdated checks are discarded, returning `false`.
    pub fn apply(&mut self, outcome: CheckOutcome) -> bool {
        let CheckOutcome {
            field,
            value,
            generation,
            violated,
        } = outcome;

        let is_latest = self.pending.get(&field) == Some(&generation)
            && self.input.get(field) == value;
        if !is_latest {
            log::debug!(
                "discarding outdated `{field}` remote check #{generation}",
            );
            return false;
        }

        _ = self.pending.remove(&field);
        self.errors.set(field, violated);
        true
    }

    /// Starts submitting the current [`Input`].
    ///
    /// Returns [`None`] if the submit action is disabled, or any [`Field`]
    /// is invalid. Only local [`Constraint`]s are re-checked here, while
    /// already known remote violations are kept.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            log::debug!(
                "submit action is disabled in `{:?}` state",
                self.state,
            );
            return None;
        }

        let ctx = Context::new(&self.catalogs);
        for field in <Field as strum::IntoEnumIterator>::iter() {
            match validation::check(field, &self.input, &ctx) {
                Some(violated) => self.errors.set(field, Some(violated)),
                None => {
                    if self.errors.get(field) != Some(Constraint::Unique) {
                        self.errors.set(field, None);
                    }
                }
            }
        }
        if !self.errors.is_empty() {
            log::debug!(
                "submission blocked by {} invalid fields",
                self.errors.len(),
            );
            return None;
        }

        self.state = State::Submitting;
        self.succeeded = false;
        self.last_error = None;
        Some(Submission {
            input: self.input.clone(),
        })
    }

    /// Finishes the [`Submission`] with the provided [`Submitted`] outcome.
    ///
    /// On success the [`Form`] is reset to its empty initial state, while on
    /// failure the [`Input`] is kept to be corrected and resubmitted.
    pub fn finish(&mut self, submitted: Submitted) -> Option<Registered>
    where
        N: Notifier,
    {
        self.state = State::Ready;
        match submitted.0 {
            Ok(registered) => {
                self.input = Input::default();
                self.errors.clear();
                self.pending.clear();
                self.succeeded = true;
                self.notifier.notify(Notification::success(SUCCESS_MESSAGE));
                Some(registered)
            }
            Err(e) => {
                log::error!("failed to register user: {e}");
                let message = e.as_ref().message();
                self.notifier.notify(Notification::error(message.clone()));
                self.last_error = Some(message);
                None
            }
        }
    }
}

impl<Svc, N> Form<Svc, N>
where
    Svc: Query<
            query::catalog::Countries,
            Ok = Vec<Country>,
            Err = Traced<gateway::Error>,
        > + Query<
            query::catalog::DocumentTypes,
            Ok = Vec<DocumentType>,
            Err = Traced<gateway::Error>,
        >,
    N: Notifier,
{
    /// Loads the [`Catalogs`] concurrently and makes this [`Form`]
    /// [`State::Ready`] once both loads finish.
    ///
    /// If any of them fails, a single error is notified and the
    /// [`Catalogs`] are left empty.
    pub async fn initialize(&mut self) {
        let (countries, document_types) = future::join(
            self.service.execute(query::catalog::Countries::all()),
            self.service.execute(query::catalog::DocumentTypes::all()),
        )
        .await;

        match (countries, document_types) {
            (Ok(countries), Ok(document_types)) => {
                self.catalogs = Catalogs {
                    countries,
                    document_types,
                };
            }
            (Err(e), _) | (_, Err(e)) => {
                log::error!("failed to load catalogs: {e}");
                self.catalogs = Catalogs::default();
                self.notifier
                    .notify(Notification::error(CATALOGS_FAILURE_MESSAGE));
            }
        }
        self.state = State::Ready;
    }
}

impl<Svc, N> Form<Svc, N>
where
    Svc: UniquenessChecker,
{
    /// Validates the provided [`Field`] as on a focus loss, awaiting its
    /// remote check, if any.
    pub async fn validate_field(&mut self, field: Field) {
        if let Some(check) = self.blur(field) {
            let outcome = check.run(&self.service).await;
            _ = self.apply(outcome);
        }
    }

    /// Validates every [`Field`], including the remote checks.
    ///
    /// Returns `true` if every [`Field`] is valid.
    pub async fn validate(&mut self) -> bool {
        let ctx = Context::new(&self.catalogs);
        let errors =
            validation::validate_all(&self.service, &self.input, &ctx).await;
        self.errors = errors;
        self.pending.clear();
        self.errors.is_empty()
    }
}

impl<Svc, N> Form<Svc, N>
where
    Svc: UniquenessChecker
        + Command<
            RegisterUser,
            Ok = Registered,
            Err = Traced<register_user::ExecutionError>,
        >,
    N: Notifier,
{
    /// Validates and submits the current [`Input`].
    ///
    /// Returns [`None`] if the submit action is disabled, the [`Input`] is
    /// invalid, or the registry rejected it.
    pub async fn submit(&mut self) -> Option<Registered> {
        if !self.can_submit() || !self.validate().await {
            return None;
        }
        let submission = self.begin_submit()?;
        let submitted = submission.run(&self.service).await;
        self.finish(submitted)
    }
}

/// Remote check of a [`Field`] value started by [`Form::blur()`].
#[derive(Clone, Debug)]
pub struct PendingCheck {
    /// Checked [`Field`].
    field: Field,

    /// Checked value.
    value: String,

    /// Generation of this [`PendingCheck`].
    generation: u64,
}

impl PendingCheck {
    /// Returns the checked [`Field`].
    #[must_use]
    pub const fn field(&self) -> Field {
        self.field
    }

    /// Performs this [`PendingCheck`] with the provided checker.
    pub async fn run<C: UniquenessChecker>(self, checker: &C) -> CheckOutcome {
        let violated =
            validation::uniqueness::violation(checker, self.field, &self.value)
                .await;
        CheckOutcome {
            field: self.field,
            value: self.value,
            generation: self.generation,
            violated,
        }
    }
}

/// Outcome of a [`PendingCheck`], to be [applied](Form::apply).
#[derive(Clone, Debug)]
pub struct CheckOutcome {
    /// Checked [`Field`].
    field: Field,

    /// Checked value.
    value: String,

    /// Generation of the [`PendingCheck`].
    generation: u64,

    /// Violated [`Constraint`], if any.
    violated: Option<Constraint>,
}

/// Submission started by [`Form::begin_submit()`].
#[derive(Clone, Debug)]
pub struct Submission {
    /// Submitted [`Input`].
    input: Input,
}

impl Submission {
    /// Sends this [`Submission`] with the provided service.
    pub async fn run<Svc>(self, service: &Svc) -> Submitted
    where
        Svc: Command<
            RegisterUser,
            Ok = Registered,
            Err = Traced<register_user::ExecutionError>,
        >,
    {
        Submitted(service.execute(RegisterUser { input: self.input }).await)
    }
}

/// Outcome of a [`Submission`], to be [finished](Form::finish).
#[derive(Debug)]
pub struct Submitted(Result<Registered, Traced<register_user::ExecutionError>>);
