//! Users [`Listing`] controller.

use std::num::NonZeroUsize;

use common::pagination::{self, Page};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{user, User},
    infra::gateway,
    notify::{Notification, Notifier},
    query, Query,
};

/// Number of [`User`]s on a single [`Page`].
pub const PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// Message shown when the requested [`User`] doesn't exist.
pub const NOT_FOUND_MESSAGE: &str = "User not found";

/// State of the [`User`]s collection of a [`Listing`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum State {
    /// [`User`]s are being loaded.
    Loading,

    /// [`User`]s are loaded.
    Loaded,

    /// [`User`]s failed to load, with the human-readable reason.
    Failed(String),
}

/// State of the [`User`] detail view of a [`Listing`].
#[derive(Clone, Debug, Default)]
pub enum Detail {
    /// Detail view is closed.
    #[default]
    Closed,

    /// Detail of the [`User`] with the provided [`user::Id`] is being
    /// fetched.
    Loading(user::Id),

    /// Detail of a [`User`] is fetched.
    Loaded(Box<User>),

    /// Detail of the [`User`] with the provided [`user::Id`] failed to be
    /// fetched.
    Failed {
        /// [`user::Id`] of the requested [`User`].
        id: user::Id,

        /// Human-readable reason of the failure.
        message: String,
    },
}

impl Detail {
    /// Indicates whether the detail view is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Controller of a paginated [`User`]s listing with an on-demand detail
/// view.
#[derive(Debug)]
pub struct Listing<Svc, N> {
    /// Service performing remote operations.
    service: Svc,

    /// [`Notifier`] of user-facing messages.
    notifier: N,

    /// [`State`] of the [`User`]s collection.
    state: State,

    /// Loaded [`User`] summaries.
    users: Vec<User>,

    /// 1-based number of the currently shown [`Page`].
    current_page: usize,

    /// Current [`Detail`] view.
    detail: Detail,

    /// Generation of the latest [`DetailRequest`].
    generation: u64,
}

impl<Svc, N> Listing<Svc, N> {
    /// Creates a new [`Listing`] in the [`State::Loading`] state.
    #[must_use]
    pub fn new(service: Svc, notifier: N) -> Self {
        Self {
            service,
            notifier,
            state: State::Loading,
            users: Vec::new(),
            current_page: 1,
            detail: Detail::Closed,
            generation: 0,
        }
    }

    /// Returns the [`State`] of the [`User`]s collection.
    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Returns all the loaded [`User`]s.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Returns the current [`Detail`] view.
    #[must_use]
    pub const fn detail(&self) -> &Detail {
        &self.detail
    }

    /// Returns the currently shown [`Page`].
    #[must_use]
    pub fn current_page(&self) -> Page<'_, User> {
        Page::new(
            &self.users,
            pagination::Arguments::new(self.current_page, PAGE_SIZE),
        )
    }

    /// Shows the [`Page`] with the provided 1-based `number`.
    ///
    /// Out-of-range numbers are clamped rather than rejected.
    pub fn page(&mut self, number: usize) -> Page<'_, User> {
        let args = pagination::Arguments::new(number, PAGE_SIZE)
            .clamp(self.users.len());
        self.current_page = args.number;
        Page::new(&self.users, args)
    }

    /// Opens the detail view of the [`User`] with the provided [`user::Id`].
    ///
    /// Returns a [`DetailRequest`] to be [run](DetailRequest::run) and
    /// [applied](Listing::apply_detail). Any previous request is outdated.
    pub fn open(&mut self, id: user::Id) -> DetailRequest {
        self.generation += 1;
        self.detail = Detail::Loading(id);
        DetailRequest {
            id,
            generation: self.generation,
        }
    }

    /// Applies the provided [`DetailResponse`] of a [`DetailRequest`].
    ///
    /// Responses of outdated requests (including ones of a closed detail
    /// view) are discarded, returning `false`.
    pub fn apply_detail(&mut self, response: DetailResponse) -> bool {
        let DetailResponse {
            id,
            generation,
            result,
        } = response;

        if generation != self.generation
            || !matches!(self.detail, Detail::Loading(current) if current == id)
        {
            log::debug!("discarding outdated detail of `{id}` user");
            return false;
        }

        self.detail = match result {
            Ok(Some(user)) => Detail::Loaded(Box::new(user)),
            Ok(None) => Detail::Failed {
                id,
                message: NOT_FOUND_MESSAGE.into(),
            },
            Err(e) => {
                log::error!("failed to fetch `{id}` user detail: {e}");
                Detail::Failed {
                    id,
                    message: e.as_ref().message(),
                }
            }
        };
        true
    }

    /// Closes the detail view, discarding any response still in flight.
    pub fn close(&mut self) {
        self.generation += 1;
        self.detail = Detail::Closed;
    }
}

impl<Svc, N> Listing<Svc, N>
where
    Svc: Query<
            query::users::List,
            Ok = Vec<User>,
            Err = Traced<gateway::Error>,
        > + Query<
            query::user::ById,
            Ok = Option<User>,
            Err = Traced<gateway::Error>,
        >,
    N: Notifier,
{
    /// Fetches the whole [`User`]s collection, showing its first [`Page`].
    ///
    /// A failure leaves the [`Listing`] in the [`State::Failed`] state
    /// without retrying.
    pub async fn load_all(&mut self) {
        self.state = State::Loading;
        match self.service.execute(query::users::List::all()).await {
            Ok(users) => {
                log::debug!("loaded {} users", users.len());
                self.users = users;
                self.current_page = 1;
                self.state = State::Loaded;
            }
            Err(e) => {
                log::error!("failed to load users: {e}");
                let message = e.as_ref().message();
                self.notifier.notify(Notification::error(message.clone()));
                self.users.clear();
                self.state = State::Failed(message);
            }
        }
    }

    /// Opens the detail view of the [`User`] with the provided [`user::Id`]
    /// and fetches it.
    pub async fn select_user(&mut self, id: user::Id) {
        let request = self.open(id);
        let response = request.run(&self.service).await;
        _ = self.apply_detail(response);
    }
}

/// Request of a [`User`] detail started by [`Listing::open()`].
#[derive(Clone, Copy, Debug)]
pub struct DetailRequest {
    /// [`user::Id`] of the requested [`User`].
    id: user::Id,

    /// Generation of this [`DetailRequest`].
    generation: u64,
}

impl DetailRequest {
    /// Fetches the requested [`User`] detail with the provided service.
    pub async fn run<Svc>(self, service: &Svc) -> DetailResponse
    where
        Svc: Query<
            query::user::ById,
            Ok = Option<User>,
            Err = Traced<gateway::Error>,
        >,
    {
        DetailResponse {
            id: self.id,
            generation: self.generation,
            result: service.execute(query::user::ById::by(self.id)).await,
        }
    }
}

/// Response to a [`DetailRequest`], to be
/// [applied](Listing::apply_detail).
#[derive(Debug)]
pub struct DetailResponse {
    /// [`user::Id`] of the requested [`User`].
    id: user::Id,

    /// Generation of the [`DetailRequest`].
    generation: u64,

    /// Fetched [`User`] detail.
    result: Result<Option<User>, Traced<gateway::Error>>,
}

#[cfg(all(test, feature = "graphql"))]
mod spec {
    use std::rc::Rc;

    use crate::{
        domain::{user, User},
        fake::{self, FakeGateway, Op},
        notify::{Level, Queue},
        Service,
    };

    use super::{Detail, Listing, State, NOT_FOUND_MESSAGE};

    fn users(count: i32) -> Vec<User> {
        (1..=count).map(|i| fake::user(i, &format!("user_{i}"))).collect()
    }

    fn listing(
        gateway: &FakeGateway,
    ) -> (Listing<Service<FakeGateway>, Rc<Queue>>, Rc<Queue>) {
        let queue = Rc::new(Queue::default());
        (
            Listing::new(Service::new(gateway.clone()), queue.clone()),
            queue,
        )
    }

    #[tokio::test]
    async fn paginates_by_ten() {
        let gateway = FakeGateway::default();
        gateway.set_users(users(25));
        let (mut listing, _) = listing(&gateway);
        listing.load_all().await;
        assert_eq!(listing.state(), &State::Loaded);

        assert_eq!(listing.page(1).items.len(), 10);
        assert_eq!(listing.page(2).items[0].id, user::Id::from(11));

        let third = listing.page(3);
        assert_eq!(third.items.len(), 5);
        assert_eq!(third.info.total_pages, 3);
        assert!(!third.info.has_next_page);
        let third_ids = third.items.iter().map(|u| u.id).collect::<Vec<_>>();

        let clamped = listing.page(4);
        assert_eq!(clamped.info.number, 3);
        assert_eq!(
            clamped.items.iter().map(|u| u.id).collect::<Vec<_>>(),
            third_ids,
        );
        assert_eq!(listing.current_page().info.number, 3);

        assert_eq!(listing.page(0).info.number, 1);
    }

    #[tokio::test]
    async fn shows_single_empty_page() {
        let gateway = FakeGateway::default();
        let (mut listing, queue) = listing(&gateway);
        listing.load_all().await;

        let page = listing.page(1);
        assert!(page.is_empty());
        assert!(page.items.is_empty());
        assert_eq!(page.info.total_pages, 1);
        assert_eq!(listing.state(), &State::Loaded);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn fails_persistently() {
        let gateway = FakeGateway::default();
        gateway.set_users(users(3));
        gateway.make_unavailable(Op::Users);
        let (mut listing, queue) = listing(&gateway);

        listing.load_all().await;

        assert!(matches!(listing.state(), State::Failed(_)));
        assert!(listing.users().is_empty());
        assert_eq!(gateway.calls(Op::Users), 1);
        let notifications = queue.drain();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, Level::Error);
    }

    #[tokio::test]
    async fn fetches_detail_on_demand() {
        let gateway = FakeGateway::default();
        gateway.set_users(users(3));
        let mut detail = fake::user(2, "user_2");
        detail.given_name = Some("Detailed".into());
        gateway.set_detail(detail);
        let (mut listing, _) = listing(&gateway);
        listing.load_all().await;

        listing.select_user(2.into()).await;

        assert_eq!(gateway.calls(Op::User), 1);
        match listing.detail() {
            Detail::Loaded(u) => {
                assert_eq!(u.given_name.as_deref(), Some("Detailed"));
            }
            other => panic!("unexpected detail: {other:?}"),
        }
        assert_eq!(
            listing.users()[1].given_name.as_deref(),
            Some("Given"),
        );
    }

    #[tokio::test]
    async fn keeps_detail_open_on_failure() {
        let gateway = FakeGateway::default();
        gateway.make_unavailable(Op::User);
        let (mut listing, _) = listing(&gateway);

        listing.select_user(7.into()).await;

        assert!(listing.detail().is_open());
        assert!(matches!(
            listing.detail(),
            Detail::Failed { id, .. } if *id == user::Id::from(7),
        ));

        gateway.make_available(Op::User);
        listing.select_user(7.into()).await;
        assert!(matches!(
            listing.detail(),
            Detail::Failed { message, .. } if message == NOT_FOUND_MESSAGE,
        ));

        listing.close();
        assert!(!listing.detail().is_open());
    }

    #[tokio::test]
    async fn discards_detail_of_closed_view() {
        let gateway = FakeGateway::default();
        gateway.set_detail(fake::user(1, "user_1"));
        gateway.set_detail(fake::user(2, "user_2"));
        let (mut listing, _) = listing(&gateway);
        let service = Service::new(gateway.clone());

        let request = listing.open(1.into());
        assert!(matches!(listing.detail(), Detail::Loading(_)));
        listing.close();
        let response = request.run(&service).await;
        assert!(!listing.apply_detail(response));
        assert!(!listing.detail().is_open());

        let first = listing.open(1.into());
        let second = listing.open(2.into());
        let second = second.run(&service).await;
        let first = first.run(&service).await;
        assert!(listing.apply_detail(second));
        assert!(!listing.apply_detail(first));
        assert!(matches!(
            listing.detail(),
            Detail::Loaded(u) if u.id == user::Id::from(2),
        ));
    }
}
