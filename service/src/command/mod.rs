//! [`Command`] definition.

pub mod register_user;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::register_user::RegisterUser;
