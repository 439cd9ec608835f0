//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// Returned futures are not required to be [`Send`]: every [`Handler`] is
/// driven by a single-threaded cooperative executor, and the only suspension
/// points are the remote calls the [`Handler`] performs.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
