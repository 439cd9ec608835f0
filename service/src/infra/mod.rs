//! Infrastructure layer.

pub mod gateway;

pub use self::gateway::Gateway;
#[cfg(feature = "graphql")]
pub use self::gateway::{graphql, GraphQl};
