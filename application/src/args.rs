//! [`Args`] definitions.

use clap::{Parser, Subcommand};
use service::domain::user;

/// Administration client of the user registry.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    /// [`Command`] to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command of the administration client.
#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Lists the registered users, page by page.
    Users {
        /// Number of the page to show, starting from 1.
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Shows the details of a single registered user.
    User {
        /// ID of the user.
        id: user::Id,
    },

    /// Registers a new user described in a JSON or TOML file.
    Register {
        /// Path to the file with the registration form values.
        file: String,
    },

    /// Lists the available countries and document types.
    Catalogs,
}
