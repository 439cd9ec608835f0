use std::{io, process::ExitCode, sync::OnceLock};

use application::{command, Args, AsError, Config, Error, Service};
use service::infra::{graphql, GraphQl};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    let args = Args::parse().unwrap_or_else(|e| e.exit());

    match start(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn start(args: Args) -> Result<(), Error> {
    let Args { config, command } = args;

    let Config { gateway, log } =
        Config::new(config).map_err(AsError::into_error)?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let gateway = GraphQl::new(&graphql::Config::try_from(gateway)?)
        .map_err(AsError::into_error)?;
    log::debug!("executing `{command:?}`");

    command::execute(Service::new(gateway), command).await
}
