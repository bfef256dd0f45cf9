#[cfg(feature = "lambda")]
use birthdays::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use birthdays::{build_router, build_store, AppConfig};
#[cfg(feature = "lambda")]
use lambda_http::{run, Error};
#[cfg(feature = "lambda")]
use std::sync::Arc;

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = AppConfig::from_env()?;
    config.validate()?;

    // Built once per cold start and reused by every invocation.
    let store = build_store(&config).await?;
    tracing::info!("Starting birthdays Lambda handler");

    run(build_router(Arc::new(store))).await
}
