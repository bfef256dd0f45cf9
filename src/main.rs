use anyhow::Context;
use birthdays::config::cli::Command;
use birthdays::utils::{logger, validation::Validate};
use birthdays::{build_router, build_store, AppConfig, Cli, Record};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let store = build_store(&config).await?;

    match cli.command() {
        Command::Serve { bind } => {
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("binding {}", bind))?;
            tracing::info!("🎉 Listening on http://{}", listener.local_addr()?);
            axum::serve(listener, build_router(Arc::new(store))).await?;
        }
        Command::Dump => {
            let records = store.fetch_all().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Add {
            date,
            month,
            reddit,
        } => {
            store.append(Record::new(date, month, reddit)).await?;
            println!("✅ Saved");
        }
    }

    Ok(())
}
