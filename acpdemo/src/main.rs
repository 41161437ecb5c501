use std::fs::File;

use acp_axum::{router, start_server};
use acp_core::lifecycle::AuctionManager;
use acp_sqlite::Db;
use acpdemo::{AppConfig, Cli, impls::DemoApp};
use jwt_simple::prelude::HS256Key;
use time::OffsetDateTime;
use tokio::select;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI args and extract the JWT key
    let cli = Cli::import()?;
    let key = HS256Key::from_bytes(cli.secret.as_bytes());

    let AppConfig {
        server,
        database,
        auction,
        schedule,
    } = AppConfig::load(&cli)?;

    let db = Db::open(&database).await?;
    let sweeper = db.clone();
    let app = DemoApp { db, key };

    // If requested, dump the schema and exit.
    if let Some(path) = cli.schema {
        let (_, schema) = router(app, server, auction);
        serde_json::to_writer_pretty(File::create(path)?, &schema)?;
        return Ok(());
    }

    let sweep_config = auction.clone();
    let server_task = tokio::spawn(async move { start_server(server, auction, app).await });

    if schedule.every.is_some() {
        let sweep_task = tokio::spawn(async move {
            let f = async move |now: OffsetDateTime| {
                AuctionManager::new(&sweeper, &sweep_config)
                    .auto_end_expired_auctions(now.into())
                    .await
                    .map_err(anyhow::Error::new)
            };
            schedule.schedule(f).await
        });

        select! {
            r = server_task => r??,
            r = sweep_task => r??,
        }
    } else {
        server_task.await??;
    }

    Ok(())
}
