use std::env;

use anyhow::{bail, Context};
use dotenvy::dotenv;
use geezer_core::PubStore;

pub mod actions;

const DEFAULT_DATABASE_URL: &str = "sqlite://geezers.db";

#[derive(Debug, PartialEq)]
enum AdminAction {
    Migrate,
    Seed,
    List,
}

impl AdminAction {
    fn new(action: &str) -> anyhow::Result<Self> {
        match action {
            "MIGRATE" => Ok(Self::Migrate),
            "SEED" => Ok(Self::Seed),
            "LIST" => Ok(Self::List),
            other => bail!("invalid ACTION '{other}', expected MIGRATE, SEED or LIST"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let action = env::var("ACTION").context("ACTION must be set")?;
    let action = AdminAction::new(&action)?;
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    // connecting applies any pending migrations
    let store = PubStore::connect(&database_url)
        .await
        .with_context(|| format!("opening {database_url}"))?;

    match action {
        AdminAction::Migrate => actions::report_migrations(&store).await,
        AdminAction::Seed => actions::seed(&store).await.map(|_| ()),
        AdminAction::List => actions::list(&store).await,
    }
}
