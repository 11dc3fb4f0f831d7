use anyhow::Context;
use geezer_core::store::MIGRATOR;
use geezer_core::{Amenities, Commentary, NewPub, PubStore, YesNo};

/// The pub every fresh map starts with.
pub fn example_pub() -> NewPub {
    NewPub {
        name: "The Station House".to_string(),
        latitude: 51.586,
        longitude: -0.071,
        amenities: Amenities {
            pool_table: YesNo::Yes,
            darts: YesNo::Yes,
            commentary: Commentary::TheyGetIt,
            fosters_carling: YesNo::Yes,
            pint_price: 4.50,
            lock_ins: YesNo::No,
        },
    }
}

pub async fn report_migrations(store: &PubStore) -> anyhow::Result<()> {
    let applied = store
        .applied_migrations()
        .await
        .context("reading applied migrations")?;

    for migration in MIGRATOR.iter() {
        let state = if applied.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        println!("{:>4}  {:<8} {}", migration.version, state, migration.description);
    }
    tracing::info!(applied = applied.len(), "migrations up to date");
    Ok(())
}

/// Inserts the example pub into an empty table. Returns whether it was added.
pub async fn seed(store: &PubStore) -> anyhow::Result<bool> {
    let existing = store.count().await?;
    if existing > 0 {
        tracing::info!(existing, "pubs table already has rows, not seeding");
        return Ok(false);
    }

    let stored = store.insert(&example_pub()).await?;
    tracing::info!(id = stored.id, name = %stored.name, "seeded example pub");
    Ok(true)
}

pub async fn list(store: &PubStore) -> anyhow::Result<()> {
    let pubs = store.load_all().await?;
    for p in &pubs {
        println!(
            "{:>4}  {:>10.6} {:>10.6}  {}",
            p.id,
            p.latitude,
            p.longitude,
            p.summary()
        );
    }
    tracing::info!(count = pubs.len(), "listed pubs");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seed_only_fills_an_empty_table() {
        let store = PubStore::in_memory().await.unwrap();

        assert!(seed(&store).await.unwrap());
        assert!(!seed(&store).await.unwrap());

        let pubs = store.load_all().await.unwrap();
        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].name, "The Station House");
    }

    #[tokio::test]
    async fn migrations_are_all_recorded() {
        let store = PubStore::in_memory().await.unwrap();
        let applied = store.applied_migrations().await.unwrap();
        assert_eq!(applied.len(), MIGRATOR.iter().count());
    }
}
