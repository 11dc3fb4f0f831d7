use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

use crate::pub_record::{Amenities, Commentary, NewPub, Pub, PubDetails, PubValidationError, YesNo};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Every column of `pubs` after the rating and amenity schemas were merged.
/// Databases written by either older layout are missing some of these.
const PUB_COLUMNS: [(&str, &str); 10] = [
    ("name", "TEXT"),
    ("latitude", "REAL"),
    ("longitude", "REAL"),
    ("rating", "REAL"),
    ("pool_table", "TEXT"),
    ("darts", "TEXT"),
    ("commentary", "TEXT"),
    ("fosters_carling", "TEXT"),
    ("pint_price", "REAL"),
    ("lock_ins", "TEXT"),
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("invalid pub: {0}")]
    Invalid(#[from] PubValidationError),
    #[error("row {id} is malformed: {reason}")]
    MalformedRow { id: i64, reason: String },
}

type StoreResult<T> = Result<T, StoreError>;

/// The `pubs` table. Rows come back in insertion (rowid) order.
#[derive(Clone, Debug)]
pub struct PubStore {
    pool: SqlitePool,
}

impl PubStore {
    /// Opens (creating if needed) the database at `database_url` and applies
    /// pending migrations.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// A private database living only as long as the store. Used by tests.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // every connection to :memory: is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        MIGRATOR.run(&pool).await?;
        let store = Self { pool };
        store.ensure_pub_columns().await?;
        Ok(store)
    }

    async fn ensure_pub_columns(&self) -> StoreResult<()> {
        let pragma_rows = sqlx::query("PRAGMA table_info(pubs)")
            .fetch_all(&self.pool)
            .await?;

        let mut existing = Vec::with_capacity(pragma_rows.len());
        for row in pragma_rows {
            let col_name: String = row.try_get("name")?;
            existing.push(col_name);
        }

        for (column, sql_type) in PUB_COLUMNS {
            if existing.iter().any(|c| c == column) {
                continue;
            }
            sqlx::query(&format!("ALTER TABLE pubs ADD COLUMN {column} {sql_type}"))
                .execute(&self.pool)
                .await?;
            tracing::info!(column, "added missing pubs column");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn load_all(&self) -> StoreResult<Vec<Pub>> {
        let rows = sqlx::query(
            "SELECT
                rowid AS id,
                name,
                latitude,
                longitude,
                rating,
                pool_table,
                darts,
                commentary,
                fosters_carling,
                pint_price,
                lock_ins
             FROM pubs
             ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut pubs = Vec::with_capacity(rows.len());
        for row in rows {
            match pub_from_row(&row) {
                Ok(Some(pub_record)) => pubs.push(pub_record),
                Ok(None) => {}
                Err(StoreError::MalformedRow { id, reason }) => {
                    tracing::warn!(id, %reason, "skipping malformed pub");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(pubs)
    }

    pub async fn insert(&self, new_pub: &NewPub) -> StoreResult<Pub> {
        new_pub.validate()?;

        let amenities = &new_pub.amenities;
        let result = sqlx::query(
            "INSERT INTO pubs (
                name, latitude, longitude,
                pool_table, darts, commentary, fosters_carling, pint_price, lock_ins
             )
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(new_pub.name.trim())
        .bind(new_pub.latitude)
        .bind(new_pub.longitude)
        .bind(amenities.pool_table.as_str())
        .bind(amenities.darts.as_str())
        .bind(amenities.commentary.as_str())
        .bind(amenities.fosters_carling.as_str())
        .bind(amenities.pint_price)
        .bind(amenities.lock_ins.as_str())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(id, name = %new_pub.name, "pub inserted");

        let mut stored = new_pub.clone();
        stored.name = stored.name.trim().to_string();
        Ok(stored.into_pub(id))
    }

    /// Versions of the migrations that have run against this database.
    pub async fn applied_migrations(&self) -> StoreResult<Vec<i64>> {
        let rows = sqlx::query("SELECT version FROM _sqlx_migrations WHERE success = 1 ORDER BY version")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| row.try_get::<i64, _>("version").map_err(StoreError::from))
            .collect()
    }

    pub async fn count(&self) -> StoreResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM pubs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }
}

fn pub_from_row(row: &SqliteRow) -> StoreResult<Option<Pub>> {
    let id: i64 = row.try_get("id")?;
    let latitude: Option<f64> = row.try_get("latitude")?;
    let longitude: Option<f64> = row.try_get("longitude")?;

    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        tracing::warn!(id, "skipping pub without coordinates");
        return Ok(None);
    };

    let name: Option<String> = row.try_get("name")?;

    Ok(Some(Pub {
        id,
        name: name.unwrap_or_default(),
        latitude,
        longitude,
        details: details_from_row(id, row)?,
    }))
}

fn details_from_row(id: i64, row: &SqliteRow) -> StoreResult<PubDetails> {
    let pool_table: Option<String> = row.try_get("pool_table")?;
    let darts: Option<String> = row.try_get("darts")?;
    let commentary: Option<String> = row.try_get("commentary")?;
    let fosters_carling: Option<String> = row.try_get("fosters_carling")?;
    let pint_price: Option<f64> = row.try_get("pint_price")?;
    let lock_ins: Option<String> = row.try_get("lock_ins")?;

    match (pool_table, darts, commentary, fosters_carling, pint_price, lock_ins) {
        (Some(pool_table), Some(darts), Some(commentary), Some(fosters_carling), Some(pint_price), Some(lock_ins)) => {
            Ok(PubDetails::Amenities(Amenities {
                pool_table: parse_choice::<YesNo>(id, &pool_table)?,
                darts: parse_choice::<YesNo>(id, &darts)?,
                commentary: parse_choice::<Commentary>(id, &commentary)?,
                fosters_carling: parse_choice::<YesNo>(id, &fosters_carling)?,
                pint_price,
                lock_ins: parse_choice::<YesNo>(id, &lock_ins)?,
            }))
        }
        _ => Ok(PubDetails::Legacy {
            rating: row.try_get("rating")?,
        }),
    }
}

fn parse_choice<T>(id: i64, raw: &str) -> StoreResult<T>
where
    T: FromStr<Err = crate::pub_record::UnknownChoice>,
{
    raw.parse::<T>().map_err(|e| StoreError::MalformedRow {
        id,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_lion() -> NewPub {
        NewPub {
            name: "Red Lion".to_string(),
            latitude: 51.5027,
            longitude: -0.1262,
            amenities: Amenities {
                pool_table: YesNo::Yes,
                darts: YesNo::No,
                commentary: Commentary::TheyGetIt,
                fosters_carling: YesNo::Yes,
                pint_price: 4.50,
                lock_ins: YesNo::No,
            },
        }
    }

    #[tokio::test]
    async fn insert_then_load_round_trips_amenities() {
        let store = PubStore::in_memory().await.unwrap();

        let inserted = store.insert(&red_lion()).await.unwrap();
        let pubs = store.load_all().await.unwrap();

        assert_eq!(pubs, vec![inserted.clone()]);
        assert_eq!(inserted.name, "Red Lion");
        match inserted.details {
            PubDetails::Amenities(a) => assert_eq!(a.pint_price, 4.50),
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[tokio::test]
    async fn identical_submissions_are_both_kept_in_order() {
        let store = PubStore::in_memory().await.unwrap();

        let first = store.insert(&red_lion()).await.unwrap();
        let second = store.insert(&red_lion()).await.unwrap();

        assert_ne!(first.id, second.id);
        let ids: Vec<i64> = store.load_all().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn invalid_pub_is_not_written() {
        let store = PubStore::in_memory().await.unwrap();
        let mut nameless = red_lion();
        nameless.name = String::new();

        let err = store.insert(&nameless).await.unwrap_err();

        assert!(matches!(err, StoreError::Invalid(PubValidationError::MissingName)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn legacy_rating_rows_load_as_legacy() {
        let store = PubStore::in_memory().await.unwrap();
        sqlx::query("INSERT INTO pubs (name, latitude, longitude, rating) VALUES (?1, ?2, ?3, ?4)")
            .bind("The Station House")
            .bind(51.586)
            .bind(-0.071)
            .bind(4.5)
            .execute(store.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO pubs (name, rating) VALUES ('Nowhere', 3.0)")
            .execute(store.pool())
            .await
            .unwrap();

        let pubs = store.load_all().await.unwrap();

        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].name, "The Station House");
        assert_eq!(pubs[0].details, PubDetails::Legacy { rating: Some(4.5) });
    }

    #[tokio::test]
    async fn row_with_unknown_choice_is_skipped_and_others_load() {
        let store = PubStore::in_memory().await.unwrap();
        let first = store.insert(&red_lion()).await.unwrap();
        let second = store.insert(&red_lion()).await.unwrap();
        let bad = store.insert(&red_lion()).await.unwrap();
        sqlx::query("UPDATE pubs SET pool_table = 'yes' WHERE rowid = ?1")
            .bind(bad.id)
            .execute(store.pool())
            .await
            .unwrap();

        let ids: Vec<i64> = store.load_all().await.unwrap().iter().map(|p| p.id).collect();

        assert_eq!(ids, vec![first.id, second.id]);
    }

    async fn open_with_table(create_table: &str, insert_row: &str) -> (tempfile::TempDir, PubStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("geezers.db").display());

        let options = SqliteConnectOptions::from_str(&url).unwrap().create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await.unwrap();
        sqlx::query(create_table).execute(&pool).await.unwrap();
        sqlx::query(insert_row).execute(&pool).await.unwrap();
        pool.close().await;

        let store = PubStore::connect(&url).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn rating_only_database_is_adopted() {
        let (_dir, store) = open_with_table(
            "CREATE TABLE pubs (name TEXT, latitude REAL, longitude REAL, rating REAL)",
            "INSERT INTO pubs VALUES ('The Station House', 51.586, -0.071, 4.5)",
        )
        .await;

        let added = store.insert(&red_lion()).await.unwrap();
        let pubs = store.load_all().await.unwrap();

        assert_eq!(pubs.len(), 2);
        assert_eq!(pubs[0].details, PubDetails::Legacy { rating: Some(4.5) });
        assert_eq!(pubs[1], added);
    }

    #[tokio::test]
    async fn amenity_only_database_is_adopted() {
        let (_dir, store) = open_with_table(
            "CREATE TABLE pubs (
                name TEXT, latitude REAL, longitude REAL,
                pool_table TEXT, darts TEXT, commentary TEXT,
                fosters_carling TEXT, pint_price REAL, lock_ins TEXT
             )",
            "INSERT INTO pubs VALUES
                ('The Crown', 51.52, -0.08, 'Yes', 'No', 'They get it', 'Yes', 5.2, 'No')",
        )
        .await;

        store.insert(&red_lion()).await.unwrap();
        let pubs = store.load_all().await.unwrap();

        assert_eq!(pubs.len(), 2);
        assert_eq!(pubs[0].name, "The Crown");
        match &pubs[0].details {
            PubDetails::Amenities(a) => {
                assert_eq!(a.pool_table, YesNo::Yes);
                assert_eq!(a.commentary, Commentary::TheyGetIt);
                assert_eq!(a.pint_price, 5.2);
            }
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[tokio::test]
    async fn pubs_survive_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("geezers.db").display());

        let store = PubStore::connect(&url).await.unwrap();
        store.insert(&red_lion()).await.unwrap();
        store.close().await;

        let reopened = PubStore::connect(&url).await.unwrap();
        let pubs = reopened.load_all().await.unwrap();

        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].name, "Red Lion");
    }
}
