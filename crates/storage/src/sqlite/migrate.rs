use chrono::Utc;
use log::info;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Ordered schema steps; a version is applied at most once.
const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    r"
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL CHECK (length(key) > 0),
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    ",
)];

/// Apply every migration newer than the recorded schema version.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
        ",
    )
    .execute(pool)
    .await?;

    let current: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    let current = current.unwrap_or(0);

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let mut tx = pool.begin().await?;
        sqlx::query(*sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
            .bind(version)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!("applied schema migration {version}");
    }

    Ok(())
}
