use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

/// Opens a pool that creates the database file on first use. WAL mode and a
/// busy timeout let concurrent request handlers read while seeding finishes.
/// `timeout_secs` bounds both pool acquisition and the SQLite lock wait.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let timeout = Duration::from_secs(timeout_secs.max(1));
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(timeout);

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
}

#[cfg(test)]
mod tests {
    use super::connect_with_settings;

    #[tokio::test]
    async fn in_memory_pool_shares_one_database_across_connections() {
        let pool = connect_with_settings("sqlite::memory:", 3, 5).await.expect("connect");

        sqlx::query("CREATE TABLE marker (id INTEGER PRIMARY KEY)")
            .execute(&pool)
            .await
            .expect("create marker table");

        let mut first = pool.acquire().await.expect("first connection");
        let mut second = pool.acquire().await.expect("second connection");
        for conn in [&mut first, &mut second] {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'marker'",
            )
            .fetch_one(&mut **conn)
            .await
            .expect("marker lookup");
            assert_eq!(count, 1);
        }

        drop(first);
        drop(second);
        pool.close().await;
    }

    #[tokio::test]
    async fn busy_timeout_follows_configured_seconds() {
        let pool = connect_with_settings("sqlite::memory:", 1, 7).await.expect("connect");

        let busy_ms: i64 =
            sqlx::query_scalar("PRAGMA busy_timeout").fetch_one(&pool).await.expect("pragma");
        assert_eq!(busy_ms, 7_000);

        pool.close().await;
    }

    #[tokio::test]
    async fn zero_timeout_is_raised_to_one_second() {
        let pool = connect_with_settings("sqlite::memory:", 1, 0).await.expect("connect");

        let busy_ms: i64 =
            sqlx::query_scalar("PRAGMA busy_timeout").fetch_one(&pool).await.expect("pragma");
        assert_eq!(busy_ms, 1_000);

        pool.close().await;
    }
}
