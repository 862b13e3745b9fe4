//! Settings key-value access
//!
//! Values are stored as text; NULL and missing rows both read as `None`.

use crate::Result;
use sqlx::SqlitePool;

/// Read the raw text stored under `key`
pub async fn get_setting(db: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;

    Ok(value.flatten())
}

/// Insert or update the text stored under `key`
pub async fn set_setting(db: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(db)
    .await?;

    Ok(())
}

/// Time of the last write to `key`, if any
pub async fn setting_updated_at(
    db: &SqlitePool,
    key: &str,
) -> Result<Option<chrono::NaiveDateTime>> {
    let updated: Option<chrono::NaiveDateTime> =
        sqlx::query_scalar("SELECT updated_at FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;

    #[tokio::test]
    async fn test_missing_setting_reads_none() {
        let db = init_memory_database().await.unwrap();
        assert_eq!(get_setting(&db, "absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_overwrite() {
        let db = init_memory_database().await.unwrap();

        set_setting(&db, "debugging-info", "first").await.unwrap();
        set_setting(&db, "debugging-info", "second").await.unwrap();

        assert_eq!(
            get_setting(&db, "debugging-info").await.unwrap().as_deref(),
            Some("second")
        );
        assert!(setting_updated_at(&db, "debugging-info")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_null_value_reads_none() {
        let db = init_memory_database().await.unwrap();
        sqlx::query("INSERT INTO settings (key, value) VALUES ('k', NULL)")
            .execute(&db)
            .await
            .unwrap();

        assert_eq!(get_setting(&db, "k").await.unwrap(), None);
    }
}
