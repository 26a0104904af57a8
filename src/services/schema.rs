use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        rarity INTEGER NOT NULL,
        element TEXT NOT NULL,
        weapon_type TEXT NOT NULL,
        owned BOOLEAN NOT NULL DEFAULT 0,
        level INTEGER NOT NULL DEFAULT 1,
        constellation_level INTEGER NOT NULL DEFAULT 0,
        equipped_weapon_id TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS weapons (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        rarity INTEGER NOT NULL,
        weapon_type TEXT NOT NULL,
        owned BOOLEAN NOT NULL DEFAULT 0,
        level INTEGER NOT NULL DEFAULT 1,
        refinement_level INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        character_ids TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS draft_sessions (
        id TEXT PRIMARY KEY,
        state TEXT NOT NULL,
        settings TEXT NOT NULL,
        timer TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
];

/// In-memory URLs need `max_connections = 1`, every connection is its own DB.
pub async fn connect(db_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(db_url)
        .await
}

pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema is ready.");
    Ok(())
}
