//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so tests never duplicate
//! table definitions.

use rusqlite::Connection;

/// In-memory database with the full schema applied.
pub struct TestEnv {
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        crate::db::schema::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Insert a user directly, skipping the (slow) argon2 hashing.
    pub fn create_user(&self, username: &str) -> i64 {
        crate::auth::db::create_user(&self.conn, username, "test-hash")
            .expect("test user insert failed")
    }
}
