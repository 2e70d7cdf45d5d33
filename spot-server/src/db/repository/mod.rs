//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod review;
pub mod spot;
pub mod user;
pub mod vote;

// Re-exports
pub use review::ReviewRepository;
pub use spot::SpotRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Compare-and-swap lost too many races
    #[error("Concurrent update: {0}")]
    Stale(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as "Database index `x` already contains ..."
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else if msg.contains("can be retried") {
            // Optimistic transaction conflict in the storage engine
            RepoError::Stale(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:key" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: parse_record_id("spot", "spot:abc") 或 parse_record_id("spot", "abc")
//   - 获取表名: id.table()
//   - CRUD: db.select(id) / "DELETE $thing" 直接使用 RecordId

/// Parse a client-supplied id for `table`
///
/// Accepts `"table:key"` and bare `"key"`; an id naming another table is
/// rejected.
pub fn parse_record_id(table: &str, raw: &str) -> RepoResult<RecordId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RepoError::Validation(format!("Missing {table} id")));
    }
    let id: RecordId = if raw.contains(':') {
        raw.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", raw)))?
    } else {
        RecordId::from_table_key(table, raw)
    };
    if id.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected a {table} id, got {}",
            id
        )));
    }
    Ok(id)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
