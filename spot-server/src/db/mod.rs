//! Database Module
//!
//! Handles the embedded SurrealDB connection and schema

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Namespace / database used by the service
pub const NAMESPACE: &str = "study_spots";
pub const DATABASE: &str = "main";

/// Tables and indexes; idempotent, applied on every start
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS spot SCHEMALESS;

DEFINE TABLE IF NOT EXISTS review SCHEMALESS;
DEFINE INDEX IF NOT EXISTS review_spot ON review FIELDS spot;

DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
DEFINE INDEX IF NOT EXISTS user_username ON user FIELDS username UNIQUE;

DEFINE TABLE IF NOT EXISTS vote SCHEMALESS;
DEFINE INDEX IF NOT EXISTS vote_review_voter ON vote FIELDS review, voter UNIQUE;
"#;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed store at `db_path` and apply the schema
    ///
    /// Fails when the store cannot be opened; callers are expected to abort
    /// startup rather than run without persistence.
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, AppError> {
        let db_path = db_path.as_ref();
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %db_path.display(), "Database connection established (SurrealDB RocksDB)");

        db.query(SCHEMA)
            .await
            .and_then(|r| r.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }
}
