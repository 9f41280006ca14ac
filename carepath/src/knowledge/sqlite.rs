//! SQLite-backed passage store (feature `sqlite`).
//!
//! Passages and their vectors live in one table; search scores every row in process.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::error::CollaboratorError;

use super::{rank, Embedder, KnowledgeStore, Passage};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS passages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        source TEXT,
        embedding BLOB NOT NULL
    );";

fn db_err(e: impl std::fmt::Display) -> CollaboratorError {
    CollaboratorError::Retrieval(format!("sqlite: {}", e))
}

/// Persistent knowledge store. Access is serialized through one connection; each passage is
/// written by a single INSERT.
pub struct SqliteKnowledgeStore {
    conn: Mutex<Connection>,
    embedder: Arc<dyn Embedder>,
}

impl SqliteKnowledgeStore {
    /// Opens or creates the database at `path`, creating parent directories.
    pub fn open(path: &Path, embedder: Arc<dyn Embedder>) -> Result<Self, CollaboratorError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(db_err)?;
        }
        let conn = Connection::open(path).map_err(db_err)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;").map_err(db_err)?;
        Self::with_connection(conn, embedder)
    }

    /// In-memory database, for tests.
    pub fn in_memory(embedder: Arc<dyn Embedder>) -> Result<Self, CollaboratorError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::with_connection(conn, embedder)
    }

    fn with_connection(conn: Connection, embedder: Arc<dyn Embedder>) -> Result<Self, CollaboratorError> {
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        tracing::debug!("knowledge store opened");
        Ok(Self {
            conn: Mutex::new(conn),
            embedder,
        })
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        self.embedder
            .embed(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CollaboratorError::Retrieval("no vector returned".into()))
    }
}

fn to_blob(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn from_blob(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[async_trait]
impl KnowledgeStore for SqliteKnowledgeStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, CollaboratorError> {
        if k == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = self.embed_one(query).await?;
        let rows = {
            let conn = self.conn.lock().map_err(db_err)?;
            let mut stmt = conn
                .prepare("SELECT text, source, embedding FROM passages ORDER BY id")
                .map_err(db_err)?;
            let mapped = stmt
                .query_map([], |row| {
                    let text: String = row.get(0)?;
                    let source: Option<String> = row.get(1)?;
                    let blob: Vec<u8> = row.get(2)?;
                    Ok((from_blob(&blob), Passage { text, source }))
                })
                .map_err(db_err)?;
            let rows: Vec<(Vec<f32>, Passage)> =
                mapped.collect::<Result<_, _>>().map_err(db_err)?;
            rows
        };
        Ok(rank(&query_vec, rows, k, self.embedder.min_relevance()))
    }

    async fn add(&self, passage: Passage) -> Result<(), CollaboratorError> {
        let vector = self.embed_one(&passage.text).await?;
        let conn = self.conn.lock().map_err(db_err)?;
        conn.execute(
            "INSERT INTO passages (text, source, embedding) VALUES (?1, ?2, ?3)",
            params![passage.text, passage.source, to_blob(&vector)],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn count(&self) -> Result<usize, CollaboratorError> {
        let conn = self.conn.lock().map_err(db_err)?;
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM passages", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(n as usize)
    }
}
