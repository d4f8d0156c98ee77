use crate::types::{
    AppError, ConversationTurn, DocumentRecord, DocumentStatus, MessageRole, Result, Session,
    UserProfile,
};
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database};
use std::str::FromStr;

/// Embedded SQLite store for users, sessions, conversation turns, and
/// document metadata.
pub struct StoreClient {
    db: Database,
}

impl StoreClient {
    /// Open (or create) a file-backed store.
    pub async fn new_local(path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Database(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let client = Self { db };
        client.initialize_schema().await?;
        Ok(client)
    }

    /// Open an ephemeral in-memory store (used by tests and `:memory:` config).
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let client = Self { db };
        client.initialize_schema().await?;
        Ok(client)
    }

    /// Open from a configured path, dispatching on `:memory:`.
    pub async fn open(path: &str) -> Result<Self> {
        if path == ":memory:" {
            Self::new_memory().await
        } else {
            Self::new_local(path).await
        }
    }

    fn connection(&self) -> Result<Connection> {
        self.db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                total_sessions INTEGER NOT NULL DEFAULT 0,
                total_documents INTEGER NOT NULL DEFAULT 0
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 0,
                message_count INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create sessions table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS turns (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                agent TEXT NOT NULL DEFAULT '',
                sources TEXT NOT NULL DEFAULT '[]',
                processing_time REAL NOT NULL DEFAULT 0,
                FOREIGN KEY (session_id) REFERENCES sessions(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create turns table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                file_name TEXT NOT NULL,
                file_path TEXT NOT NULL,
                file_type TEXT NOT NULL,
                file_size_bytes INTEGER NOT NULL,
                extraction_method TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                chunk_count INTEGER NOT NULL DEFAULT 0,
                error TEXT,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create documents table: {}", e)))?;

        Ok(())
    }

    // ============== User Operations ==============

    /// Create the singleton user profile if it does not exist yet.
    pub async fn ensure_user(&self, id: &str, username: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT OR IGNORE INTO users (id, username, created_at) VALUES (?, ?, ?)",
            (id, username, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        Ok(())
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<UserProfile>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, username, created_at, total_sessions, total_documents
                 FROM users WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match next_row(&mut rows).await? {
            Some(row) => Ok(Some(UserProfile {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                username: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                created_at: timestamp(row.get::<i64>(2).map_err(|e| AppError::Database(e.to_string()))?),
                total_sessions: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                total_documents: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            })),
            None => Ok(None),
        }
    }

    async fn bump_user_counter(&self, id: &str, column: &str) -> Result<()> {
        let conn = self.connection()?;
        // column comes from the two fixed call sites below
        conn.execute(
            &format!("UPDATE users SET {col} = {col} + 1 WHERE id = ?", col = column),
            [id],
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to update user counters: {}", e)))?;
        Ok(())
    }

    // ============== Session Operations ==============

    pub async fn create_session(&self, id: &str, user_id: &str, title: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO sessions (id, user_id, title, created_at, updated_at, is_active)
             VALUES (?, ?, ?, ?, ?, 1)",
            (id, user_id, title, now, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create session: {}", e)))?;

        self.bump_user_counter(user_id, "total_sessions").await?;

        tracing::info!("Created new session: {}", id);
        Ok(())
    }

    pub async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, user_id, title, created_at, updated_at, is_active, message_count
                 FROM sessions WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query session: {}", e)))?;

        match next_row(&mut rows).await? {
            Some(row) => Ok(Some(session_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// ID of the user's currently active session, if any.
    pub async fn get_active_session_id(&self, user_id: &str) -> Result<Option<String>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id FROM sessions WHERE user_id = ? AND is_active = 1
                 ORDER BY updated_at DESC LIMIT 1",
                [user_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query active session: {}", e)))?;

        match next_row(&mut rows).await? {
            Some(row) => Ok(Some(row.get(0).map_err(|e| AppError::Database(e.to_string()))?)),
            None => Ok(None),
        }
    }

    pub async fn deactivate_all_sessions(&self, user_id: &str) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "UPDATE sessions SET is_active = 0 WHERE user_id = ?",
            [user_id],
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to deactivate sessions: {}", e)))?;

        Ok(())
    }

    /// Activate one session, deactivating every other session of its owner.
    pub async fn activate_session(&self, id: &str) -> Result<()> {
        let session = self
            .get_session(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;

        self.deactivate_all_sessions(&session.user_id).await?;

        let conn = self.connection()?;
        conn.execute("UPDATE sessions SET is_active = 1 WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to activate session: {}", e)))?;

        tracing::info!("Activated session: {}", id);
        Ok(())
    }

    pub async fn list_sessions(&self, user_id: &str, limit: usize) -> Result<Vec<Session>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, user_id, title, created_at, updated_at, is_active, message_count
                 FROM sessions WHERE user_id = ?
                 ORDER BY updated_at DESC LIMIT ?",
                (user_id, limit as i64),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query sessions: {}", e)))?;

        let mut sessions = Vec::new();
        while let Some(row) = next_row(&mut rows).await? {
            sessions.push(session_from_row(&row)?);
        }
        Ok(sessions)
    }

    async fn touch_session(&self, id: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "UPDATE sessions SET updated_at = ?, message_count = message_count + 1 WHERE id = ?",
            (now, id),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to touch session: {}", e)))?;

        Ok(())
    }

    // ============== Conversation Turn Operations ==============

    /// Append a turn and bump its session's counters.
    pub async fn add_turn(&self, turn: &ConversationTurn) -> Result<()> {
        let conn = self.connection()?;

        let sources = serde_json::to_string(&turn.sources)
            .map_err(|e| AppError::Internal(format!("Failed to serialize sources: {}", e)))?;

        conn.execute(
            "INSERT INTO turns (id, session_id, role, content, timestamp, agent, sources, processing_time)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                turn.id.as_str(),
                turn.session_id.as_str(),
                turn.role.as_str(),
                turn.content.as_str(),
                turn.timestamp.timestamp(),
                turn.agent.as_str(),
                sources,
                turn.processing_time,
            ),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to add turn: {}", e)))?;

        self.touch_session(&turn.session_id).await?;
        Ok(())
    }

    /// The last `limit` turns of a session, in chronological order.
    pub async fn get_session_history(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, session_id, role, content, timestamp, agent, sources, processing_time
                 FROM turns WHERE session_id = ?
                 ORDER BY timestamp DESC, rowid DESC LIMIT ?",
                (session_id, limit as i64),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query turns: {}", e)))?;

        let mut turns = Vec::new();
        while let Some(row) = next_row(&mut rows).await? {
            let role_str: String = row.get(2).map_err(|e| AppError::Database(e.to_string()))?;
            let role = match role_str.as_str() {
                "system" => MessageRole::System,
                "assistant" => MessageRole::Assistant,
                _ => MessageRole::User,
            };

            let sources_raw: String = row.get(6).map_err(|e| AppError::Database(e.to_string()))?;
            let sources: Vec<String> = serde_json::from_str(&sources_raw).unwrap_or_default();

            turns.push(ConversationTurn {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                session_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                role,
                content: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                timestamp: timestamp(row.get::<i64>(4).map_err(|e| AppError::Database(e.to_string()))?),
                agent: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
                sources,
                processing_time: row.get(7).map_err(|e| AppError::Database(e.to_string()))?,
            });
        }

        // Query returns newest-first; callers want chronological order
        turns.reverse();
        Ok(turns)
    }

    // ============== Document Operations ==============

    pub async fn create_document(&self, doc: &DocumentRecord) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO documents
             (id, user_id, file_name, file_path, file_type, file_size_bytes,
              extraction_method, status, chunk_count, error, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                doc.id.as_str(),
                doc.user_id.as_str(),
                doc.file_name.as_str(),
                doc.file_path.as_str(),
                doc.file_type.as_str(),
                doc.file_size_bytes,
                doc.extraction_method.as_str(),
                doc.status.as_str(),
                doc.chunk_count,
                doc.error.as_deref(),
                doc.created_at.timestamp(),
            ),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create document: {}", e)))?;

        self.bump_user_counter(&doc.user_id, "total_documents")
            .await?;
        Ok(())
    }

    pub async fn set_document_status(&self, id: &str, status: DocumentStatus) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "UPDATE documents SET status = ? WHERE id = ?",
            (status.as_str(), id),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to update document status: {}", e)))?;

        Ok(())
    }

    /// Mark a document done with its final chunk count and extraction method.
    pub async fn finish_document(
        &self,
        id: &str,
        chunk_count: usize,
        extraction_method: &str,
    ) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "UPDATE documents SET status = 'done', chunk_count = ?, extraction_method = ?
             WHERE id = ?",
            (chunk_count as i64, extraction_method, id),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to finish document: {}", e)))?;

        Ok(())
    }

    pub async fn fail_document(&self, id: &str, error: &str) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "UPDATE documents SET status = 'failed', error = ? WHERE id = ?",
            (error, id),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to mark document failed: {}", e)))?;

        Ok(())
    }

    pub async fn get_document(&self, id: &str) -> Result<Option<DocumentRecord>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, user_id, file_name, file_path, file_type, file_size_bytes,
                        extraction_method, status, chunk_count, error, created_at
                 FROM documents WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query document: {}", e)))?;

        match next_row(&mut rows).await? {
            Some(row) => Ok(Some(document_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_documents(&self, user_id: &str, limit: usize) -> Result<Vec<DocumentRecord>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, user_id, file_name, file_path, file_type, file_size_bytes,
                        extraction_method, status, chunk_count, error, created_at
                 FROM documents WHERE user_id = ?
                 ORDER BY created_at DESC LIMIT ?",
                (user_id, limit as i64),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query documents: {}", e)))?;

        let mut documents = Vec::new();
        while let Some(row) = next_row(&mut rows).await? {
            documents.push(document_from_row(&row)?);
        }
        Ok(documents)
    }

    pub async fn delete_document(&self, id: &str) -> Result<()> {
        let conn = self.connection()?;

        conn.execute("DELETE FROM documents WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete document: {}", e)))?;

        Ok(())
    }
}

// ============== Row Helpers ==============

async fn next_row(rows: &mut libsql::Rows) -> Result<Option<libsql::Row>> {
    rows.next()
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

fn timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}

fn session_from_row(row: &libsql::Row) -> Result<Session> {
    Ok(Session {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        user_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        title: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: timestamp(row.get::<i64>(3).map_err(|e| AppError::Database(e.to_string()))?),
        updated_at: timestamp(row.get::<i64>(4).map_err(|e| AppError::Database(e.to_string()))?),
        is_active: row.get::<i64>(5).map_err(|e| AppError::Database(e.to_string()))? != 0,
        message_count: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
    })
}

fn document_from_row(row: &libsql::Row) -> Result<DocumentRecord> {
    let status_raw: String = row.get(7).map_err(|e| AppError::Database(e.to_string()))?;

    Ok(DocumentRecord {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        user_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        file_name: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        file_path: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        file_type: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
        file_size_bytes: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
        extraction_method: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
        status: DocumentStatus::from_str(&status_raw)?,
        chunk_count: row.get(8).map_err(|e| AppError::Database(e.to_string()))?,
        error: row.get::<Option<String>>(9).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: timestamp(row.get::<i64>(10).map_err(|e| AppError::Database(e.to_string()))?),
    })
}
