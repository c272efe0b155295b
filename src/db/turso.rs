use crate::db::traits::{NoteStore, UserStore};
use crate::types::{
    Account, AccountId, AppError, NewAccount, NewNote, Note, NoteId, NoteUpdate, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database, Row};

/// libsql-backed implementation of both store contracts.
pub struct TursoClient {
    db: Database,
    /// Every `:memory:` connection is a separate database, so in-memory
    /// clients funnel all operations through one connection.
    shared: Option<Connection>,
}

impl TursoClient {
    /// In-memory database, schema initialized. Used for tests and ephemeral runs.
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to open in-memory database: {}", e))
            })?;
        let shared = db
            .connect()
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to get connection: {}", e)))?;

        let client = Self {
            db,
            shared: Some(shared),
        };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// File-backed SQLite database. Parent directories are created as needed.
    pub async fn new_local(path: &str) -> Result<Self> {
        if path == ":memory:" {
            return Self::new_memory().await;
        }

        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let db = Builder::new_local(path).build().await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to open database {}: {}", path, e))
        })?;

        let client = Self { db, shared: None };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// Remote Turso database.
    #[cfg(feature = "turso")]
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to connect to Turso: {}", e)))?;

        let client = Self { db, shared: None };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// A connection scoped to a single store operation.
    pub fn connection(&self) -> Result<Connection> {
        if let Some(conn) = &self.shared {
            return Ok(conn.clone());
        }

        self.db
            .connect()
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to get connection: {}", e)))
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| store_error("Failed to create users table", e))?;

        // Notes table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| store_error("Failed to create notes table", e))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_owner_created
             ON notes (user_id, created_at DESC)",
            (),
        )
        .await
        .map_err(|e| store_error("Failed to create notes index", e))?;

        Ok(())
    }
}

// ============== Row mapping ==============

fn store_error(context: &str, e: libsql::Error) -> AppError {
    match e {
        libsql::Error::ConnectionFailed(msg) => {
            AppError::StoreUnavailable(format!("{}: {}", context, msg))
        }
        other => AppError::Database(format!("{}: {}", context, other)),
    }
}

fn row_error(e: libsql::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::Database(format!("Invalid timestamp: {}", millis)))
}

fn account_from_row(row: &Row) -> Result<Account> {
    Ok(Account {
        id: AccountId(row.get::<i64>(0).map_err(row_error)?),
        name: row.get::<String>(1).map_err(row_error)?,
        email: row.get::<String>(2).map_err(row_error)?,
        password_hash: row.get::<String>(3).map_err(row_error)?,
        created_at: timestamp(row.get::<i64>(4).map_err(row_error)?)?,
    })
}

fn note_from_row(row: &Row) -> Result<Note> {
    let updated_at = row.get::<Option<i64>>(5).map_err(row_error)?;

    Ok(Note {
        id: NoteId(row.get::<i64>(0).map_err(row_error)?),
        user_id: AccountId(row.get::<i64>(1).map_err(row_error)?),
        title: row.get::<String>(2).map_err(row_error)?,
        content: row.get::<String>(3).map_err(row_error)?,
        created_at: timestamp(row.get::<i64>(4).map_err(row_error)?)?,
        updated_at: updated_at.map(timestamp).transpose()?,
    })
}

fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

// ============== UserStore ==============

#[async_trait]
impl UserStore for TursoClient {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT 1 FROM users WHERE email = ? COLLATE NOCASE", [email])
            .await
            .map_err(|e| store_error("Failed to check email", e))?;

        Ok(rows
            .next()
            .await
            .map_err(row_error)?
            .is_some())
    }

    async fn create_account(&self, account: &NewAccount) -> Result<Account> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "INSERT INTO users (name, email, password_hash, created_at)
                 VALUES (?, ?, ?, ?)
                 RETURNING id",
                (
                    account.name.as_str(),
                    account.email.as_str(),
                    account.password_hash.as_str(),
                    account.created_at.timestamp_millis(),
                ),
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::DuplicateEmail
                } else {
                    store_error("Failed to create user", e)
                }
            })?;

        let row = rows
            .next()
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::DuplicateEmail
                } else {
                    AppError::Database(e.to_string())
                }
            })?
            .ok_or_else(|| AppError::Database("Insert returned no id".to_string()))?;

        Ok(Account {
            id: AccountId(row.get::<i64>(0).map_err(row_error)?),
            name: account.name.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            created_at: account.created_at,
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, name, email, password_hash, created_at
                 FROM users WHERE email = ? COLLATE NOCASE",
                [email],
            )
            .await
            .map_err(|e| store_error("Failed to query user", e))?;

        match rows
            .next()
            .await
            .map_err(row_error)?
        {
            Some(row) => Ok(Some(account_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

// ============== NoteStore ==============

#[async_trait]
impl NoteStore for TursoClient {
    async fn list_by_owner(&self, owner: AccountId) -> Result<Vec<Note>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, user_id, title, content, created_at, updated_at
                 FROM notes
                 WHERE user_id = ?
                 ORDER BY created_at DESC, id DESC",
                [owner.0],
            )
            .await
            .map_err(|e| store_error("Failed to query notes", e))?;

        let mut notes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(row_error)?
        {
            notes.push(note_from_row(&row)?);
        }

        Ok(notes)
    }

    async fn get_by_id_and_owner(&self, id: NoteId, owner: AccountId) -> Result<Option<Note>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, user_id, title, content, created_at, updated_at
                 FROM notes
                 WHERE id = ? AND user_id = ?",
                [id.0, owner.0],
            )
            .await
            .map_err(|e| store_error("Failed to query note", e))?;

        match rows
            .next()
            .await
            .map_err(row_error)?
        {
            Some(row) => Ok(Some(note_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_note(&self, note: &NewNote) -> Result<NoteId> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "INSERT INTO notes (user_id, title, content, created_at)
                 VALUES (?, ?, ?, ?)
                 RETURNING id",
                (
                    note.owner.0,
                    note.title.as_str(),
                    note.content.as_str(),
                    note.created_at.timestamp_millis(),
                ),
            )
            .await
            .map_err(|e| store_error("Failed to create note", e))?;

        let row = rows
            .next()
            .await
            .map_err(row_error)?
            .ok_or_else(|| AppError::Database("Insert returned no id".to_string()))?;

        Ok(NoteId(row.get::<i64>(0).map_err(row_error)?))
    }

    async fn update_by_id_and_owner(&self, update: &NoteUpdate) -> Result<bool> {
        let conn = self.connection()?;

        let changed = conn
            .execute(
                "UPDATE notes
                 SET title = ?, content = ?, updated_at = ?
                 WHERE id = ? AND user_id = ?",
                (
                    update.title.as_str(),
                    update.content.as_str(),
                    update.updated_at.timestamp_millis(),
                    update.id.0,
                    update.owner.0,
                ),
            )
            .await
            .map_err(|e| store_error("Failed to update note", e))?;

        Ok(changed > 0)
    }

    async fn delete_by_id_and_owner(&self, id: NoteId, owner: AccountId) -> Result<bool> {
        let conn = self.connection()?;

        let removed = conn
            .execute(
                "DELETE FROM notes WHERE id = ? AND user_id = ?",
                [id.0, owner.0],
            )
            .await
            .map_err(|e| store_error("Failed to delete note", e))?;

        Ok(removed > 0)
    }
}
