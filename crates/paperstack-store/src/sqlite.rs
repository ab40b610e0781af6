// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document store backed by SQLite.
//
// Document metadata lives in `documents`; page bytes live in `pages`, keyed
// by (document, index) so capture order is stored explicitly. Deleting a
// document cascades to its pages.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument};

use paperstack_core::error::{PaperstackError, Result};
use paperstack_core::{Document, DocumentId, ImageData, SortOrder};

use crate::store::DocumentStore;

/// SQLite schema for documents and their pages.
const CREATE_TABLES_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        date TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS pages (
        document_id TEXT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
        page_index INTEGER NOT NULL,
        bytes BLOB NOT NULL,
        PRIMARY KEY (document_id, page_index)
    );
    CREATE INDEX IF NOT EXISTS documents_by_date ON documents(date);
"#;

/// Convert a `rusqlite::Error` into a `PaperstackError::Database` with context.
fn db_err(context: &'static str) -> impl Fn(rusqlite::Error) -> PaperstackError {
    move |e| PaperstackError::Database(format!("{context}: {e}"))
}

/// Fixed-width UTC timestamp, so text order is chronological order.
fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Document store over a single SQLite connection.
///
/// All methods are synchronous; the app calls them from its UI thread.
pub struct SqliteDocumentStore {
    /// The open SQLite connection.
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Open (or create) the document database at the given path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db_err("open"))?;

        // WAL survives unclean shutdowns more gracefully on mobile.
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(db_err("WAL pragma"))?;

        let store = Self::with_connection(conn)?;
        info!("document database opened");
        Ok(store)
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err("open in-memory"))?;
        let store = Self::with_connection(conn)?;
        debug!("in-memory document database opened");
        Ok(store)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(db_err("foreign_keys pragma"))?;
        conn.execute_batch(CREATE_TABLES_SQL)
            .map_err(db_err("create tables"))?;
        Ok(Self { conn })
    }

    /// Load the pages of one document in capture order.
    fn load_pages(&self, id: &str) -> Result<Vec<ImageData>> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT bytes FROM pages WHERE document_id = ?1 ORDER BY page_index ASC",
            )
            .map_err(db_err("prepare load_pages"))?;

        let pages = stmt
            .query_map(params![id], |row| row.get::<_, Vec<u8>>(0))
            .map_err(db_err("query load_pages"))?
            .map(|bytes| bytes.map(ImageData::new))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_err("collect pages"))?;

        Ok(pages)
    }

    fn assemble(&self, header: DocumentHeader) -> Result<Document> {
        let pages = self.load_pages(&header.id)?;
        header.into_document(pages)
    }
}

impl DocumentStore for SqliteDocumentStore {
    #[instrument(skip(self))]
    fn fetch_all(&self, order: SortOrder) -> Result<Vec<Document>> {
        let sql = match order {
            SortOrder::DateDescending => {
                "SELECT id, name, date FROM documents ORDER BY date DESC, rowid DESC"
            }
            SortOrder::DateAscending => {
                "SELECT id, name, date FROM documents ORDER BY date ASC, rowid ASC"
            }
        };

        let headers = {
            let mut stmt = self.conn.prepare(sql).map_err(db_err("prepare fetch_all"))?;
            stmt.query_map([], row_to_header)
                .map_err(db_err("query fetch_all"))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(db_err("collect rows"))?
        };

        let documents = headers
            .into_iter()
            .map(|header| self.assemble(header))
            .collect::<Result<Vec<_>>>()?;

        debug!(count = documents.len(), "fetched all documents");
        Ok(documents)
    }

    #[instrument(skip(self), fields(document_id = %id))]
    fn get(&self, id: DocumentId) -> Result<Option<Document>> {
        let header = self
            .conn
            .query_row(
                "SELECT id, name, date FROM documents WHERE id = ?1",
                params![id.to_string()],
                row_to_header,
            )
            .optional()
            .map_err(db_err("query get"))?;

        header.map(|h| self.assemble(h)).transpose()
    }

    #[instrument(skip(self, document), fields(document_id = %document.id(), pages = document.page_count()))]
    fn insert(&mut self, document: &Document) -> Result<()> {
        let id = document.id().to_string();
        let tx = self.conn.transaction().map_err(db_err("begin insert"))?;

        tx.execute(
            "INSERT INTO documents (id, name, date) VALUES (?1, ?2, ?3)",
            params![id, document.name(), format_date(&document.date())],
        )
        .map_err(db_err("insert document"))?;

        {
            let mut stmt = tx
                .prepare("INSERT INTO pages (document_id, page_index, bytes) VALUES (?1, ?2, ?3)")
                .map_err(db_err("prepare insert page"))?;
            for (index, page) in document.pages().iter().enumerate() {
                stmt.execute(params![id, index as i64, page.bytes()])
                    .map_err(db_err("insert page"))?;
            }
        }

        tx.commit().map_err(db_err("commit insert"))?;

        info!(document_id = %document.id(), "document inserted");
        Ok(())
    }

    #[instrument(skip(self, document), fields(document_id = %document.id()))]
    fn save(&mut self, document: &Document) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE documents SET name = ?1 WHERE id = ?2",
                params![document.name(), document.id().to_string()],
            )
            .map_err(db_err("save document"))?;

        if rows == 0 {
            return Err(PaperstackError::DocumentNotFound(document.id()));
        }

        debug!(document_id = %document.id(), name = document.name(), "document saved");
        Ok(())
    }

    #[instrument(skip(self), fields(document_id = %id))]
    fn delete(&mut self, id: DocumentId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1", params![id.to_string()])
            .map_err(db_err("delete document"))?;

        info!(document_id = %id, removed = rows, "document deleted");
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(db_err("count documents"))?;
        Ok(count as usize)
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

/// The `documents` columns, before pages are attached.
struct DocumentHeader {
    id: String,
    name: String,
    date: String,
}

impl DocumentHeader {
    fn into_document(self, pages: Vec<ImageData>) -> Result<Document> {
        // A malformed stored value is surfaced as an error rather than a panic.
        let uuid = uuid::Uuid::parse_str(&self.id)
            .map_err(|e| PaperstackError::Database(format!("bad document id {}: {e}", self.id)))?;
        let date = DateTime::parse_from_rfc3339(&self.date)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| PaperstackError::Database(format!("bad document date {}: {e}", self.date)))?;

        Ok(Document::from_parts(DocumentId(uuid), self.name, pages, date))
    }
}

/// Column indices must match the SELECT order used above.
fn row_to_header(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentHeader> {
    Ok(DocumentHeader {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
    })
}
