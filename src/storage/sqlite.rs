//! SQLite posting store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{
    Connection, ErrorCode, OptionalExtension, Row, Transaction, TransactionBehavior, params,
    params_from_iter,
};

use crate::error::{AppError, Result};
use crate::models::{Candidate, Posting, Status};
use crate::storage::ListFilter;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS postings (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id TEXT UNIQUE,
    author      TEXT,
    body        TEXT NOT NULL,
    body_hash   TEXT NOT NULL,
    inserted_at TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    applied_at  TEXT,
    status      TEXT NOT NULL DEFAULT 'new'
);
CREATE INDEX IF NOT EXISTS idx_postings_author ON postings (author);
CREATE INDEX IF NOT EXISTS idx_postings_status ON postings (status);
";

const COLUMNS: &str =
    "id, external_id, author, body, body_hash, inserted_at, updated_at, applied_at, status";

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: AppError| FromSqlError::Other(Box::new(e)))
    }
}

/// Posting store backed by a single SQLite connection.
pub struct PostingStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl PostingStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let existed = path.exists();
        let conn = Connection::open(path)?;
        let store = Self::init(conn, Some(path.to_path_buf()))?;

        if existed {
            log::debug!("Opened posting store at {}", path.display());
        } else {
            log::info!("Created posting store at {}", path.display());
        }
        Ok(store)
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    /// Database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Fetch a posting by local id.
    pub fn get(&self, id: i64) -> Result<Option<Posting>> {
        let sql = format!("SELECT {COLUMNS} FROM postings WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], row_to_posting)
            .optional()?)
    }

    /// Fetch a posting by its source comment id.
    pub fn find_by_external_id(&self, external_id: &str) -> Result<Option<Posting>> {
        let sql = format!("SELECT {COLUMNS} FROM postings WHERE external_id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![external_id], row_to_posting)
            .optional()?)
    }

    /// Insert a new posting with status `new`. Returns the assigned id.
    pub fn insert(&self, candidate: &Candidate, now: DateTime<Utc>) -> Result<i64> {
        let result = self.conn.execute(
            "INSERT INTO postings (external_id, author, body, body_hash, inserted_at, updated_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6)",
            params![
                candidate.external_id,
                candidate.author,
                candidate.body,
                candidate.body_hash(),
                now,
                Status::New,
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
                    && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(AppError::DuplicateExternalId(
                    candidate.external_id.clone().unwrap_or_default(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the body of an existing posting. Author and status are kept.
    pub fn update_body(&self, id: i64, body: &str, body_hash: &str, now: DateTime<Utc>) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE postings SET body = ?1, body_hash = ?2, updated_at = ?3 WHERE id = ?4",
            params![body, body_hash, now, id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound { id });
        }
        Ok(())
    }

    /// Write a status change. `applied_at` is stamped only the first time a
    /// posting becomes `applied`. Returns false when the id is unknown.
    pub fn set_status(&self, id: i64, status: Status, now: DateTime<Utc>) -> Result<bool> {
        let changed = if status == Status::Applied {
            self.conn.execute(
                "UPDATE postings
                 SET status = ?1, updated_at = ?2, applied_at = COALESCE(applied_at, ?2)
                 WHERE id = ?3",
                params![status, now, id],
            )?
        } else {
            self.conn.execute(
                "UPDATE postings SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status, now, id],
            )?
        };
        Ok(changed > 0)
    }

    /// List postings matching every predicate in `filter`, in id order.
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Posting>> {
        let mut clauses = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            args.push(status.as_str().to_string());
            clauses.push(format!("status = ?{}", args.len()));
        }
        if let Some(search) = &filter.search {
            args.push(format!("%{}%", escape_like(search)));
            clauses.push(format!("body LIKE ?{} ESCAPE '\\'", args.len()));
        }
        if let Some(author) = &filter.author {
            args.push(author.clone());
            clauses.push(format!("author = ?{}", args.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!("SELECT {COLUMNS} FROM postings {where_clause} ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), row_to_posting)?;
        let mut postings = Vec::new();
        for row in rows {
            postings.push(row?);
        }
        Ok(postings)
    }

    /// Ids of `new` postings whose author has another posting that is
    /// already resolved.
    pub fn discard_candidates(&self) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id
             FROM postings p
             WHERE p.status = ?1
               AND p.author IS NOT NULL
               AND p.author != ''
               AND EXISTS (
                   SELECT 1
                   FROM postings o
                   WHERE o.author = p.author
                     AND o.id != p.id
                     AND o.status != ?1
               )
             ORDER BY p.id",
        )?;
        let rows = stmt.query_map(params![Status::New], |row| row.get::<_, i64>(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    /// Number of postings per status, covering the whole vocabulary.
    pub fn status_counts(&self) -> Result<Vec<(Status, usize)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM postings GROUP BY status")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, Status>(0)?, row.get::<_, i64>(1)?)))?;

        let mut counts: Vec<(Status, usize)> = Status::ALL.iter().map(|s| (*s, 0)).collect();
        for row in rows {
            let (status, count) = row?;
            if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == status) {
                entry.1 = usize::try_from(count).unwrap_or_default();
            }
        }
        Ok(counts)
    }

    /// Total number of postings.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM postings", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Run `f` while holding the database write lock.
    ///
    /// Everything `f` wrote is committed when it returns `Ok`. The guard
    /// rolls back when `f` fails, panics, or the commit itself fails, so
    /// the connection never stays inside a transaction. Calls do not nest.
    pub fn exclusive<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }
}

fn row_to_posting(row: &Row<'_>) -> rusqlite::Result<Posting> {
    Ok(Posting {
        id: row.get(0)?,
        external_id: row.get(1)?,
        author: row.get(2)?,
        body: row.get(3)?,
        body_hash: row.get(4)?,
        inserted_at: row.get(5)?,
        updated_at: row.get(6)?,
        applied_at: row.get(7)?,
        status: row.get(8)?,
    })
}

/// Escape `LIKE` wildcards so the search text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 16, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn candidate(external_id: Option<&str>, author: Option<&str>, body: &str) -> Candidate {
        Candidate {
            body: body.to_string(),
            author: author.map(str::to_string),
            external_id: external_id.map(str::to_string),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = PostingStore::open_in_memory().unwrap();
        let id = store
            .insert(&candidate(Some("100"), Some("alice"), "Acme | Rust | Remote"), ts(0))
            .unwrap();

        let posting = store.get(id).unwrap().unwrap();
        assert_eq!(posting.external_id.as_deref(), Some("100"));
        assert_eq!(posting.author.as_deref(), Some("alice"));
        assert_eq!(posting.status, Status::New);
        assert_eq!(posting.inserted_at, ts(0));
        assert_eq!(posting.updated_at, ts(0));
        assert!(posting.applied_at.is_none());
        assert_eq!(posting.body_hash, crate::models::hash_body("Acme | Rust | Remote"));
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = PostingStore::open_in_memory().unwrap();
        assert!(store.get(999).unwrap().is_none());
    }

    #[test]
    fn test_ids_are_sequential() {
        let store = PostingStore::open_in_memory().unwrap();
        let first = store.insert(&candidate(Some("1"), None, "a"), ts(0)).unwrap();
        let second = store.insert(&candidate(Some("2"), None, "b"), ts(0)).unwrap();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_duplicate_external_id_rejected() {
        let store = PostingStore::open_in_memory().unwrap();
        store.insert(&candidate(Some("100"), None, "a"), ts(0)).unwrap();

        let err = store
            .insert(&candidate(Some("100"), None, "b"), ts(1))
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateExternalId(ref id) if id == "100"));
    }

    #[test]
    fn test_missing_external_ids_do_not_collide() {
        let store = PostingStore::open_in_memory().unwrap();
        store.insert(&candidate(None, None, "a"), ts(0)).unwrap();
        store.insert(&candidate(None, None, "a"), ts(0)).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_set_status_keeps_first_applied_at() {
        let store = PostingStore::open_in_memory().unwrap();
        let id = store.insert(&candidate(Some("1"), None, "a"), ts(0)).unwrap();

        assert!(store.set_status(id, Status::Applied, ts(10)).unwrap());
        assert!(store.set_status(id, Status::RejectedPre, ts(20)).unwrap());
        assert!(store.set_status(id, Status::Applied, ts(30)).unwrap());

        let posting = store.get(id).unwrap().unwrap();
        assert_eq!(posting.status, Status::Applied);
        assert_eq!(posting.applied_at, Some(ts(10)));
        assert_eq!(posting.updated_at, ts(30));
    }

    #[test]
    fn test_set_status_unknown_id() {
        let store = PostingStore::open_in_memory().unwrap();
        assert!(!store.set_status(42, Status::Discarded, ts(0)).unwrap());
    }

    #[test]
    fn test_update_body_leaves_status_and_author() {
        let store = PostingStore::open_in_memory().unwrap();
        let id = store
            .insert(&candidate(Some("1"), Some("bob"), "old"), ts(0))
            .unwrap();
        store.set_status(id, Status::Interviewed, ts(5)).unwrap();

        store
            .update_body(id, "new", &crate::models::hash_body("new"), ts(9))
            .unwrap();

        let posting = store.get(id).unwrap().unwrap();
        assert_eq!(posting.body, "new");
        assert_eq!(posting.author.as_deref(), Some("bob"));
        assert_eq!(posting.status, Status::Interviewed);
        assert_eq!(posting.inserted_at, ts(0));
        assert_eq!(posting.updated_at, ts(9));
    }

    #[test]
    fn test_update_body_unknown_id() {
        let store = PostingStore::open_in_memory().unwrap();
        let err = store.update_body(5, "x", "h", ts(0)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_filters_are_anded() {
        let store = PostingStore::open_in_memory().unwrap();
        let a = store
            .insert(&candidate(Some("1"), Some("x"), "Rust engineer | Remote"), ts(0))
            .unwrap();
        let b = store
            .insert(&candidate(Some("2"), Some("y"), "Go engineer | Onsite"), ts(0))
            .unwrap();
        let c = store
            .insert(&candidate(Some("3"), Some("x"), "rust intern | Onsite"), ts(0))
            .unwrap();
        store.set_status(b, Status::Applied, ts(1)).unwrap();

        let all = store.list(&ListFilter::all()).unwrap();
        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![a, b, c]);

        let rust = store.list(&ListFilter::all().with_search("RUST")).unwrap();
        assert_eq!(rust.iter().map(|p| p.id).collect::<Vec<_>>(), vec![a, c]);

        let new_onsite = store
            .list(&ListFilter::all().with_status(Status::New).with_search("Onsite"))
            .unwrap();
        assert_eq!(new_onsite.iter().map(|p| p.id).collect::<Vec<_>>(), vec![c]);

        let by_x = store.list(&ListFilter::all().with_author("x")).unwrap();
        assert_eq!(by_x.len(), 2);

        let none = store
            .list(&ListFilter::all().with_status(Status::Interviewed))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_search_wildcards_are_literal() {
        let store = PostingStore::open_in_memory().unwrap();
        store.insert(&candidate(Some("1"), None, "100% remote"), ts(0)).unwrap();
        store.insert(&candidate(Some("2"), None, "1000 remote"), ts(0)).unwrap();
        store.insert(&candidate(Some("3"), None, "snake_case"), ts(0)).unwrap();
        store.insert(&candidate(Some("4"), None, "snakeXcase"), ts(0)).unwrap();

        assert_eq!(store.list(&ListFilter::all().with_search("0%")).unwrap().len(), 1);
        assert_eq!(store.list(&ListFilter::all().with_search("e_c")).unwrap().len(), 1);
    }

    #[test]
    fn test_discard_candidates_query() {
        let store = PostingStore::open_in_memory().unwrap();
        let a = store.insert(&candidate(Some("1"), Some("x"), "a"), ts(0)).unwrap();
        let b = store.insert(&candidate(Some("2"), Some("x"), "b"), ts(0)).unwrap();
        let _c = store.insert(&candidate(Some("3"), Some("y"), "c"), ts(0)).unwrap();
        let d = store.insert(&candidate(Some("4"), Some(""), "d"), ts(0)).unwrap();
        let _e = store.insert(&candidate(Some("5"), Some(""), "e"), ts(0)).unwrap();
        store.set_status(b, Status::Applied, ts(1)).unwrap();
        store.set_status(d, Status::Discarded, ts(1)).unwrap();

        assert_eq!(store.discard_candidates().unwrap(), vec![a]);
    }

    #[test]
    fn test_status_counts_cover_vocabulary() {
        let store = PostingStore::open_in_memory().unwrap();
        let a = store.insert(&candidate(Some("1"), None, "a"), ts(0)).unwrap();
        store.insert(&candidate(Some("2"), None, "b"), ts(0)).unwrap();
        store.set_status(a, Status::RejectedPost, ts(1)).unwrap();

        let counts = store.status_counts().unwrap();
        assert_eq!(counts.len(), Status::ALL.len());
        assert!(counts.contains(&(Status::New, 1)));
        assert!(counts.contains(&(Status::RejectedPost, 1)));
        assert!(counts.contains(&(Status::Applied, 0)));
    }

    #[test]
    fn test_unknown_stored_status_is_decode_error() {
        let store = PostingStore::open_in_memory().unwrap();
        let id = store.insert(&candidate(Some("1"), None, "a"), ts(0)).unwrap();
        store
            .connection()
            .execute("UPDATE postings SET status = 'archived' WHERE id = ?1", params![id])
            .unwrap();

        assert!(store.get(id).is_err());
    }

    #[test]
    fn test_exclusive_commits_and_rolls_back() {
        let store = PostingStore::open_in_memory().unwrap();

        store
            .exclusive(|s| s.insert(&candidate(Some("1"), None, "kept"), ts(0)))
            .unwrap();
        let failed: Result<()> = store.exclusive(|s| {
            s.insert(&candidate(Some("2"), None, "dropped"), ts(0))?;
            Err(AppError::validation("abort"))
        });

        assert!(failed.is_err());
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.find_by_external_id("2").unwrap().is_none());
    }

    #[test]
    fn test_exclusive_recovers_from_failed_commit() {
        let store = PostingStore::open_in_memory().unwrap();
        store
            .connection()
            .execute_batch(
                "PRAGMA foreign_keys = ON;
                 CREATE TABLE notes (
                     posting_id INTEGER REFERENCES postings (id) DEFERRABLE INITIALLY DEFERRED
                 );",
            )
            .unwrap();

        let failed = store.exclusive(|s| {
            s.insert(&candidate(Some("1"), None, "dropped"), ts(0))?;
            s.connection().execute("INSERT INTO notes VALUES (999)", [])?;
            Ok(())
        });

        assert!(failed.is_err());
        assert!(store.connection().is_autocommit());
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.exclusive(|_| Ok(())).is_ok());
    }

    #[test]
    fn test_exclusive_rolls_back_on_panic() {
        let store = PostingStore::open_in_memory().unwrap();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.exclusive(|s| -> Result<()> {
                s.insert(&candidate(Some("1"), None, "dropped"), ts(0))?;
                panic!("writer crashed");
            })
        }));

        assert!(outcome.is_err());
        assert!(store.connection().is_autocommit());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_exclusive_does_not_nest() {
        let store = PostingStore::open_in_memory().unwrap();
        let nested = store.exclusive(|s| s.exclusive(|_| Ok(())));
        assert!(nested.is_err());

        // The outer lock is released after the failure.
        assert!(store.exclusive(|_| Ok(())).is_ok());
    }

    #[test]
    fn test_open_creates_file_and_reopens() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("jobs.db");

        {
            let store = PostingStore::open(&path).unwrap();
            store.insert(&candidate(Some("1"), None, "a"), ts(0)).unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
        }

        let store = PostingStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.find_by_external_id("1").unwrap().is_some());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
    }
}
