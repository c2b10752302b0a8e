use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use rusqlite_migration::{Migrations, M};
use serde::Serialize;

use crate::app::{GleanerError, Result};
use crate::domain::PostRecord;
use crate::store::PostSink;

/// A post as read back from the database
#[derive(Debug, Clone, Serialize)]
pub struct StoredPost {
    pub id: String,
    pub scraped_at: DateTime<Utc>,
    #[serde(flatten)]
    pub post: PostRecord,
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| GleanerError::Other(format!("Database migration failed: {}", e)))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            GleanerError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    pub fn count_posts(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn posts_for_keyword(&self, keyword: &str) -> Result<Vec<StoredPost>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, keyword, name, text, link, date, images, videos, scraped_at
             FROM posts WHERE keyword = ?1 ORDER BY rowid",
        )?;
        let posts = stmt
            .query_map(params![keyword], Self::row_to_post)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    pub fn all_posts(&self) -> Result<Vec<StoredPost>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, keyword, name, text, link, date, images, videos, scraped_at
             FROM posts ORDER BY rowid",
        )?;
        let posts = stmt
            .query_map([], Self::row_to_post)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn row_to_post(row: &Row<'_>) -> rusqlite::Result<StoredPost> {
        let images: String = row.get(6)?;
        let videos: String = row.get(7)?;
        Ok(StoredPost {
            id: row.get(0)?,
            scraped_at: row
                .get::<_, String>(8)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
            post: PostRecord {
                keyword: row.get(1)?,
                name: row.get(2)?,
                text: row.get(3)?,
                link: row.get(4)?,
                date: row.get(5)?,
                images: serde_json::from_str(&images).unwrap_or_default(),
                videos: serde_json::from_str(&videos).unwrap_or_default(),
            },
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

impl PostSink for SqliteStore {
    fn append(&self, records: &[PostRecord]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let scraped_at = Utc::now().to_rfc3339();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO posts (id, keyword, name, text, link, date, images, videos, scraped_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.id(),
                    record.keyword,
                    record.name,
                    record.text,
                    record.link,
                    record.date,
                    serde_json::to_string(&record.images)?,
                    serde_json::to_string(&record.videos)?,
                    scraped_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(records.len())
    }
}
