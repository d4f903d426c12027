//! SQLite record sink
//!
//! Books and authors land in their own tables keyed by URL. Re-crawling a
//! page replaces its row. Collection fields (genres, awards, publish dates,
//! the rating histogram) are stored as JSON text.

use crate::output::traits::{OutputResult, RecordSink};
use crate::record::{Author, Book, Record};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    url TEXT PRIMARY KEY,
    title TEXT,
    author TEXT,
    num_ratings INTEGER,
    num_reviews INTEGER,
    avg_rating REAL,
    num_pages INTEGER,
    language TEXT,
    publish_dates TEXT NOT NULL,
    original_publish_year INTEGER,
    isbn TEXT,
    isbn13 TEXT,
    asin TEXT,
    series TEXT,
    awards TEXT NOT NULL,
    places TEXT NOT NULL,
    characters TEXT NOT NULL,
    genres TEXT NOT NULL,
    rating_histogram TEXT,
    scraped_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS authors (
    url TEXT PRIMARY KEY,
    name TEXT,
    birth_date TEXT,
    death_date TEXT,
    avg_rating REAL,
    num_ratings INTEGER,
    num_reviews INTEGER,
    genres TEXT NOT NULL,
    influences TEXT NOT NULL,
    about TEXT,
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_books_author ON books(author);
"#;

/// SQLite-backed record sink
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn open(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Self::with_connection(conn)
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> OutputResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> OutputResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Read access for callers that query the results
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn upsert_book(&self, book: &Book) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO books (
                url, title, author, num_ratings, num_reviews, avg_rating, num_pages,
                language, publish_dates, original_publish_year, isbn, isbn13, asin,
                series, awards, places, characters, genres, rating_histogram, scraped_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
             ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                author = excluded.author,
                num_ratings = excluded.num_ratings,
                num_reviews = excluded.num_reviews,
                avg_rating = excluded.avg_rating,
                num_pages = excluded.num_pages,
                language = excluded.language,
                publish_dates = excluded.publish_dates,
                original_publish_year = excluded.original_publish_year,
                isbn = excluded.isbn,
                isbn13 = excluded.isbn13,
                asin = excluded.asin,
                series = excluded.series,
                awards = excluded.awards,
                places = excluded.places,
                characters = excluded.characters,
                genres = excluded.genres,
                rating_histogram = excluded.rating_histogram,
                scraped_at = excluded.scraped_at",
            params![
                book.url(),
                book.title,
                book.author,
                book.num_ratings.and_then(count_column),
                book.num_reviews.and_then(count_column),
                book.avg_rating,
                book.num_pages,
                book.language,
                serde_json::to_string(&book.publish_dates)?,
                book.original_publish_year,
                book.isbn,
                book.isbn13,
                book.asin,
                book.series,
                serde_json::to_string(&book.awards)?,
                serde_json::to_string(&book.places)?,
                serde_json::to_string(&book.characters)?,
                serde_json::to_string(&book.genres)?,
                book.rating_histogram
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn upsert_author(&self, author: &Author) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO authors (
                url, name, birth_date, death_date, avg_rating, num_ratings, num_reviews,
                genres, influences, about, scraped_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(url) DO UPDATE SET
                name = excluded.name,
                birth_date = excluded.birth_date,
                death_date = excluded.death_date,
                avg_rating = excluded.avg_rating,
                num_ratings = excluded.num_ratings,
                num_reviews = excluded.num_reviews,
                genres = excluded.genres,
                influences = excluded.influences,
                about = excluded.about,
                scraped_at = excluded.scraped_at",
            params![
                author.url(),
                author.name,
                author.birth_date.map(|d| d.to_string()),
                author.death_date.map(|d| d.to_string()),
                author.avg_rating,
                author.num_ratings.and_then(count_column),
                author.num_reviews.and_then(count_column),
                serde_json::to_string(&author.genres)?,
                serde_json::to_string(&author.influences)?,
                author.about,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl RecordSink for SqliteSink {
    fn write_record(&mut self, record: &Record) -> OutputResult<()> {
        match record {
            Record::Book(book) => self.upsert_book(book),
            Record::Author(author) => self.upsert_author(author),
        }
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

/// SQLite integers are signed; a count that does not fit is stored as NULL
fn count_column(count: u64) -> Option<i64> {
    i64::try_from(count).ok()
}
