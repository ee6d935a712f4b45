//! Builds scratch libraries for tests. photometa itself only ever opens a
//! library read-only.

use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use super::schema::SCHEMA;
use super::sqlite::{Library, DATE_FORMAT};

/// Columns of the photos table needed to add a new asset.
#[derive(Debug, Clone, Default)]
pub struct NewPhoto<'a> {
    pub uuid: &'a str,
    pub filename: &'a str,
    pub original_filename: &'a str,
    pub path: Option<&'a Path>,
    pub path_edited: Option<&'a Path>,
    pub is_missing: bool,
    pub has_adjustments: bool,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub date_created: Option<NaiveDateTime>,
}

impl Library {
    /// Create a library file with an empty schema.
    pub fn create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn add_photo(&self, photo: &NewPhoto<'_>) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO photos (uuid, filename, original_filename, path, path_edited,
                                is_missing, has_adjustments, title, description, date_created)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            rusqlite::params![
                photo.uuid,
                photo.filename,
                photo.original_filename,
                photo.path.map(|p| p.to_string_lossy().to_string()),
                photo.path_edited.map(|p| p.to_string_lossy().to_string()),
                photo.is_missing as i64,
                photo.has_adjustments as i64,
                photo.title,
                photo.description,
                photo.date_created.map(|d| d.format(DATE_FORMAT).to_string()),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn add_keyword(&self, photo_id: i64, keyword: &str) -> Result<()> {
        let keyword_id = self.find_or_create("keywords", keyword)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO photo_keywords (photo_id, keyword_id) VALUES (?, ?)",
            rusqlite::params![photo_id, keyword_id],
        )?;
        Ok(())
    }

    /// Record a face on a photo; `None` leaves it unassigned.
    pub fn add_face(&self, photo_id: i64, person: Option<&str>) -> Result<()> {
        let person_id = match person {
            Some(name) => Some(self.find_or_create("people", name)?),
            None => None,
        };
        self.conn.execute(
            "INSERT INTO faces (photo_id, person_id) VALUES (?, ?)",
            rusqlite::params![photo_id, person_id],
        )?;
        Ok(())
    }

    pub fn add_to_album(&self, photo_id: i64, album: &str) -> Result<()> {
        let album_id = self.find_or_create("albums", album)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO album_photos (album_id, photo_id) VALUES (?, ?)",
            rusqlite::params![album_id, photo_id],
        )?;
        Ok(())
    }

    fn find_or_create(&self, table: &str, name: &str) -> Result<i64> {
        let existing = self
            .conn
            .query_row(
                &format!("SELECT id FROM {} WHERE name = ?", table),
                [name],
                |row| row.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => Ok(id),
            None => {
                self.conn
                    .execute(&format!("INSERT INTO {} (name) VALUES (?)", table), [name])?;
                Ok(self.conn.last_insert_rowid())
            }
        }
    }
}
