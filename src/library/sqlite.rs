//! SQLite library backend.

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use super::{NameCount, PhotoRecord, Selection};

pub(super) const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Library {
    pub(crate) conn: Connection,
}

impl Library {
    /// Open an existing library read-only.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("Library database {} does not exist", path.display());
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open library {}", path.display()))?;
        Ok(Self { conn })
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Resolve a selection to photo records, in selection order, each photo
    /// at most once.
    pub fn photos(&self, selection: &Selection) -> Result<Vec<PhotoRecord>> {
        let ids = if selection.all {
            self.ids_for("SELECT id FROM photos ORDER BY id", None)?
        } else {
            let mut ids = Vec::new();
            for album in &selection.albums {
                ids.extend(self.ids_for(
                    r#"
                    SELECT ap.photo_id
                    FROM album_photos ap
                    JOIN albums a ON a.id = ap.album_id
                    WHERE a.name = ?
                    ORDER BY ap.photo_id
                    "#,
                    Some(album),
                )?);
            }
            for uuid in &selection.uuids {
                ids.extend(self.ids_for("SELECT id FROM photos WHERE uuid = ?", Some(uuid))?);
            }
            for keyword in &selection.keywords {
                ids.extend(self.ids_for(
                    r#"
                    SELECT pk.photo_id
                    FROM photo_keywords pk
                    JOIN keywords k ON k.id = pk.keyword_id
                    WHERE k.name = ?
                    ORDER BY pk.photo_id
                    "#,
                    Some(keyword),
                )?);
            }
            for person in &selection.persons {
                ids.extend(self.ids_for(
                    r#"
                    SELECT DISTINCT f.photo_id
                    FROM faces f
                    JOIN people p ON p.id = f.person_id
                    WHERE p.name = ?
                    ORDER BY f.photo_id
                    "#,
                    Some(person),
                )?);
            }
            ids
        };

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for id in ids {
            if !seen.insert(id) {
                continue;
            }
            if let Some(record) = self.get_photo(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn ids_for(&self, sql: &str, param: Option<&str>) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare(sql)?;
        let ids = stmt
            .query_map(rusqlite::params_from_iter(param), |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    pub fn get_photo(&self, photo_id: i64) -> Result<Option<PhotoRecord>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT uuid, filename, original_filename, path, path_edited,
                       is_missing, has_adjustments, title, description, date_created
                FROM photos
                WHERE id = ?
                "#,
                [photo_id],
                |row| {
                    Ok((
                        PhotoRecord {
                            uuid: row.get(0)?,
                            filename: row.get(1)?,
                            original_filename: row.get(2)?,
                            path: row.get::<_, Option<String>>(3)?.map(PathBuf::from),
                            edited_path: row.get::<_, Option<String>>(4)?.map(PathBuf::from),
                            missing: row.get::<_, i64>(5)? != 0,
                            has_edits: row.get::<_, i64>(6)? != 0,
                            title: row.get(7)?,
                            description: row.get(8)?,
                            ..Default::default()
                        },
                        row.get::<_, Option<String>>(9)?,
                    ))
                },
            )
            .optional()?;

        let Some((mut record, date_created)) = row else {
            return Ok(None);
        };

        record.date = date_created.as_deref().and_then(parse_date);
        record.keywords = self.names_for(
            r#"
            SELECT k.name
            FROM keywords k
            JOIN photo_keywords pk ON pk.keyword_id = k.id
            WHERE pk.photo_id = ?
            "#,
            photo_id,
        )?;
        record.persons = self.names_for(
            r#"
            SELECT DISTINCT p.name
            FROM faces f
            JOIN people p ON f.person_id = p.id
            WHERE f.photo_id = ?
            "#,
            photo_id,
        )?;
        record.albums = self.names_for(
            r#"
            SELECT a.name
            FROM albums a
            JOIN album_photos ap ON ap.album_id = a.id
            WHERE ap.photo_id = ?
            "#,
            photo_id,
        )?;

        Ok(Some(record))
    }

    fn names_for(&self, sql: &str, photo_id: i64) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let names = stmt
            .query_map([photo_id], |row| row.get(0))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;
        Ok(names)
    }

    // ========================================================================
    // Listing
    // ========================================================================

    pub fn keyword_counts(&self) -> Result<Vec<NameCount>> {
        self.counts(
            r#"
            SELECT k.name, COUNT(DISTINCT pk.photo_id)
            FROM keywords k
            JOIN photo_keywords pk ON pk.keyword_id = k.id
            GROUP BY k.name
            ORDER BY k.name
            "#,
        )
    }

    pub fn person_counts(&self) -> Result<Vec<NameCount>> {
        self.counts(
            r#"
            SELECT p.name, COUNT(DISTINCT f.photo_id)
            FROM people p
            JOIN faces f ON f.person_id = p.id
            GROUP BY p.name
            ORDER BY p.name
            "#,
        )
    }

    pub fn album_counts(&self) -> Result<Vec<NameCount>> {
        self.counts(
            r#"
            SELECT a.name, COUNT(ap.photo_id)
            FROM albums a
            LEFT JOIN album_photos ap ON ap.album_id = a.id
            GROUP BY a.name
            ORDER BY a.name
            "#,
        )
    }

    fn counts(&self, sql: &str) -> Result<Vec<NameCount>> {
        let mut stmt = self.conn.prepare(sql)?;
        let counts = stmt
            .query_map([], |row| {
                Ok(NameCount {
                    name: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }
}

/// Accepts the stored format and the ISO `T` separator.
fn parse_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
