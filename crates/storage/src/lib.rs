//! Sqlite-backed persistence for viewer position, settings, and bookmarks.
//!
//! Loads substitute defaults for anything missing or malformed; a stale or
//! hand-edited database must never keep the viewer from starting.

use std::path::Path;

use anyhow::Context as _;
use rusqlite::{Connection, OptionalExtension as _};
use varak_application::ViewerStore;
use varak_core::{Bookmark, FlipSpeed, Settings, Theme};

#[derive(Debug)]
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("open sqlite db at {}", path.as_ref().display()))?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    /// Throwaway database for tests.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    fn migrate(&self) -> anyhow::Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS viewer_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                current_slot INTEGER NOT NULL
            );
            INSERT OR IGNORE INTO viewer_state (id, current_slot) VALUES (1, 0);

            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                theme TEXT NOT NULL,
                flip_speed TEXT NOT NULL,
                zoom REAL NOT NULL,
                autoplay_enabled INTEGER NOT NULL,
                autoplay_interval_ms INTEGER NOT NULL
            );
            INSERT OR IGNORE INTO settings
                (id, theme, flip_speed, zoom, autoplay_enabled, autoplay_interval_ms)
            VALUES (1, 'light', 'normal', 1.0, 0, 5000);

            CREATE TABLE IF NOT EXISTS bookmarks (
                id TEXT PRIMARY KEY,
                page_number INTEGER NOT NULL,
                section_name TEXT NOT NULL,
                created_at INTEGER NOT NULL DEFAULT (unixepoch())
            );
            "#,
        )?;

        match self
            .conn
            .execute("ALTER TABLE bookmarks ADD COLUMN note TEXT", [])
        {
            Ok(_) => {}
            Err(err) => {
                let msg = err.to_string();
                if !msg.contains("duplicate column name") {
                    return Err(err).context("add bookmarks.note column");
                }
            }
        }

        Ok(())
    }
}

impl ViewerStore for Storage {
    fn load_slot(&self) -> anyhow::Result<usize> {
        let slot: Option<i64> = self
            .conn
            .query_row("SELECT current_slot FROM viewer_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(slot.and_then(|value| usize::try_from(value).ok()).unwrap_or(0))
    }

    fn save_slot(&self, slot: usize) -> anyhow::Result<()> {
        self.conn.execute(
            "UPDATE viewer_state SET current_slot = ? WHERE id = 1",
            [slot as i64],
        )?;
        Ok(())
    }

    fn load_settings(&self) -> anyhow::Result<Settings> {
        let row = self
            .conn
            .query_row(
                "SELECT theme, flip_speed, zoom, autoplay_enabled, autoplay_interval_ms
                 FROM settings WHERE id = 1",
                [],
                |row| {
                    let theme: String = row.get(0)?;
                    let flip_speed: String = row.get(1)?;
                    let zoom: f64 = row.get(2)?;
                    let autoplay_enabled: i64 = row.get(3)?;
                    let autoplay_interval_ms: i64 = row.get(4)?;
                    Ok((theme, flip_speed, zoom, autoplay_enabled, autoplay_interval_ms))
                },
            )
            .optional()?;

        let defaults = Settings::default();
        let Some((theme, flip_speed, zoom, autoplay_enabled, autoplay_interval_ms)) = row else {
            return Ok(defaults);
        };

        let mut settings = Settings {
            theme: theme.parse::<Theme>().unwrap_or(defaults.theme),
            flip_speed: flip_speed
                .parse::<FlipSpeed>()
                .unwrap_or(defaults.flip_speed),
            zoom: zoom as f32,
            autoplay_enabled: autoplay_enabled != 0,
            autoplay_interval_ms: u64::try_from(autoplay_interval_ms)
                .unwrap_or(defaults.autoplay_interval_ms),
        };
        settings.normalize();
        Ok(settings)
    }

    fn save_settings(&self, settings: &Settings) -> anyhow::Result<()> {
        let mut settings = settings.clone();
        settings.normalize();
        self.conn.execute(
            "UPDATE settings
             SET theme = ?, flip_speed = ?, zoom = ?, autoplay_enabled = ?, autoplay_interval_ms = ?
             WHERE id = 1",
            (
                settings.theme.as_str(),
                settings.flip_speed.as_str(),
                settings.zoom as f64,
                settings.autoplay_enabled as i64,
                settings.autoplay_interval_ms as i64,
            ),
        )?;
        Ok(())
    }

    fn load_bookmarks(&self) -> anyhow::Result<Vec<Bookmark>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, page_number, section_name, note, created_at
             FROM bookmarks ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map([], |row| {
            let page_number: i64 = row.get(1)?;
            Ok(Bookmark {
                id: row.get(0)?,
                page_number: u32::try_from(page_number).unwrap_or(1),
                section_name: row.get(2)?,
                note: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn add_bookmark(&self, bookmark: &Bookmark) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO bookmarks (id, page_number, section_name, note, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                &bookmark.id,
                bookmark.page_number as i64,
                &bookmark.section_name,
                &bookmark.note,
                bookmark.created_at,
            ),
        )?;
        Ok(())
    }

    fn remove_bookmark(&self, id: &str) -> anyhow::Result<()> {
        self.conn
            .execute("DELETE FROM bookmarks WHERE id = ?", [id])?;
        Ok(())
    }
}
