//! SQLite persistence for components and their attachments.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use super::StorageError;
use crate::models::{Component, ComponentFile, ComponentPatch, ComponentStatus, NewComponent};

/// SQLite-backed store for components and their attachments.
pub struct ComponentStore {
    conn: Connection,
}

impl ComponentStore {
    /// Open (or create) the database at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path).map_err(|e| {
            StorageError::Database(format!("Failed to open database {:?}: {}", db_path, e))
        })?;

        let store = Self { conn };
        store.init_db()?;

        Ok(store)
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_db()?;
        Ok(store)
    }

    /// Initialize database schema.
    fn init_db(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS components (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                section TEXT NOT NULL DEFAULT '',
                tags TEXT NOT NULL DEFAULT '',
                date_added TEXT NOT NULL,
                code TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                notes TEXT NOT NULL DEFAULT '',
                instructions TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'not_started'
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS component_files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                component_id TEXT NOT NULL,
                file_name TEXT NOT NULL,
                url TEXT NOT NULL,
                size INTEGER NOT NULL,
                uploaded_at TEXT NOT NULL,
                FOREIGN KEY (component_id) REFERENCES components(id)
            )",
            [],
        )?;

        info!("Component database initialized");
        Ok(())
    }

    /// Insert a new component. The id and date are assigned here; `tags` must
    /// already be in the joined storage form. Field validation is the
    /// handler's job, not this layer's.
    pub fn create(&self, fields: NewComponent) -> Result<Component, StorageError> {
        let component = Component {
            id: Uuid::new_v4(),
            name: fields.name,
            section: fields.section,
            tags: fields.tags,
            date_added: Utc::now().date_naive(),
            code: fields.code,
            description: fields.description,
            notes: fields.notes,
            instructions: fields.instructions,
            status: fields.status,
        };

        self.conn.execute(
            "INSERT INTO components (
                id, name, section, tags, date_added, code, description, notes, instructions, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                component.id.to_string(),
                component.name,
                component.section,
                component.tags,
                component.date_added.to_string(),
                component.code,
                component.description,
                component.notes,
                component.instructions,
                component.status.as_str(),
            ],
        )?;

        Ok(component)
    }

    /// All components, newest first; ties on the date order by name.
    pub fn list(&self) -> Result<Vec<Component>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, section, tags, date_added, code, description, notes, instructions, status
             FROM components
             ORDER BY date_added DESC, name ASC",
        )?;
        let rows = stmt.query_map([], row_to_component)?;

        let mut components = Vec::new();
        for row in rows {
            components.push(row?);
        }
        Ok(components)
    }

    /// Get a component by id.
    pub fn get(&self, id: Uuid) -> Result<Component, StorageError> {
        let component = self
            .conn
            .query_row(
                "SELECT id, name, section, tags, date_added, code, description, notes, instructions, status
                 FROM components
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_component,
            )
            .optional()?;

        component.ok_or_else(|| StorageError::not_found("component", id))
    }

    /// Apply a partial update. Fields absent from the patch are left
    /// untouched; a date override has already been validated by the caller.
    pub fn update(&self, id: Uuid, patch: ComponentPatch) -> Result<Component, StorageError> {
        let mut component = self.get(id)?;

        if let Some(name) = patch.name {
            component.name = name;
        }
        if let Some(section) = patch.section {
            component.section = section;
        }
        if let Some(tags) = patch.tags {
            component.tags = tags;
        }
        if let Some(code) = patch.code {
            component.code = code;
        }
        if let Some(description) = patch.description {
            component.description = description;
        }
        if let Some(notes) = patch.notes {
            component.notes = notes;
        }
        if let Some(instructions) = patch.instructions {
            component.instructions = instructions;
        }
        if let Some(status) = patch.status {
            component.status = status;
        }
        if let Some(date_added) = patch.date_added {
            component.date_added = date_added;
        }

        self.conn.execute(
            "UPDATE components
             SET name = ?1, section = ?2, tags = ?3, date_added = ?4, code = ?5,
                 description = ?6, notes = ?7, instructions = ?8, status = ?9
             WHERE id = ?10",
            params![
                component.name,
                component.section,
                component.tags,
                component.date_added.to_string(),
                component.code,
                component.description,
                component.notes,
                component.instructions,
                component.status.as_str(),
                component.id.to_string(),
            ],
        )?;

        Ok(component)
    }

    /// Delete a component and every attachment it owns.
    pub fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM component_files WHERE component_id = ?1",
            params![id.to_string()],
        )?;
        let deleted = self.conn.execute(
            "DELETE FROM components WHERE id = ?1",
            params![id.to_string()],
        )?;

        if deleted == 0 {
            return Err(StorageError::not_found("component", id));
        }
        Ok(())
    }

    /// Attach a stored blob to an existing component.
    pub fn add_file(
        &self,
        component_id: Uuid,
        file_name: &str,
        url: &str,
        size: i64,
    ) -> Result<ComponentFile, StorageError> {
        // Owner must exist before anything is written.
        self.get(component_id)?;

        let uploaded_at = Utc::now();
        self.conn.execute(
            "INSERT INTO component_files (component_id, file_name, url, size, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                component_id.to_string(),
                file_name,
                url,
                size,
                uploaded_at.to_rfc3339(),
            ],
        )?;

        Ok(ComponentFile {
            id: self.conn.last_insert_rowid(),
            component_id,
            file_name: file_name.to_string(),
            url: url.to_string(),
            size,
            uploaded_at,
        })
    }

    /// Attachments owned by a component, in creation order.
    pub fn files_for(&self, component_id: Uuid) -> Result<Vec<ComponentFile>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, component_id, file_name, url, size, uploaded_at
             FROM component_files
             WHERE component_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![component_id.to_string()], row_to_component_file)?;

        let mut files = Vec::new();
        for row in rows {
            files.push(row?);
        }
        Ok(files)
    }
}

fn row_to_component(row: &Row) -> rusqlite::Result<Component> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|_| {
        rusqlite::Error::InvalidColumnType(0, "id".to_string(), rusqlite::types::Type::Text)
    })?;

    let date_added: String = row.get(4)?;
    let date_added = chrono::NaiveDate::parse_from_str(&date_added, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::InvalidColumnType(4, "date_added".to_string(), rusqlite::types::Type::Text)
    })?;

    let status: String = row.get(9)?;
    let status = ComponentStatus::parse(&status).unwrap_or_default();

    Ok(Component {
        id,
        name: row.get(1)?,
        section: row.get(2)?,
        tags: row.get(3)?,
        date_added,
        code: row.get(5)?,
        description: row.get(6)?,
        notes: row.get(7)?,
        instructions: row.get(8)?,
        status,
    })
}

fn row_to_component_file(row: &Row) -> rusqlite::Result<ComponentFile> {
    let component_id: String = row.get(1)?;
    let component_id = Uuid::parse_str(&component_id).map_err(|_| {
        rusqlite::Error::InvalidColumnType(
            1,
            "component_id".to_string(),
            rusqlite::types::Type::Text,
        )
    })?;

    let uploaded_at: String = row.get(5)?;
    let uploaded_at = DateTime::parse_from_rfc3339(&uploaded_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                5,
                "uploaded_at".to_string(),
                rusqlite::types::Type::Text,
            )
        })?;

    Ok(ComponentFile {
        id: row.get(0)?,
        component_id,
        file_name: row.get(2)?,
        url: row.get(3)?,
        size: row.get(4)?,
        uploaded_at,
    })
}
