// ABOUTME: SQLite storage for SwiftDash
// ABOUTME: Stores settings, categories and services locally; owns the category cascades

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::collation::{caseless_eq, group_services, sort_categories, sorted_unique_names};
use crate::error::{DashError, DashResult};
use crate::models::{Category, Service, ServiceGroup, ServiceInput, Settings};

/// Categories offered on a fresh install
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Entertainment",
    "Financial",
    "Creative",
    "AI",
    "Productivity",
    "Developer",
    "Utilities",
    "Security",
    "Monitoring",
    "Networking",
    "Storage",
    "Home",
    "Education",
];

pub const DB_FILE_NAME: &str = "swiftdash.db";

const SERVICE_COLUMNS: &str =
    "id, name, port, custom_host, custom_use_https, symbol_name, category, created_at";

/// Columns that older databases may lack. Schema changes are additive only.
const ADDITIVE_COLUMNS: &[(&str, &str, &str)] = &[
    ("services", "custom_host", "TEXT"),
    ("services", "custom_use_https", "INTEGER"),
    ("services", "symbol_name", "TEXT"),
    ("services", "category", "TEXT"),
    ("categories", "created_at", "TEXT NOT NULL DEFAULT ''"),
];

const DEFAULTS_SEEDED_KEY: &str = "default_categories_seeded";

pub struct DashboardStore {
    conn: Mutex<Connection>,
}

impl DashboardStore {
    /// Get the default database file path
    pub fn default_path() -> DashResult<PathBuf> {
        let data_dir = dirs::data_local_dir().ok_or(DashError::NoDirFound)?;
        let app_dir = data_dir.join("SwiftDash");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join(DB_FILE_NAME))
    }

    /// Open or create the database at the default location.
    /// A fresh install starts from the bundled seed database when one ships with the app.
    pub fn open() -> DashResult<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            copy_bundled_database(&path);
        }
        Self::open_at(&path)
    }

    /// Open or create the database at `path`
    pub fn open_at(path: &Path) -> DashResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        log::debug!("Opening database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory database, used by tests and previews
    pub fn open_in_memory() -> DashResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DashResult<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        let current_version = env!("CARGO_PKG_VERSION");
        if let Err(e) = store.check_and_migrate(current_version) {
            // Version bookkeeping must not keep the dashboard from opening
            log::warn!("Failed to check database version: {}", e);
        }

        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Initialize database schema
    fn initialize(&self) -> DashResult<()> {
        let conn = self.lock();

        conn.execute_batch(
            r#"
            -- Services table
            CREATE TABLE IF NOT EXISTS services (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                port INTEGER NOT NULL,
                custom_host TEXT,
                custom_use_https INTEGER,
                symbol_name TEXT,
                category TEXT,
                created_at TEXT NOT NULL
            );

            -- Categories table (uniqueness is caseless and checked in code)
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Settings table (single row, created on first read)
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                data TEXT NOT NULL
            );

            -- Metadata table for version tracking
            CREATE TABLE IF NOT EXISTS _metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        ensure_columns(&conn)?;
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_services_category ON services(category);",
        )?;

        conn.execute(
            "INSERT OR IGNORE INTO _metadata (key, value) VALUES ('last_version_seen', '0.0.0')",
            [],
        )?;

        Ok(())
    }

    fn get_metadata(&self, key: &str) -> DashResult<Option<String>> {
        let conn = self.lock();
        let value = conn
            .query_row(
                "SELECT value FROM _metadata WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_metadata(&self, key: &str, value: &str) -> DashResult<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT OR REPLACE INTO _metadata (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Get the last version seen from metadata
    pub fn get_last_version_seen(&self) -> DashResult<String> {
        Ok(self
            .get_metadata("last_version_seen")?
            .unwrap_or_else(|| "0.0.0".to_string()))
    }

    /// Record the running version, unless the database was written by a newer one
    pub fn check_and_migrate(&self, current_version: &str) -> DashResult<()> {
        let last_version = self.get_last_version_seen()?;

        match compare_versions(&last_version, current_version) {
            Ordering::Equal => return Ok(()),
            Ordering::Greater => {
                log::warn!(
                    "Database was last written by version {} (running {}); unknown fields are preserved",
                    last_version,
                    current_version
                );
                return Ok(());
            }
            Ordering::Less => {
                log::info!(
                    "Database upgraded from version {} to {}",
                    last_version,
                    current_version
                );
            }
        }

        self.set_metadata("last_version_seen", current_version)
    }

    // ===== Settings =====

    /// Return the settings record, creating it with defaults on first access
    pub fn get_or_create_settings(&self) -> DashResult<Settings> {
        let conn = self.lock();
        let created = conn.execute(
            "INSERT OR IGNORE INTO settings (id, data) VALUES (1, ?)",
            params![serde_json::to_string(&Settings::default())?],
        )?;
        if created > 0 {
            log::info!("Created default settings");
        }

        let data: String =
            conn.query_row("SELECT data FROM settings WHERE id = 1", [], |row| row.get(0))?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write settings through. Keys this version does not know about are kept.
    pub fn update_settings(&self, settings: &Settings) -> DashResult<()> {
        let conn = self.lock();
        let existing: Option<String> = conn
            .query_row("SELECT data FROM settings WHERE id = 1", [], |row| row.get(0))
            .optional()?;

        let mut data = existing
            .and_then(|d| serde_json::from_str::<Value>(&d).ok())
            .filter(Value::is_object)
            .unwrap_or_else(|| Value::Object(Default::default()));
        if let (Some(target), Value::Object(fields)) =
            (data.as_object_mut(), serde_json::to_value(settings)?)
        {
            target.extend(fields);
        }

        conn.execute(
            "INSERT INTO settings (id, data) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
            params![serde_json::to_string(&data)?],
        )?;
        Ok(())
    }

    /// Set the default host. Any string is accepted, including empty.
    pub fn set_host(&self, host: &str) -> DashResult<Settings> {
        let mut settings = self.get_or_create_settings()?;
        settings.host = host.to_string();
        self.update_settings(&settings)?;
        Ok(settings)
    }

    /// Set the default scheme
    pub fn set_use_https(&self, use_https: bool) -> DashResult<Settings> {
        let mut settings = self.get_or_create_settings()?;
        settings.use_https = use_https;
        self.update_settings(&settings)?;
        Ok(settings)
    }

    // ===== Services =====

    /// All services in insertion order
    pub fn get_services(&self) -> DashResult<Vec<Service>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM services ORDER BY rowid",
            SERVICE_COLUMNS
        ))?;
        let services = stmt
            .query_map([], service_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(services)
    }

    /// Get a service by ID
    pub fn get_service(&self, id: &str) -> DashResult<Option<Service>> {
        let conn = self.lock();
        Ok(query_service(&conn, id)?)
    }

    /// Services whose category is exactly `name`
    pub fn services_in_category(&self, name: &str) -> DashResult<Vec<Service>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM services WHERE category = ? ORDER BY rowid",
            SERVICE_COLUMNS
        ))?;
        let services = stmt
            .query_map(params![name], service_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(services)
    }

    /// Services grouped by category, groups and members sorted caselessly
    pub fn list_services(&self) -> DashResult<Vec<ServiceGroup>> {
        Ok(group_services(self.get_services()?))
    }

    /// Create a new service
    pub fn create_service(&self, input: ServiceInput) -> DashResult<Service> {
        let fields = input.validate()?;
        let service = Service {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            port: fields.port,
            custom_host: fields.custom_host,
            custom_use_https: fields.custom_use_https,
            symbol_name: fields.symbol_name,
            category: fields.category,
            created_at: Utc::now(),
        };

        let conn = self.lock();
        conn.execute(
            "INSERT INTO services (id, name, port, custom_host, custom_use_https, symbol_name, category, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                service.id,
                service.name,
                service.port,
                service.custom_host,
                service.custom_use_https,
                service.symbol_name,
                service.category,
                service.created_at.to_rfc3339(),
            ],
        )?;

        log::info!("Created service '{}' on port {}", service.name, service.port);
        Ok(service)
    }

    /// Replace a service's editable fields
    pub fn update_service(&self, id: &str, input: ServiceInput) -> DashResult<Service> {
        let fields = input.validate()?;

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let updated = tx.execute(
            "UPDATE services SET name = ?, port = ?, custom_host = ?, custom_use_https = ?, symbol_name = ?, category = ?
             WHERE id = ?",
            params![
                fields.name,
                fields.port,
                fields.custom_host,
                fields.custom_use_https,
                fields.symbol_name,
                fields.category,
                id,
            ],
        )?;
        if updated == 0 {
            return Err(DashError::NotFound(format!("service {}", id)));
        }
        let service = query_service(&tx, id)?
            .ok_or_else(|| DashError::NotFound(format!("service {}", id)))?;
        tx.commit()?;

        log::info!("Updated service '{}'", service.name);
        Ok(service)
    }

    /// Delete a service. Nothing else is touched.
    pub fn delete_service(&self, id: &str) -> DashResult<()> {
        let conn = self.lock();
        let deleted = conn.execute("DELETE FROM services WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(DashError::NotFound(format!("service {}", id)));
        }
        log::info!("Deleted service {}", id);
        Ok(())
    }

    // ===== Categories =====

    /// All categories sorted caselessly by name
    pub fn get_categories(&self) -> DashResult<Vec<Category>> {
        let conn = self.lock();
        let mut categories = query_categories(&conn)?;
        sort_categories(&mut categories);
        Ok(categories)
    }

    /// Get a category by ID
    pub fn get_category(&self, id: &str) -> DashResult<Option<Category>> {
        let conn = self.lock();
        Ok(query_category(&conn, id)?)
    }

    /// Add a category; blank names and caseless duplicates are rejected
    pub fn add_category(&self, name: &str) -> DashResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashError::DuplicateCategory(String::new()));
        }

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        if query_categories(&tx)?
            .iter()
            .any(|existing| caseless_eq(&existing.name, name))
        {
            return Err(DashError::DuplicateCategory(name.to_string()));
        }

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        insert_category(&tx, &category)?;
        tx.commit()?;

        log::info!("Added category '{}'", category.name);
        Ok(category)
    }

    /// Rename a category and move every service that referenced the old name
    pub fn rename_category(&self, id: &str, new_name: &str) -> DashResult<Category> {
        let new_name = new_name.trim();

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let mut category = query_category(&tx, id)?
            .ok_or_else(|| DashError::NotFound(format!("category {}", id)))?;

        if new_name.is_empty() {
            return Err(DashError::DuplicateCategory(String::new()));
        }
        // Renaming onto itself counts as a collision; there is nothing to do
        let collides = caseless_eq(&category.name, new_name)
            || query_categories(&tx)?
                .iter()
                .any(|other| other.id != category.id && caseless_eq(&other.name, new_name));
        if collides {
            return Err(DashError::DuplicateCategory(new_name.to_string()));
        }

        tx.execute(
            "UPDATE categories SET name = ? WHERE id = ?",
            params![new_name, id],
        )?;
        let moved = tx.execute(
            "UPDATE services SET category = ? WHERE category = ?",
            params![new_name, category.name],
        )?;
        tx.commit()?;

        log::info!(
            "Renamed category '{}' to '{}' ({} services moved)",
            category.name,
            new_name,
            moved
        );
        category.name = new_name.to_string();
        Ok(category)
    }

    /// Delete a category, clearing it from every service that referenced it.
    /// Returns how many services were cleared; the services themselves stay.
    pub fn delete_category(&self, id: &str) -> DashResult<usize> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let category = query_category(&tx, id)?
            .ok_or_else(|| DashError::NotFound(format!("category {}", id)))?;

        let cleared = tx.execute(
            "UPDATE services SET category = NULL WHERE category = ?",
            params![category.name],
        )?;
        tx.execute("DELETE FROM categories WHERE id = ?", params![id])?;
        tx.commit()?;

        log::info!(
            "Deleted category '{}' ({} services cleared)",
            category.name,
            cleared
        );
        Ok(cleared)
    }

    /// Names offered by the service form: registry categories plus any category
    /// a service still references, caseless-unique and sorted.
    pub fn category_choices(&self) -> DashResult<Vec<String>> {
        let conn = self.lock();
        let mut names: Vec<String> = query_categories(&conn)?
            .into_iter()
            .map(|c| c.name)
            .collect();

        let mut stmt =
            conn.prepare("SELECT DISTINCT category FROM services WHERE category IS NOT NULL")?;
        let referenced = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        names.extend(
            referenced
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        );

        Ok(sorted_unique_names(names))
    }

    /// Add every default category that is not already present; returns how many were added
    pub fn seed_default_categories(&self) -> DashResult<usize> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let existing = query_categories(&tx)?;

        let mut added = 0;
        for name in DEFAULT_CATEGORIES {
            if existing.iter().any(|c| caseless_eq(&c.name, name)) {
                continue;
            }
            insert_category(
                &tx,
                &Category {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    created_at: Utc::now(),
                },
            )?;
            added += 1;
        }
        tx.commit()?;

        if added > 0 {
            log::info!("Seeded {} default categories", added);
        }
        Ok(added)
    }

    /// Seed the default categories the first time a database is opened with
    /// seeding enabled. Deleting them later does not bring them back.
    pub fn ensure_default_categories(&self) -> DashResult<usize> {
        if self.get_metadata(DEFAULTS_SEEDED_KEY)?.is_some() {
            return Ok(0);
        }
        let added = self.seed_default_categories()?;
        self.set_metadata(DEFAULTS_SEEDED_KEY, &Utc::now().to_rfc3339())?;
        Ok(added)
    }
}

/// Copy a bundled seed database into place, if one can be found
fn copy_bundled_database(target: &Path) {
    let mut candidates = Vec::new();
    if let Some(parent) = target.parent() {
        candidates.push(parent.join("resources").join(DB_FILE_NAME));
    }
    candidates.push(PathBuf::from("resources").join(DB_FILE_NAME));
    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            candidates.push(exe_dir.join("resources").join(DB_FILE_NAME));
        }
    }

    if let Some(bundled) = candidates.into_iter().find(|p| p.exists()) {
        match std::fs::copy(&bundled, target) {
            Ok(_) => log::info!("Initialized database from {}", bundled.display()),
            Err(e) => log::warn!(
                "Failed to copy bundled database {}: {}",
                bundled.display(),
                e
            ),
        }
    }
}

/// Add any column an older database is missing
fn ensure_columns(conn: &Connection) -> rusqlite::Result<()> {
    for (table, column, declaration) in ADDITIVE_COLUMNS {
        let present = {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(1))?
                .collect::<Result<Vec<_>, _>>()?;
            names.iter().any(|name| name == column)
        };

        if !present {
            conn.execute_batch(&format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                table, column, declaration
            ))?;
            log::info!("Added column {}.{}", table, column);
        }
    }

    // Rows that predate categories.created_at get one fixed timestamp
    let backfilled = conn.execute(
        "UPDATE categories SET created_at = ?1 WHERE created_at = ''",
        params![Utc::now().to_rfc3339()],
    )?;
    if backfilled > 0 {
        log::info!("Backfilled created_at for {} categories", backfilled);
    }
    Ok(())
}

/// Compare dotted version strings numerically; missing parts count as 0
fn compare_versions(v1: &str, v2: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|s| s.parse().ok()).collect() };
    let (a, b) = (parse(v1), parse(v2));

    (0..a.len().max(b.len()))
        .map(|i| {
            a.get(i)
                .copied()
                .unwrap_or(0)
                .cmp(&b.get(i).copied().unwrap_or(0))
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn service_from_row(row: &Row<'_>) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        port: row.get(2)?,
        custom_host: row.get(3)?,
        custom_use_https: row.get(4)?,
        symbol_name: row.get(5)?,
        category: row.get(6)?,
        created_at: row
            .get::<_, String>(7)?
            .parse()
            .unwrap_or_else(|_| Utc::now()),
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row
            .get::<_, String>(2)?
            .parse()
            .unwrap_or_else(|_| Utc::now()),
    })
}

fn query_service(conn: &Connection, id: &str) -> rusqlite::Result<Option<Service>> {
    conn.query_row(
        &format!("SELECT {} FROM services WHERE id = ?", SERVICE_COLUMNS),
        params![id],
        service_from_row,
    )
    .optional()
}

fn query_category(conn: &Connection, id: &str) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name, created_at FROM categories WHERE id = ?",
        params![id],
        category_from_row,
    )
    .optional()
}

fn query_categories(conn: &Connection) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM categories ORDER BY rowid")?;
    let categories = stmt
        .query_map([], category_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

fn insert_category(conn: &Connection, category: &Category) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO categories (id, name, created_at) VALUES (?, ?, ?)",
        params![
            category.id,
            category.name,
            category.created_at.to_rfc3339()
        ],
    )?;
    Ok(())
}
