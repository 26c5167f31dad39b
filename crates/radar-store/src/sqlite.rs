//! SQLite-backed document store for organizations and tickets

use crate::ports::{TerritoryDirectory, TicketStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use radar_core::{
    BoundingBox, Coordinate, Error, OrgCode, Organization, Result, Ticket, TicketId,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

/// SQLite backend implementing both persistence ports.
///
/// Territory polygons are stored as a JSON text column, document-store
/// style, so points written as `{lat, lng}` by older clients normalize on
/// read through the [`Coordinate`] serde aliases.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Wrap an existing pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) and initialize the schema
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| Error::Store(format!("invalid database url: {e}")))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| Error::Store(format!("failed to open database: {e}")))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS organizations (
                owner_id TEXT PRIMARY KEY,
                org_code TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                territory TEXT NOT NULL,
                min_lat REAL,
                max_lat REAL,
                min_lng REAL,
                max_lng REAL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("failed to create organizations table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                description TEXT NOT NULL,
                photo_ref TEXT,
                status TEXT NOT NULL,
                priority TEXT NOT NULL,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL,
                org_code TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("failed to create tickets table: {e}")))?;

        Ok(())
    }

    /// Insert or replace an organization document.
    ///
    /// Territory edits come through here from the registration and
    /// boundary-editing flows; routing only ever reads.
    pub async fn put_organization(&self, org: &Organization) -> Result<()> {
        let territory = serde_json::to_string(&org.territory)?;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO organizations
                (owner_id, org_code, name, territory, min_lat, max_lat, min_lng, max_lng, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&org.owner_id)
        .bind(org.org_code.as_str())
        .bind(&org.name)
        .bind(territory)
        .bind(org.bounds.map(|b| b.min_lat))
        .bind(org.bounds.map(|b| b.max_lat))
        .bind(org.bounds.map(|b| b.min_lng))
        .bind(org.bounds.map(|b| b.max_lng))
        .bind(org.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("failed to upsert organization: {e}")))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct OrganizationRow {
    owner_id: String,
    org_code: String,
    name: String,
    territory: String,
    min_lat: Option<f64>,
    max_lat: Option<f64>,
    min_lng: Option<f64>,
    max_lng: Option<f64>,
    updated_at: String,
}

impl OrganizationRow {
    fn into_organization(self) -> Result<Organization> {
        let territory: Vec<Coordinate> = serde_json::from_str(&self.territory).map_err(|e| {
            Error::DirectoryUnavailable(format!(
                "malformed territory for {}: {e}",
                self.org_code
            ))
        })?;
        let updated_at = DateTime::parse_from_rfc3339(&self.updated_at)
            .map_err(|e| {
                Error::DirectoryUnavailable(format!(
                    "malformed timestamp for {}: {e}",
                    self.org_code
                ))
            })?
            .with_timezone(&Utc);
        let bounds = match (self.min_lat, self.max_lat, self.min_lng, self.max_lng) {
            (Some(min_lat), Some(max_lat), Some(min_lng), Some(max_lng)) => Some(BoundingBox {
                min_lat,
                max_lat,
                min_lng,
                max_lng,
            }),
            _ => None,
        };

        Ok(Organization {
            owner_id: self.owner_id,
            org_code: OrgCode::new(self.org_code),
            name: self.name,
            territory,
            bounds,
            updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: String,
    latitude: f64,
    longitude: f64,
    description: String,
    photo_ref: Option<String>,
    status: String,
    priority: String,
    created_by: String,
    created_at: String,
    org_code: Option<String>,
}

impl TicketRow {
    fn into_ticket(self) -> Result<Ticket> {
        let id: TicketId = self.id.parse()?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| Error::Store(format!("malformed timestamp for ticket {id}: {e}")))?
            .with_timezone(&Utc);

        Ok(Ticket {
            id,
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description,
            photo_ref: self.photo_ref,
            status: self.status.parse()?,
            priority: self.priority.parse()?,
            created_by: self.created_by,
            created_at,
            org_code: self.org_code.map(OrgCode::new),
        })
    }
}

#[async_trait]
impl TerritoryDirectory for SqliteStore {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT * FROM organizations ORDER BY org_code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::DirectoryUnavailable(format!("failed to list organizations: {e}")))?;

        rows.into_iter().map(OrganizationRow::into_organization).collect()
    }

    async fn get_organization(&self, owner_id: &str) -> Result<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT * FROM organizations WHERE owner_id = ?
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::DirectoryUnavailable(format!("failed to fetch organization: {e}")))?;

        row.map(OrganizationRow::into_organization).transpose()
    }

    async fn update_bounds(&self, owner_id: &str, bounds: BoundingBox) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET min_lat = ?, max_lat = ?, min_lng = ?, max_lng = ?, updated_at = ?
            WHERE owner_id = ?
            "#,
        )
        .bind(bounds.min_lat)
        .bind(bounds.max_lat)
        .bind(bounds.min_lng)
        .bind(bounds.max_lng)
        .bind(Utc::now().to_rfc3339())
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("failed to update bounds: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("organization {owner_id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for SqliteStore {
    async fn create(&self, ticket: &Ticket) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tickets
                (id, latitude, longitude, description, photo_ref, status, priority, created_by, created_at, org_code)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(ticket.id.to_string())
        .bind(ticket.latitude)
        .bind(ticket.longitude)
        .bind(&ticket.description)
        .bind(&ticket.photo_ref)
        .bind(ticket.status.as_str())
        .bind(ticket.priority.as_str())
        .bind(&ticket.created_by)
        .bind(ticket.created_at.to_rfc3339())
        .bind(ticket.org_code.as_ref().map(|c| c.as_str().to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("failed to insert ticket: {e}")))?;

        Ok(())
    }

    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT * FROM tickets WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("failed to fetch ticket: {e}")))?;

        row.map(TicketRow::into_ticket).transpose()
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT * FROM tickets ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("failed to list tickets: {e}")))?;

        rows.into_iter().map(TicketRow::into_ticket).collect()
    }

    async fn set_org_code(&self, id: &TicketId, org_code: &OrgCode) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tickets SET org_code = ? WHERE id = ?
            "#,
        )
        .bind(org_code.as_str())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("failed to set org code: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("ticket {id}")));
        }
        Ok(())
    }
}
