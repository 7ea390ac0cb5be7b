use std::future::Future;
use std::pin::Pin;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Recipient {
    pub patient_id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Recipient {
    pub fn has_contact_address(&self) -> bool {
        self.phone.is_some() || self.email.is_some()
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("recipient lookup failed: {0}")]
    Lookup(String),
}

pub type RecipientListFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Recipient>, DirectoryError>> + Send + 'a>>;

/// Enumerates notification recipients. The persistence layer behind it is
/// opaque to the scheduler and dispatcher.
pub trait RecipientDirectory: Send + Sync {
    fn list_recipients<'a>(&'a self) -> RecipientListFuture<'a>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Postgres-backed recipient directory.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn list_patient_contacts(&self) -> Result<Vec<Recipient>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, first_name, last_name, contact_phone, contact_email
             FROM patients
             ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let recipients = rows
            .into_iter()
            .map(|row| {
                let first_name: String = row.get("first_name");
                let last_name: String = row.get("last_name");
                Recipient {
                    patient_id: row.get("id"),
                    full_name: format!("{first_name} {last_name}"),
                    phone: row.get("contact_phone"),
                    email: row.get("contact_email"),
                }
            })
            .collect();

        Ok(recipients)
    }
}

impl RecipientDirectory for Store {
    fn list_recipients<'a>(&'a self) -> RecipientListFuture<'a> {
        Box::pin(async move {
            self.list_patient_contacts()
                .await
                .map_err(|err| DirectoryError::Lookup(err.to_string()))
        })
    }
}
