//! Login sessions kept in the application database.

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tower_sessions::ExpiredDeletion;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};

use crate::entities::login_session;

#[derive(Clone, Debug)]
pub struct DbSessionStore {
    db: DatabaseConnection,
}

impl DbSessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Deletes expired sessions every `period` until a sweep fails.
    pub async fn sweep_expired(self, period: Duration) -> session_store::Result<()> {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            self.delete_expired().await?;
        }
    }

    async fn exists(&self, id: &Id) -> session_store::Result<bool> {
        let found = login_session::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(found.is_some())
    }
}

fn backend(e: DbErr) -> session_store::Error {
    session_store::Error::Backend(e.to_string())
}

fn encode(record: &Record) -> session_store::Result<login_session::ActiveModel> {
    let encoded =
        serde_json::to_string(record).map_err(|e| session_store::Error::Encode(e.to_string()))?;
    Ok(login_session::ActiveModel {
        id: Set(record.id.to_string()),
        record: Set(encoded),
        expiry_date: Set(record.expiry_date.unix_timestamp()),
    })
}

#[async_trait]
impl SessionStore for DbSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.exists(&record.id).await? {
            record.id = Id::default();
        }
        login_session::Entity::insert(encode(record)?)
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        login_session::Entity::insert(encode(record)?)
            .on_conflict(
                OnConflict::column(login_session::Column::Id)
                    .update_columns([
                        login_session::Column::Record,
                        login_session::Column::ExpiryDate,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let Some(row) = login_session::Entity::find_by_id(session_id.to_string())
            .filter(login_session::Column::ExpiryDate.gt(now))
            .one(&self.db)
            .await
            .map_err(backend)?
        else {
            return Ok(None);
        };
        serde_json::from_str(&row.record)
            .map(Some)
            .map_err(|e| session_store::Error::Decode(e.to_string()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        login_session::Entity::delete_by_id(session_id.to_string())
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for DbSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let deleted = login_session::Entity::delete_many()
            .filter(login_session::Column::ExpiryDate.lte(now))
            .exec(&self.db)
            .await
            .map_err(backend)?;
        if deleted.rows_affected > 0 {
            tracing::debug!(sessions = deleted.rows_affected, "expired login sessions removed");
        }
        Ok(())
    }
}
