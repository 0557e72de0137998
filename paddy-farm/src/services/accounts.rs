use sea_orm::ActiveValue::Set;
use sea_orm::*;
use serde::Deserialize;

use super::required;
use crate::FarmError;
use crate::entities::user;
use crate::store;

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub ic: String,
    pub fullname: String,
    pub state: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub ic: String,
    pub password: String,
}

/// Creates an account. A concurrent registration for the same IC that slips
/// past the lookup is caught by the primary key and reported the same way.
pub async fn register(
    db: &DatabaseConnection,
    form: Registration,
) -> Result<user::Model, FarmError> {
    let ic = required("ic", &form.ic)?;
    if form.password.is_empty() {
        return Err(FarmError::Invalid("password", "must not be empty".to_string()));
    }
    if store::find_user(db, &ic).await?.is_some() {
        return Err(FarmError::AlreadyRegistered(ic));
    }

    let saved = user::ActiveModel {
        ic: Set(ic.clone()),
        fullname: Set(required("fullname", &form.fullname)?),
        state: Set(form.state.trim().to_string()),
        phone: Set(form.phone.trim().to_string()),
        password: Set(form.password),
    }
    .insert(db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => FarmError::AlreadyRegistered(ic),
        _ => FarmError::Database(e),
    })?;
    tracing::info!(ic = %saved.ic, "user registered");
    Ok(saved)
}

/// Passwords are compared as stored.
pub async fn login(
    db: &DatabaseConnection,
    credentials: &Credentials,
) -> Result<user::Model, FarmError> {
    match store::find_user(db, credentials.ic.trim()).await? {
        Some(user) if user.password == credentials.password => {
            tracing::info!(ic = %user.ic, "user logged in");
            Ok(user)
        }
        _ => {
            tracing::info!(ic = %credentials.ic, "login rejected");
            Err(FarmError::InvalidCredentials)
        }
    }
}

pub async fn profile(db: &DatabaseConnection, ic: &str) -> Result<user::Model, FarmError> {
    store::find_user(db, ic).await?.ok_or(FarmError::NotFound("user"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(ic: &str) -> Registration {
        Registration {
            ic: ic.to_string(),
            fullname: "Siti Aminah".to_string(),
            state: "Kedah".to_string(),
            phone: "012-3456789".to_string(),
            password: "padi123".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let db = store::connect("sqlite::memory:").await.unwrap();
        let saved = register(&db, registration(" 800101-02-1234 ")).await.unwrap();
        assert_eq!(saved.ic, "800101-02-1234");

        let user = login(
            &db,
            &Credentials {
                ic: "800101-02-1234".into(),
                password: "padi123".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(user.fullname, "Siti Aminah");

        let wrong = login(
            &db,
            &Credentials {
                ic: "800101-02-1234".into(),
                password: "PADI123".into(),
            },
        )
        .await;
        assert!(matches!(wrong, Err(FarmError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_ic_conflicts() {
        let db = store::connect("sqlite::memory:").await.unwrap();
        register(&db, registration("800101-02-1234")).await.unwrap();
        let err = register(&db, registration("800101-02-1234")).await.unwrap_err();
        assert!(matches!(err, FarmError::AlreadyRegistered(_)));
    }

    #[tokio::test]
    async fn concurrent_duplicates_conflict() {
        let db = store::connect("sqlite::memory:").await.unwrap();
        let (first, second) = tokio::join!(
            register(&db, registration("800101-02-1234")),
            register(&db, registration("800101-02-1234")),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes.iter().any(|r| matches!(
            r,
            Err(FarmError::AlreadyRegistered(ic)) if ic == "800101-02-1234"
        )));
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let db = store::connect("sqlite::memory:").await.unwrap();
        assert!(matches!(
            profile(&db, "nobody").await,
            Err(FarmError::NotFound("user"))
        ));
    }
}
