use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::FarmError;
use crate::entities::user;

const USER_KEY: &str = "user";

/// The logged-in farmer, read from the cookie session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub ic: String,
    pub fullname: String,
}

impl From<&user::Model> for CurrentUser {
    fn from(user: &user::Model) -> Self {
        Self {
            ic: user.ic.clone(),
            fullname: user.fullname.clone(),
        }
    }
}

impl CurrentUser {
    /// Starts a fresh session for `user`; the old session id is discarded.
    pub async fn sign_in(session: &Session, user: &user::Model) -> Result<Self, FarmError> {
        let current = CurrentUser::from(user);
        session.cycle_id().await?;
        session.insert(USER_KEY, &current).await?;
        Ok(current)
    }

    pub async fn sign_out(session: &Session) -> Result<(), FarmError> {
        session.flush().await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = FarmError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| FarmError::Unauthorized)?;
        session
            .get::<CurrentUser>(USER_KEY)
            .await?
            .ok_or(FarmError::Unauthorized)
    }
}
