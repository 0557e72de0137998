use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{Local, NaiveDate};
use paddy::sources::{EarthSource, SolarSource, WeatherSource};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use super::auth::CurrentUser;
use crate::FarmError;
use crate::entities::{farmer_task_step, planting_session, user};
use crate::services::sessions::{NewSession, SessionDashboard, SessionUpdate};
use crate::services::steps::StepUpdate;
use crate::services::templates::TemplateSummary;
use crate::services::{Farm, accounts, steps, templates};

type FarmState<W, S, E> = State<Arc<Farm<W, S, E>>>;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn health<W, S, E>(State(farm): FarmState<W, S, E>) -> Json<Value> {
    Json(json!({ "status": "ok", "model_loaded": farm.model_loaded() }))
}

pub async fn register<W, S, E>(
    State(farm): FarmState<W, S, E>,
    Json(form): Json<accounts::Registration>,
) -> Result<(StatusCode, Json<user::Model>), FarmError> {
    let user = accounts::register(&farm.db, form).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login<W, S, E>(
    State(farm): FarmState<W, S, E>,
    session: Session,
    Json(credentials): Json<accounts::Credentials>,
) -> Result<Json<CurrentUser>, FarmError> {
    let user = accounts::login(&farm.db, &credentials).await?;
    Ok(Json(CurrentUser::sign_in(&session, &user).await?))
}

pub async fn logout(session: Session) -> Result<StatusCode, FarmError> {
    CurrentUser::sign_out(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn settings<W, S, E>(
    State(farm): FarmState<W, S, E>,
    user: CurrentUser,
) -> Result<Json<user::Model>, FarmError> {
    Ok(Json(accounts::profile(&farm.db, &user.ic).await?))
}

pub async fn list_templates<W, S, E>(
    State(farm): FarmState<W, S, E>,
    _user: CurrentUser,
) -> Result<Json<Vec<TemplateSummary>>, FarmError> {
    Ok(Json(templates::list(&farm.db).await?))
}

pub async fn list_sessions<W, S, E>(
    State(farm): FarmState<W, S, E>,
    user: CurrentUser,
) -> Result<Json<Vec<planting_session::Model>>, FarmError>
where
    W: WeatherSource,
    S: SolarSource,
    E: EarthSource,
{
    Ok(Json(farm.list_sessions(&user.ic).await?))
}

pub async fn create_session<W, S, E>(
    State(farm): FarmState<W, S, E>,
    user: CurrentUser,
    Json(form): Json<NewSession>,
) -> Result<(StatusCode, Json<planting_session::Model>), FarmError>
where
    W: WeatherSource,
    S: SolarSource,
    E: EarthSource,
{
    let session = farm.create_session(&user.ic, form, today()).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub sort_by: Option<String>,
}

pub async fn session_dashboard<W, S, E>(
    State(farm): FarmState<W, S, E>,
    user: CurrentUser,
    Path(session_id): Path<i32>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<SessionDashboard>, FarmError>
where
    W: WeatherSource,
    S: SolarSource,
    E: EarthSource,
{
    let dashboard = farm
        .dashboard(&user.ic, session_id, query.sort_by.as_deref(), today())
        .await?;
    Ok(Json(dashboard))
}

pub async fn update_session<W, S, E>(
    State(farm): FarmState<W, S, E>,
    user: CurrentUser,
    Path(session_id): Path<i32>,
    Json(update): Json<SessionUpdate>,
) -> Result<Json<planting_session::Model>, FarmError>
where
    W: WeatherSource,
    S: SolarSource,
    E: EarthSource,
{
    Ok(Json(farm.update_session(&user.ic, session_id, update).await?))
}

pub async fn delete_session<W, S, E>(
    State(farm): FarmState<W, S, E>,
    user: CurrentUser,
    Path(session_id): Path<i32>,
) -> Result<StatusCode, FarmError>
where
    W: WeatherSource,
    S: SolarSource,
    E: EarthSource,
{
    farm.delete_session(&user.ic, session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_step<W, S, E>(
    State(farm): FarmState<W, S, E>,
    user: CurrentUser,
    Path(step_id): Path<i32>,
    Json(update): Json<StepUpdate>,
) -> Result<Json<farmer_task_step::Model>, FarmError> {
    let now = Local::now().naive_local();
    let step = steps::update_step(&farm.db, &user.ic, step_id, update, now).await?;
    Ok(Json(step))
}
