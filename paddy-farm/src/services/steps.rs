use chrono::NaiveDateTime;
use paddy::schedule::StepStatus;
use sea_orm::ActiveValue::Set;
use sea_orm::*;
use serde::Deserialize;

use super::optional;
use crate::FarmError;
use crate::entities::farmer_task_step;

#[derive(Debug, Clone, Deserialize)]
pub struct StepUpdate {
    pub status: String,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub detail1: Option<String>,
    #[serde(default)]
    pub detail2: Option<String>,
}

/// Records progress on one of the caller's task steps. `completed_at` tracks
/// the completed status: stamped with `now` on completion, cleared otherwise.
pub async fn update_step(
    db: &DatabaseConnection,
    user_ic: &str,
    step_id: i32,
    update: StepUpdate,
    now: NaiveDateTime,
) -> Result<farmer_task_step::Model, FarmError> {
    let status: StepStatus = update.status.trim().parse()?;
    let step = farmer_task_step::Entity::find_by_id(step_id)
        .filter(farmer_task_step::Column::UserIc.eq(user_ic))
        .one(db)
        .await?
        .ok_or(FarmError::NotFound("task step"))?;

    let mut active: farmer_task_step::ActiveModel = step.into();
    active.status = Set(status.as_str().to_string());
    active.remarks = Set(optional(update.remarks));
    active.detail1 = Set(optional(update.detail1));
    active.detail2 = Set(optional(update.detail2));
    active.completed_at = Set((status == StepStatus::Completed).then_some(now));
    let updated = active.update(db).await?;

    tracing::info!(
        step_id,
        session_id = updated.session_id,
        status = %status,
        "task step updated"
    );
    Ok(updated)
}
