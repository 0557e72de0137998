use paddy::schedule::StepStatus;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A cultivation task materialized for one planting session.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "farmer_task_steps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub session_id: i32,
    pub user_ic: String,
    pub task_id: String, // task name copied from the template step
    pub start_date: Date,
    pub status: String, // soon | in_process | completed | skipped
    pub remarks: Option<String>,
    pub detail1: Option<String>,
    pub detail2: Option<String>,
    pub completed_at: Option<DateTime>,
}

impl Model {
    pub fn step_status(&self) -> Option<StepStatus> {
        self.status.parse().ok()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::planting_session::Entity",
        from = "Column::SessionId",
        to = "super::planting_session::Column::SessionId"
    )]
    Session,
}

impl Related<super::planting_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
