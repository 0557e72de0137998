use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One planting of one field, with the yield predicted at creation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "planting_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub session_id: i32,
    pub user_ic: String,
    pub session_name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub field_size: f64, // hectares
    pub planting_date: Date,
    pub expected_harvest_date: Date,
    pub predicted_yield_per_ha: f64,
    pub predicted_total_yield: f64,
    pub template_id_used: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserIc",
        to = "super::user::Column::Ic"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::workflow_template::Entity",
        from = "Column::TemplateIdUsed",
        to = "super::workflow_template::Column::Id"
    )]
    Template,
    #[sea_orm(has_many = "super::farmer_task_step::Entity")]
    Steps,
    #[sea_orm(has_one = "super::prediction_history::Entity")]
    Prediction,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::farmer_task_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl Related<super::prediction_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prediction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
