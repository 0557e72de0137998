use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A registered farmer, identified by identity card number.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ic: String,
    pub fullname: String,
    pub state: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::planting_session::Entity")]
    PlantingSession,
}

impl Related<super::planting_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlantingSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
