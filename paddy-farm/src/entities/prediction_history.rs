use paddy::FeatureVector;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Raw feature values a session's prediction was made from.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "prediction_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub session_id: i32,
    #[sea_orm(column_name = "TMIN_All")]
    pub tmin_all: f64,
    #[sea_orm(column_name = "TMAX_All")]
    pub tmax_all: f64,
    #[sea_orm(column_name = "RAIN1")]
    pub rain1: f64,
    #[sea_orm(column_name = "NDVI_BOHOR")]
    pub ndvi_bohor: f64,
    #[sea_orm(column_name = "TotalSRAD")]
    pub total_srad: f64,
    #[sea_orm(column_name = "SOIL_pH")]
    pub soil_ph: f64,
    #[sea_orm(column_name = "SOIL_CEC")]
    pub soil_cec: f64,
    #[sea_orm(column_name = "SOIL_OC")]
    pub soil_oc: f64,
}

impl Model {
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            ndvi: self.ndvi_bohor,
            tmin: self.tmin_all,
            tmax: self.tmax_all,
            rain: self.rain1,
            srad: self.total_srad,
            soil_ph: self.soil_ph,
            soil_cec: self.soil_cec,
            soil_oc: self.soil_oc,
        }
    }
}

impl ActiveModel {
    pub fn from_features(session_id: i32, raw: &FeatureVector) -> Self {
        use sea_orm::ActiveValue::Set;
        Self {
            session_id: Set(session_id),
            tmin_all: Set(raw.tmin),
            tmax_all: Set(raw.tmax),
            rain1: Set(raw.rain),
            ndvi_bohor: Set(raw.ndvi),
            total_srad: Set(raw.srad),
            soil_ph: Set(raw.soil_ph),
            soil_cec: Set(raw.soil_cec),
            soil_oc: Set(raw.soil_oc),
            ..Default::default()
        }
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
