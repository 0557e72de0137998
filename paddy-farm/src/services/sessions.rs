//! Planting sessions: creation runs the prediction pipeline, the dashboard
//! re-derives the advisory from the stored inputs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use paddy::advisory::{AlertMemo, assess};
use paddy::aggregate::{ForecastOutlook, SoilOverrides, SradHistory};
use paddy::normalize::{FeatureBounds, bounds_table, normalize_feature};
use paddy::predictor::Predictor;
use paddy::schedule::{StepStatus, harvest_date, materialize};
use paddy::sources::{Coordinates, EarthSource, SolarSource, WeatherSource};
use paddy::{Feature, FeatureVector};
use sea_orm::ActiveValue::Set;
use sea_orm::*;
use serde::{Deserialize, Serialize};

use super::{Farm, positive, required};
use crate::FarmError;
use crate::entities::{
    farmer_task_step, planting_session, prediction_history, workflow_template,
};
use crate::store;

#[derive(Debug, Clone, Deserialize)]
pub struct NewSession {
    pub session_name: String,
    /// Free text, geocoded through the weather provider.
    pub location: String,
    pub field_size: f64,
    pub planting_date: NaiveDate,
    pub template_id: i32,
    /// Farmer-measured soil values; blank means "use the satellite estimate".
    #[serde(default)]
    pub soil_ph: Option<f64>,
    #[serde(default)]
    pub soil_cec: Option<f64>,
    #[serde(default)]
    pub soil_oc: Option<f64>,
}

impl NewSession {
    fn soil_overrides(&self) -> SoilOverrides {
        SoilOverrides {
            ph: self.soil_ph,
            cec: self.soil_cec,
            oc: self.soil_oc,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionUpdate {
    pub session_name: String,
    pub field_size: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InputBreakdown {
    pub raw: BTreeMap<&'static str, f64>,
    /// Rounded to two decimals for display.
    pub normalized: BTreeMap<&'static str, f64>,
    pub anomalies: Vec<String>,
}

impl InputBreakdown {
    pub fn from_features(raw: &FeatureVector) -> Self {
        let mut breakdown = InputBreakdown::default();
        for feature in Feature::ALL {
            let value = raw.get(feature);
            breakdown.raw.insert(feature.column(), value);
            let scaled = normalize_feature(value, feature);
            breakdown
                .normalized
                .insert(feature.column(), (scaled * 100.0).round() / 100.0);
        }
        breakdown
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDashboard {
    pub session: planting_session::Model,
    pub sort_by: Option<StepStatus>,
    pub tasks: Vec<farmer_task_step::Model>,
    /// `None` for sessions without a stored prediction record.
    pub input_breakdown: Option<InputBreakdown>,
    pub alert_memo: Option<AlertMemo>,
    pub weather_forecast: Vec<ForecastOutlook>,
    pub historical_srad: SradHistory,
    pub normalization: BTreeMap<&'static str, FeatureBounds>,
}

impl<W, S, E> Farm<W, S, E>
where
    W: WeatherSource,
    S: SolarSource,
    E: EarthSource,
{
    /// The owner's sessions, most recent planting first.
    pub async fn list_sessions(
        &self,
        user_ic: &str,
    ) -> Result<Vec<planting_session::Model>, FarmError> {
        Ok(planting_session::Entity::find()
            .filter(planting_session::Column::UserIc.eq(user_ic))
            .order_by_desc(planting_session::Column::PlantingDate)
            .order_by_desc(planting_session::Column::SessionId)
            .all(&self.db)
            .await?)
    }

    /// Geocodes, gathers inputs, predicts, then stores the session together
    /// with its prediction record and materialized task steps.
    pub async fn create_session(
        &self,
        user_ic: &str,
        form: NewSession,
        today: NaiveDate,
    ) -> Result<planting_session::Model, FarmError> {
        let predictor = self.predictor.as_ref().ok_or(FarmError::ModelUnavailable)?;
        let session_name = required("session_name", &form.session_name)?;
        let location = required("location", &form.location)?;
        let field_size = positive("field_size", form.field_size)?;

        let template = workflow_template::Entity::find_by_id(form.template_id)
            .one(&self.db)
            .await?
            .ok_or(FarmError::NotFound("workflow template"))?;
        let plan = store::get_template_steps(&self.db, template.id).await?;

        let at = self.sources.weather.locate(&location).await?;
        let raw = self
            .sources
            .gather(at, form.planting_date, form.soil_overrides(), today)
            .await;
        let yield_per_ha = predictor.yield_per_ha(&raw);
        let total_yield = Predictor::total_yield(yield_per_ha, field_size);

        let txn = self.db.begin().await?;
        let session = planting_session::ActiveModel {
            user_ic: Set(user_ic.to_string()),
            session_name: Set(session_name),
            location: Set(location),
            latitude: Set(at.lat),
            longitude: Set(at.lon),
            field_size: Set(field_size),
            planting_date: Set(form.planting_date),
            expected_harvest_date: Set(harvest_date(
                form.planting_date,
                i64::from(template.harvest_day_offset),
            )),
            predicted_yield_per_ha: Set(yield_per_ha),
            predicted_total_yield: Set(total_yield),
            template_id_used: Set(template.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        prediction_history::ActiveModel::from_features(session.session_id, &raw)
            .insert(&txn)
            .await?;

        for planned in materialize(form.planting_date, &plan, today) {
            farmer_task_step::ActiveModel {
                session_id: Set(session.session_id),
                user_ic: Set(user_ic.to_string()),
                task_id: Set(planned.task_name),
                start_date: Set(planned.start_date),
                status: Set(planned.status.as_str().to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        tracing::info!(
            session_id = session.session_id,
            user_ic,
            template = %template.template_name,
            yield_per_ha,
            total_yield,
            steps = plan.len(),
            "planting session created"
        );
        Ok(session)
    }

    /// Everything the session page shows. An unknown `sort_by` lists all tasks.
    pub async fn dashboard(
        &self,
        user_ic: &str,
        session_id: i32,
        sort_by: Option<&str>,
        today: NaiveDate,
    ) -> Result<SessionDashboard, FarmError> {
        let session = store::find_owned_session(&self.db, session_id, user_ic)
            .await?
            .ok_or(FarmError::NotFound("planting session"))?;

        let sort_by = sort_by.and_then(|s| s.parse::<StepStatus>().ok());
        let mut tasks = farmer_task_step::Entity::find()
            .filter(farmer_task_step::Column::SessionId.eq(session_id));
        if let Some(status) = sort_by {
            tasks = tasks.filter(farmer_task_step::Column::Status.eq(status.as_str()));
        }
        let tasks = tasks
            .order_by_asc(farmer_task_step::Column::StartDate)
            .order_by_asc(farmer_task_step::Column::Id)
            .all(&self.db)
            .await?;

        let history = prediction_history::Entity::find()
            .filter(prediction_history::Column::SessionId.eq(session_id))
            .one(&self.db)
            .await?;
        let (input_breakdown, alert_memo) = match history {
            Some(history) => {
                let raw = history.features();
                let assessment = assess(&raw);
                let mut breakdown = InputBreakdown::from_features(&raw);
                breakdown.anomalies = assessment.anomalies;
                (Some(breakdown), Some(assessment.memo))
            }
            None => (None, None),
        };

        let at = Coordinates::new(session.latitude, session.longitude);
        let (weather_forecast, historical_srad) = futures::join!(
            self.sources.forecast_outlook(at, today),
            self.sources.srad_history(at, today),
        );

        Ok(SessionDashboard {
            session,
            sort_by,
            tasks,
            input_breakdown,
            alert_memo,
            weather_forecast,
            historical_srad,
            normalization: bounds_table().into_iter().collect(),
        })
    }

    /// Renames and resizes; the total is recomputed from the stored per-hectare yield.
    pub async fn update_session(
        &self,
        user_ic: &str,
        session_id: i32,
        update: SessionUpdate,
    ) -> Result<planting_session::Model, FarmError> {
        let session_name = required("session_name", &update.session_name)?;
        let field_size = positive("field_size", update.field_size)?;
        let session = store::find_owned_session(&self.db, session_id, user_ic)
            .await?
            .ok_or(FarmError::NotFound("planting session"))?;

        let total_yield = Predictor::total_yield(session.predicted_yield_per_ha, field_size);
        let mut active: planting_session::ActiveModel = session.into();
        active.session_name = Set(session_name);
        active.field_size = Set(field_size);
        active.predicted_total_yield = Set(total_yield);
        let updated = active.update(&self.db).await?;
        tracing::info!(session_id, field_size, total_yield, "planting session updated");
        Ok(updated)
    }

    /// Deletes the session with its task steps and prediction record.
    pub async fn delete_session(&self, user_ic: &str, session_id: i32) -> Result<(), FarmError> {
        let txn = self.db.begin().await?;
        let session = store::find_owned_session(&txn, session_id, user_ic)
            .await?
            .ok_or(FarmError::NotFound("planting session"))?;

        let steps = farmer_task_step::Entity::delete_many()
            .filter(farmer_task_step::Column::SessionId.eq(session.session_id))
            .exec(&txn)
            .await?;
        prediction_history::Entity::delete_many()
            .filter(prediction_history::Column::SessionId.eq(session.session_id))
            .exec(&txn)
            .await?;
        session.delete(&txn).await?;
        txn.commit().await?;

        tracing::info!(session_id, steps = steps.rows_affected, "planting session deleted");
        Ok(())
    }
}
