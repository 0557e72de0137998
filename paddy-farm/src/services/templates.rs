use paddy::schedule::PlanStep;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::FarmError;
use crate::entities::workflow_template;
use crate::store;

#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    #[serde(flatten)]
    pub template: workflow_template::Model,
    pub steps: Vec<PlanStep>,
}

/// The workflow catalog with each template's ordered steps.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<TemplateSummary>, FarmError> {
    let mut summaries = Vec::new();
    for template in store::get_all_templates(db).await? {
        let steps = store::get_template_steps(db, template.id).await?;
        summaries.push(TemplateSummary { template, steps });
    }
    Ok(summaries)
}
