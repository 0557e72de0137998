//! Database bootstrap and the shared queries used by the services.
//!
//! The schema has no migrations: missing tables are created from the entity
//! definitions at startup and the workflow catalog is seeded when empty.

use paddy::schedule::{PlanStep, PlanTemplate, default_catalog};
use sea_orm::ActiveValue::Set;
use sea_orm::*;

use crate::entities::{
    farmer_task_step, login_session, planting_session, prediction_history, user,
    workflow_template, workflow_template_step,
};

/// Connects and prepares the schema.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    options.sqlx_logging(false);
    if url.starts_with("sqlite::memory:") {
        // every pooled connection would otherwise get its own empty database
        options.max_connections(1).min_connections(1);
    }
    let db = Database::connect(options).await?;
    bootstrap(&db).await?;
    Ok(db)
}

pub async fn bootstrap(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // parents before children so foreign keys resolve
    let mut statements = vec![
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(workflow_template::Entity),
        schema.create_table_from_entity(workflow_template_step::Entity),
        schema.create_table_from_entity(planting_session::Entity),
        schema.create_table_from_entity(prediction_history::Entity),
        schema.create_table_from_entity(farmer_task_step::Entity),
        schema.create_table_from_entity(login_session::Entity),
    ];
    for stmt in statements.iter_mut() {
        stmt.if_not_exists();
        db.execute(backend.build(&*stmt)).await?;
    }

    let seeded = seed_catalog(db, &default_catalog()).await?;
    if seeded > 0 {
        tracing::info!(templates = seeded, "seeded workflow catalog");
    }
    Ok(())
}

/// Inserts the catalog only into an empty template table.
pub async fn seed_catalog(
    db: &DatabaseConnection,
    catalog: &[PlanTemplate],
) -> Result<usize, DbErr> {
    if workflow_template::Entity::find().count(db).await? > 0 {
        return Ok(0);
    }
    let txn = db.begin().await?;
    for template in catalog {
        let saved = workflow_template::ActiveModel {
            template_name: Set(template.name.clone()),
            description: Set(Some(template.description.clone())),
            harvest_day_offset: Set(template.harvest_day_offset as i32),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for step in &template.steps {
            workflow_template_step::ActiveModel {
                template_id: Set(saved.id),
                task_name: Set(step.task_name.clone()),
                days_offset: Set(step.days_offset as i32),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }
    txn.commit().await?;
    Ok(catalog.len())
}

pub async fn find_user<C: ConnectionTrait>(
    db: &C,
    ic: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(ic.to_owned()).one(db).await
}

/// Get all workflow templates
pub async fn get_all_templates(
    db: &DatabaseConnection,
) -> Result<Vec<workflow_template::Model>, DbErr> {
    workflow_template::Entity::find()
        .order_by_asc(workflow_template::Column::Id)
        .all(db)
        .await
}

/// Get the ordered steps of a template
pub async fn get_template_steps<C: ConnectionTrait>(
    db: &C,
    template_id: i32,
) -> Result<Vec<PlanStep>, DbErr> {
    let steps = workflow_template_step::Entity::find()
        .filter(workflow_template_step::Column::TemplateId.eq(template_id))
        .order_by_asc(workflow_template_step::Column::DaysOffset)
        .order_by_asc(workflow_template_step::Column::Id)
        .all(db)
        .await?;
    Ok(steps
        .into_iter()
        .map(|s| PlanStep {
            task_name: s.task_name,
            days_offset: i64::from(s.days_offset),
        })
        .collect())
}

/// A session, only if it belongs to `user_ic`.
pub async fn find_owned_session<C: ConnectionTrait>(
    db: &C,
    session_id: i32,
    user_ic: &str,
) -> Result<Option<planting_session::Model>, DbErr> {
    planting_session::Entity::find_by_id(session_id)
        .filter(planting_session::Column::UserIc.eq(user_ic))
        .one(db)
        .await
}
