pub mod farmer_task_step;
pub mod login_session;
pub mod planting_session;
pub mod prediction_history;
pub mod user;
pub mod workflow_template;
pub mod workflow_template_step;

pub use farmer_task_step::Entity as FarmerTaskStep;
pub use login_session::Entity as LoginSession;
pub use planting_session::Entity as PlantingSession;
pub use prediction_history::Entity as PredictionHistory;
pub use user::Entity as User;
pub use workflow_template::Entity as WorkflowTemplate;
pub use workflow_template_step::Entity as WorkflowTemplateStep;
