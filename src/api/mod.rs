pub mod admin_api;
pub mod budget_api;
pub mod client;
pub mod document_api;
pub mod project_api;
pub mod session;
pub mod task_api;

pub use client::ApiClient;
pub use session::{AuthSession, Claims};
