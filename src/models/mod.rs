pub mod admin;
pub mod budget;
pub mod de;
pub mod document;
pub mod project;
pub mod task;

pub use admin::*;
pub use budget::*;
pub use document::*;
pub use project::*;
pub use task::*;

use crate::error::ObraError;

/// Records the backend identifies by an integer id.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Client-side checks run before a draft is sent anywhere.
pub trait Validate {
    fn validate(&self) -> Result<(), ObraError>;
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<(), ObraError> {
    if value.trim().is_empty() {
        return Err(ObraError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn require_id(value: Option<i64>, field: &str) -> Result<i64, ObraError> {
    match value {
        Some(id) if id > 0 => Ok(id),
        _ => Err(ObraError::validation(format!("{field} is required"))),
    }
}
