pub mod arena;
pub mod cycle;
pub mod duration;
pub mod folders;
pub mod gantt;
pub mod status;

pub use arena::{flatten_tree, TaskArena};
pub use duration::business_days;
pub use status::{apply_change, derive_status, FieldChange};
