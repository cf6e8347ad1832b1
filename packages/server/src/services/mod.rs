pub mod notification;
pub mod stale;
pub mod status;
pub mod submission;
