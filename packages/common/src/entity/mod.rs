pub mod job;
pub mod webhook_event;
