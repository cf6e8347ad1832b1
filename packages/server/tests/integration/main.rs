mod common;

mod cors;
mod hooks;
mod jobs;
mod worker;
