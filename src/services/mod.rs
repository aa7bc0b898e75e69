pub mod advice;
pub mod advisor;
pub mod ai_client;
pub mod analytics;
pub mod insights;

pub use advisor::{Advised, Advisor};
