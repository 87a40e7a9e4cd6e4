pub mod extraction;
pub mod inference;
pub mod questions;
pub mod prompt;
pub mod collector;
pub mod scoring;
pub mod report;
pub mod processor; // Document processing orchestrator
