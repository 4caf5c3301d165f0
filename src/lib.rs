//! Website Mockup Generator
//!
//! Accepts mockup requests over HTTP, generates the image in a background
//! pipeline (provider call, storage, email delivery) and exposes each task's
//! progress through a pollable registry.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod notify;
pub mod storage;
pub mod task;

pub use error::{AppError, Result};

use std::sync::Arc;

use task::{Orchestrator, TaskRegistry};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub registry: Arc<TaskRegistry>,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// State whose registry is the one the orchestrator writes to
    pub fn new(settings: Arc<config::Settings>, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            settings,
            registry: orchestrator.registry().clone(),
            orchestrator,
        }
    }
}
