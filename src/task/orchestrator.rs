//! Drives accepted tasks through generation, storage and notification

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::backend::{prompt, GenerationClient};
use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::notify::{MockupDelivery, Notifier};
use crate::storage::{base64, ImageStore, OutputFormat};
use crate::task::model::{PipelineOutcome, Stage, Task};
use crate::task::registry::TaskRegistry;
use crate::task::request::GenerationRequest;

/// Pipeline parameters
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub image_size: String,
    pub output_format: OutputFormat,
    pub attachment_name: String,
    pub generation_timeout: Duration,
    pub storage_timeout: Duration,
    pub notify_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for PipelineConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            image_size: settings.generation.image_size.clone(),
            output_format: OutputFormat::Png,
            attachment_name: settings.mail.attachment_name.clone(),
            generation_timeout: settings.generation.timeout(),
            storage_timeout: settings.storage.timeout(),
            notify_timeout: settings.mail.timeout(),
        }
    }
}

/// Runs one background pipeline per accepted request.
///
/// A task's stages run strictly in order; different tasks run in parallel and
/// each only ever writes its own registry entry.
pub struct Orchestrator {
    generator: Arc<dyn GenerationClient>,
    store: Arc<dyn ImageStore>,
    notifier: Arc<dyn Notifier>,
    registry: Arc<TaskRegistry>,
    config: PipelineConfig,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn GenerationClient>,
        store: Arc<dyn ImageStore>,
        notifier: Arc<dyn Notifier>,
        registry: Arc<TaskRegistry>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            store,
            notifier,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// Validate and register a request, then start its pipeline in the background.
    ///
    /// The task is in the registry before this returns, so it can be polled
    /// immediately. Nothing downstream of registration is awaited.
    pub fn submit(self: &Arc<Self>, request: GenerationRequest) -> Result<(Task, JoinHandle<()>)> {
        request.validate()?;

        let task = Task::accepted();
        self.registry.put(task.clone())?;

        info!(
            task_id = %task.id(),
            industry = %request.industry,
            "Task accepted"
        );

        let orchestrator = Arc::clone(self);
        let accepted = task.clone();
        let handle = tokio::spawn(async move {
            orchestrator.run(accepted, request).await;
        });

        Ok((task, handle))
    }

    /// Run a task to a terminal stage. Never panics and never returns an error:
    /// every failure ends up as a `Failed` snapshot.
    pub async fn run(&self, task: Task, request: GenerationRequest) {
        let id = task.id();
        let result = AssertUnwindSafe(self.execute(&task, &request))
            .catch_unwind()
            .await;

        let snapshot = match result {
            Ok(Ok(outcome)) => {
                info!(
                    task_id = %id,
                    image_url = %outcome.image_url,
                    email_sent = outcome.email_sent,
                    "Task completed"
                );
                task.complete(outcome)
            }
            Ok(Err(e)) => {
                error!(task_id = %id, error = %e, "Task failed");
                task.fail(e.to_string())
            }
            Err(panic) => {
                let reason = format!("Internal error: pipeline panicked: {}", panic_message(&*panic));
                error!(task_id = %id, error = %reason, "Task failed");
                task.fail(reason)
            }
        };

        self.install(snapshot);
    }

    async fn execute(&self, task: &Task, request: &GenerationRequest) -> Result<PipelineOutcome> {
        // Generating
        self.install(task.advance(Stage::Generating));

        let prompt = prompt::build_prompt(request, &self.config.image_size);
        let generated = timeout(
            self.config.generation_timeout,
            self.generator.generate(&prompt, &self.config.image_size),
        )
        .await
        .map_err(|_| {
            AppError::Timeout(format!(
                "image generation exceeded {}ms",
                self.config.generation_timeout.as_millis()
            ))
        })??;

        if let Some(revised) = &generated.revised_prompt {
            debug!(task_id = %task.id(), revised_prompt = %revised, "Provider revised prompt");
        }

        // The only base64 decode; storage and email share these bytes
        let image = base64::decode(&generated.b64_json)?;
        if !self.store.validate(&image).await {
            return Err(AppError::Integrity(
                "image is empty or has no positive dimensions".to_string(),
            ));
        }

        // Storing
        self.install(task.advance(Stage::Storing));

        let format = self.config.output_format;
        let stored = timeout(
            self.config.storage_timeout,
            self.store.save(&image, &request.keyword, format),
        )
        .await
        .map_err(|_| {
            AppError::Storage(format!(
                "write exceeded {}ms",
                self.config.storage_timeout.as_millis()
            ))
        })??;

        // Emailing
        self.install(task.advance(Stage::Emailing));

        let delivery = MockupDelivery {
            recipient: request.email.clone(),
            image,
            filename: self.config.attachment_name.clone(),
            mime_type: format.mime_type().to_string(),
            keyword: request.keyword.clone(),
            industry: request.industry,
            color_scheme: request.color_scheme().to_string(),
        };

        let email_sent = match timeout(self.config.notify_timeout, self.notifier.send(delivery)).await {
            Ok(sent) => sent,
            Err(_) => {
                warn!(task_id = %task.id(), "Email delivery timed out");
                false
            }
        };

        Ok(PipelineOutcome {
            image_url: stored.url,
            email_sent,
        })
    }

    fn install(&self, snapshot: Task) {
        let id = snapshot.id();
        let stage = snapshot.stage;
        match self.registry.replace(snapshot) {
            Ok(()) => debug!(task_id = %id, stage = %stage, "Task stage updated"),
            Err(e) => warn!(task_id = %id, stage = %stage, error = %e, "Task update rejected"),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
