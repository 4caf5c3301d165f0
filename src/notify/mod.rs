//! Notification module - delivering finished mockups to requesters

pub mod email;

use async_trait::async_trait;
use tracing::warn;

use crate::task::Industry;

pub use email::{EmailError, SmtpNotifier};

/// A finished mockup addressed to its requester
#[derive(Debug, Clone)]
pub struct MockupDelivery {
    pub recipient: String,
    pub image: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    pub keyword: String,
    pub industry: Industry,
    pub color_scheme: String,
}

/// Best-effort delivery channel.
///
/// Implementations never fail upward: any delivery problem is logged and
/// reported as `false`.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, delivery: MockupDelivery) -> bool;
}

/// Notifier used when no mail transport is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, delivery: MockupDelivery) -> bool {
        warn!(recipient = %delivery.recipient, "Mail delivery is not configured, skipping email");
        false
    }
}
