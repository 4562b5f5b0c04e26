//! Customer-facing notifications ("toasts").
//!
//! Storefront operations announce what they did through a [`Notifier`].
//! Delivery is fire-and-forget: a sink cannot fail an operation and nothing
//! it returns is observed.

use std::sync::{Mutex, PoisonError};

/// What kind of event a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// A new line was added to the cart.
    Added,
    /// An existing line's quantity was increased by an add.
    Updated,
    /// A line was removed from the cart.
    Removed,
    /// The whole cart was emptied.
    Cleared,
    /// An order was submitted at checkout.
    OrderSubmitted,
    /// A contact form message was sent.
    MessageSent,
}

/// A notification with a short title and a one-line description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    #[must_use]
    pub fn added(name: &str) -> Self {
        Self::new(
            NotificationKind::Added,
            "Added to Cart",
            format!("{name} added to your cart"),
        )
    }

    #[must_use]
    pub fn updated(name: &str) -> Self {
        Self::new(
            NotificationKind::Updated,
            "Updated Cart",
            format!("Increased {name} quantity"),
        )
    }

    #[must_use]
    pub fn removed(name: &str) -> Self {
        Self::new(
            NotificationKind::Removed,
            "Removed from Cart",
            format!("{name} removed from your cart"),
        )
    }

    #[must_use]
    pub fn cleared() -> Self {
        Self::new(
            NotificationKind::Cleared,
            "Cart Cleared",
            "All items removed from your cart",
        )
    }

    #[must_use]
    pub fn order_submitted() -> Self {
        Self::new(
            NotificationKind::OrderSubmitted,
            "Order Submitted!",
            "We've received your order and will contact you soon to confirm the details.",
        )
    }

    #[must_use]
    pub fn message_sent() -> Self {
        Self::new(
            NotificationKind::MessageSent,
            "Message Sent!",
            "Thank you for your message. We'll get back to you soon!",
        )
    }

    fn new(kind: NotificationKind, title: &str, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_owned(),
            description: description.into(),
        }
    }
}

/// A sink for notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    fn notify(&self, notification: &Notification);
}

/// Emits each notification as an `info` tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!(
            kind = ?notification.kind,
            title = %notification.title,
            "{}",
            notification.description
        );
    }
}

/// Keeps every notification it receives, in order.
///
/// The CLI drains it after each command to print the toasts; tests use it to
/// assert on what was announced.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything delivered so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything delivered so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .delivered
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Kinds of the delivered notifications, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|n| n.kind)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::debug!(kind = ?notification.kind, "recording notification");
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}
