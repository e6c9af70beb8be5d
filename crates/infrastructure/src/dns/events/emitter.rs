use mhos_dns_domain::Notification;
use tokio::sync::mpsc;
use tracing::debug;

/// Fire-and-forget sender for server notifications.
///
/// Observers read the paired receiver at their own pace; a dropped receiver
/// is silently ignored so the server never blocks on its audience.
#[derive(Clone)]
pub struct NotificationEmitter {
    sender: Option<mpsc::UnboundedSender<Notification>>,
}

impl NotificationEmitter {
    pub fn new_disabled() -> Self {
        Self { sender: None }
    }

    pub fn new_enabled() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let emitter = Self { sender: Some(tx) };
        (emitter, rx)
    }

    pub fn emit(&self, notification: Notification) {
        debug!(notification = %notification, error = notification.is_error(), "Notification");
        if let Some(ref tx) = self.sender {
            let _ = tx.send(notification);
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Notification::info(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(Notification::error(message));
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }
}

impl Default for NotificationEmitter {
    fn default() -> Self {
        Self::new_disabled()
    }
}

impl std::fmt::Debug for NotificationEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationEmitter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_delivers_in_order() {
        let (emitter, mut rx) = NotificationEmitter::new_enabled();

        emitter.info("started");
        emitter.error("[x.example] not found");

        assert_eq!(rx.try_recv().unwrap(), Notification::info("started"));
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::error("[x.example] not found")
        );
    }

    #[test]
    fn test_emit_survives_dropped_receiver() {
        let (emitter, rx) = NotificationEmitter::new_enabled();
        drop(rx);

        emitter.info("nobody is listening");
        assert!(emitter.is_enabled());
    }

    #[test]
    fn test_disabled_emitter_is_noop() {
        let emitter = NotificationEmitter::default();
        emitter.error("ignored");
        assert!(!emitter.is_enabled());
    }
}
