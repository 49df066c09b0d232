//! Browser-backed notification surfaces

use contracts::engine::NotificationService;

/// Notifications via the browser's alert/confirm dialogs; errors are also
/// mirrored to the console log
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNotifier;

impl BrowserNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationService for BrowserNotifier {
    fn success(&self, message: &str) {
        log::info!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}
