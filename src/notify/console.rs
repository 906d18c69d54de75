//! Plain-text sink used by `--dry-run`

use crate::notify::{Notification, NotificationSink, SendResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::Write;

/// Writes notifications as text blocks instead of posting them anywhere
pub struct ConsoleSink<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

/// Renders a notification as a block of text lines
pub fn render_text(notification: &Notification) -> String {
    let mut text = format!("{}\n{}\n", notification.title, notification.url);
    for line in notification.description().lines() {
        text.push_str(&format!("  {}\n", line));
    }
    for field in notification.fields() {
        text.push_str(&format!("  {}\n", field.value));
    }
    if let Some(image) = &notification.image_url {
        text.push_str(&format!("  🖼️ {}\n", image));
    }
    text
}

#[async_trait]
impl<W: Write + Send> NotificationSink for ConsoleSink<W> {
    async fn send(&self, notification: &Notification) -> SendResult<()> {
        let text = render_text(notification);
        let mut out = self.out.lock();
        writeln!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }
}
