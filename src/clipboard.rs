//! System clipboard access

use arboard::Clipboard;

/// Destination for copied text
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// The OS clipboard, opened on first use
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        if self.inner.is_none() {
            self.inner = Some(Clipboard::new().map_err(|e| e.to_string())?);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard.set_text(text.to_string()).map_err(|e| e.to_string()),
            None => Err("clipboard unavailable".to_string()),
        }
    }
}
