use arboard::Clipboard;
use client_core::ClipboardSink;

/// System clipboard, opened lazily on first copy.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        if self.inner.is_none() {
            self.inner = Some(Clipboard::new().map_err(|err| err.to_string())?);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|err| err.to_string()),
            None => Err("clipboard unavailable".to_string()),
        }
    }
}
