/// Destination for the "Copy" action.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

/// Keeps the last copied text in memory. Used headless and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        self.text = Some(text.to_string());
        Ok(())
    }
}
