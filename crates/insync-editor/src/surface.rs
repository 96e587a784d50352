//! Live editing surface for the android payload

use parking_lot::RwLock;
use std::sync::Arc;

/// Provider of the android steps text currently shown to the user
///
/// Read once per save, at the moment of the save.
pub trait EditingSurface: Send + Sync {
    /// Current text, or `None` when the surface is not mounted
    fn current_text(&self) -> Option<String>;
}

impl<F> EditingSurface for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn current_text(&self) -> Option<String> {
        self()
    }
}

/// Text buffer standing in for a rendered text area
#[derive(Debug, Default, Clone)]
pub struct TextBuffer {
    inner: Arc<RwLock<Option<String>>>,
}

impl TextBuffer {
    /// Mounted buffer holding `text`
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(text.into()))),
        }
    }

    /// Replace the buffer's text
    pub fn set_text(&self, text: impl Into<String>) {
        *self.inner.write() = Some(text.into());
    }

    /// Unmount the buffer
    pub fn unmount(&self) {
        *self.inner.write() = None;
    }
}

impl EditingSurface for TextBuffer {
    fn current_text(&self) -> Option<String> {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_surfaces() {
        let surface = || Some("{\"b\":2}".to_string());
        assert_eq!(surface.current_text().as_deref(), Some("{\"b\":2}"));
    }

    #[test]
    fn text_buffer_reads_live_value() {
        let buffer = TextBuffer::new("v1");
        let shared = buffer.clone();

        shared.set_text("v2");
        assert_eq!(buffer.current_text().as_deref(), Some("v2"));

        shared.unmount();
        assert_eq!(buffer.current_text(), None);
    }
}
