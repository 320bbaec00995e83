//! UI layer for desktop GUI: app shell, page sections and the system clipboard.

pub mod app;
pub mod clipboard;
pub mod panels;

pub use app::DocAnalyzerApp;
