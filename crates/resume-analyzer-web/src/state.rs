use resume_analyzer_core::Analyzer;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub analyzer: Analyzer,
}
