use crate::ollama::OllamaClient;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub ollama: OllamaClient,
    pub store: ResumeStore,
}
