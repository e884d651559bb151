// src/infrastructure/mod.rs
pub mod config;
pub mod gemini;
pub mod local_store;
pub mod reference_store;
pub mod renderer;
pub mod transport;

pub use config::Config;
pub use gemini::GeminiClient;
pub use local_store::LocalStore;
pub use reference_store::ReferenceStore;
pub use renderer::PageRenderer;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
