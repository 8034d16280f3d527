//! Stage Clock - an authoritative presentation countdown server
//!
//! One clock per process, owned by a single engine task and mirrored in real
//! time to every display screen and operator console that subscribes to it.

pub mod api;
pub mod broadcast;
pub mod config;
pub mod engine;
pub mod error;
pub mod questions;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use broadcast::{FullState, ServerEvent};
pub use config::{Config, EngineSettings};
pub use engine::{EngineHandle, SyncEngine};
pub use error::EngineError;
pub use questions::{DisplayedQuestions, QuestionsBoundary};
pub use state::AppState;
pub use tasks::spawn_engine;
pub use utils::signals::shutdown_signal;
