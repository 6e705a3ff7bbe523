// lib.rs - Main library file that exports all modules
pub mod app;
pub mod config;
pub mod error;
pub mod gateway;
pub mod gemini_client;
pub mod models;
pub mod parser;
pub mod persona;
pub mod session;
pub mod terminal;

// Re-export commonly used types for convenience
pub use app::{App, AppEvent, Notice, ViewMode};
pub use config::Config;
pub use error::ApexError;
pub use gateway::{GeminiGateway, ModelGateway};
pub use models::{ChatMessage, ImageAttachment, PracticeQuestion, Role, Topic};
pub use parser::parse_practice_question;
pub use persona::Persona;
pub use session::{ConversationSession, PracticeSession};
