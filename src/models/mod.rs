// src/models/mod.rs
pub mod chat;
pub mod image;
pub mod practice;

pub use chat::{ChatMessage, Role};
pub use image::ImageAttachment;
pub use practice::{PracticeQuestion, Topic, OPTION_COUNT};
