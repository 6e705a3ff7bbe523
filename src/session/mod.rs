// src/session/mod.rs
pub mod conversation;
pub mod practice;

pub use conversation::{
    ConversationSession, ConversationState, PendingRequest, PersonaChange, SendRejection,
};
pub use practice::{AnswerOutcome, PracticeSession, PracticeState, QuestionRequest};
