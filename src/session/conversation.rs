// src/session/conversation.rs
use chrono::{DateTime, Utc};

use crate::error::ApexError;
use crate::models::{ChatMessage, ImageAttachment};
use crate::persona::Persona;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingResponse,
}

/// Why a send was refused. Refusals have no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    /// Blank text and no image.
    Empty,
    /// A reply is still outstanding.
    Busy,
    /// Suggestion index outside the persona's list.
    UnknownSuggestion,
}

/// What the caller must hand to the gateway after an accepted send.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub prompt: String,
    pub image: Option<ImageAttachment>,
    pub persona: Persona,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaChange {
    /// Already in the requested persona, or a transition is running.
    Unchanged,
    /// FHEEM activation started; call [`ConversationSession::complete_fheem_transition`] when it elapses.
    TransitionStarted,
    /// Switched back to standard immediately.
    Restored,
}

/// Chat log plus the loading and persona flags driving the chat view.
#[derive(Debug, Default)]
pub struct ConversationSession {
    messages: Vec<ChatMessage>,
    loading: bool,
    mode: Persona,
    transitioning: bool,
    last_timestamp: Option<DateTime<Utc>>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> ConversationState {
        if self.loading {
            ConversationState::AwaitingResponse
        } else {
            ConversationState::Idle
        }
    }

    pub fn mode(&self) -> Persona {
        self.mode
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Optimistically append the user's turn and enter `AwaitingResponse`.
    pub fn begin_send(
        &mut self,
        text: &str,
        image: Option<ImageAttachment>,
    ) -> Result<PendingRequest, SendRejection> {
        if self.loading {
            tracing::warn!("Send rejected: a reply is still outstanding");
            return Err(SendRejection::Busy);
        }
        if text.trim().is_empty() && image.is_none() {
            return Err(SendRejection::Empty);
        }

        let timestamp = self.next_timestamp();
        self.messages
            .push(ChatMessage::user(text.to_string(), image.clone(), timestamp));
        self.loading = true;

        Ok(PendingRequest {
            prompt: text.to_string(),
            image,
            persona: self.mode,
        })
    }

    /// Append the terminal turn for the outstanding send: the reply, or the
    /// error's user-facing text. Returns `false` if nothing was outstanding.
    pub fn complete_send(&mut self, result: Result<String, ApexError>) -> bool {
        if !self.loading {
            tracing::warn!("Ignoring reply with no outstanding request");
            return false;
        }

        let content = match result {
            Ok(reply) => reply,
            Err(err) => err.user_message().to_string(),
        };
        self.append_model(content);
        self.loading = false;
        true
    }

    pub fn set_persona(&mut self, target: Persona) -> PersonaChange {
        if self.transitioning || target == self.mode {
            return PersonaChange::Unchanged;
        }

        match target {
            Persona::Fheem => {
                tracing::info!("FHEEM activation started");
                self.transitioning = true;
                PersonaChange::TransitionStarted
            }
            Persona::Standard => {
                tracing::info!("Restoring standard persona");
                self.mode = Persona::Standard;
                self.append_model(Persona::Standard.announcement().to_string());
                PersonaChange::Restored
            }
        }
    }

    pub fn toggle_persona(&mut self) -> PersonaChange {
        self.set_persona(self.mode.toggled())
    }

    /// Flip into FHEEM once the activation sequence has elapsed.
    pub fn complete_fheem_transition(&mut self) -> bool {
        if !self.transitioning {
            return false;
        }
        self.transitioning = false;
        self.mode = Persona::Fheem;
        self.append_model(Persona::Fheem.announcement().to_string());
        tracing::info!("FHEEM mode engaged");
        true
    }

    /// Purge the log. Only a confirmed clear has any effect; the persona is kept.
    pub fn clear(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        tracing::info!("Clearing {} messages", self.messages.len());
        self.messages.clear();
        true
    }

    fn append_model(&mut self, content: String) {
        let timestamp = self.next_timestamp();
        self.messages.push(ChatMessage::model(content, timestamp));
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let timestamp = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(timestamp);
        timestamp
    }
}
