// src/app.rs
//! Top-level controller. Owns both sessions and the gateway, runs gateway calls
//! and the FHEEM activation timer as background tasks, and applies their
//! results when the event loop hands them back through [`App::handle_event`].

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::ApexError;
use crate::gateway::ModelGateway;
use crate::models::{ImageAttachment, PracticeQuestion, Topic};
use crate::persona::Persona;
use crate::session::{
    AnswerOutcome, ConversationSession, PersonaChange, PracticeSession, QuestionRequest,
    SendRejection,
};

pub const IMPACT_AT: Duration = Duration::from_millis(500);
pub const AFTERMATH_AT: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Chat,
    Practice,
}

/// Visual checkpoints of the FHEEM activation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStage {
    Impact,
    Aftermath,
}

#[derive(Debug)]
pub enum AppEvent {
    ReplyReceived(Result<String, ApexError>),
    QuestionReceived {
        ticket: u64,
        result: Result<PracticeQuestion, ApexError>,
    },
    TransitionStage(TransitionStage),
    FheemTransitionComplete,
}

/// What the presentation should react to after an event was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    ChatUpdated,
    QuestionReady,
    Alert(String),
    Stage(TransitionStage),
    FheemEngaged,
}

pub struct App {
    gateway: Arc<dyn ModelGateway>,
    conversation: ConversationSession,
    practice: PracticeSession,
    view: ViewMode,
    fheem_transition: Duration,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        fheem_transition: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let app = Self {
            gateway,
            conversation: ConversationSession::new(),
            practice: PracticeSession::new(),
            view: ViewMode::default(),
            fheem_transition,
            events,
        };
        (app, receiver)
    }

    pub fn conversation(&self) -> &ConversationSession {
        &self.conversation
    }

    pub fn practice(&self) -> &PracticeSession {
        &self.practice
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn persona(&self) -> Persona {
        self.conversation.mode()
    }

    pub fn send_message(
        &mut self,
        text: &str,
        image: Option<ImageAttachment>,
    ) -> Result<(), SendRejection> {
        let pending = self.conversation.begin_send(text, image)?;

        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = gateway
                .converse(&pending.prompt, pending.image.as_ref(), pending.persona)
                .await;
            events.send(AppEvent::ReplyReceived(result)).ok();
        });
        Ok(())
    }

    /// Send the persona's `index`-th suggested prompt.
    pub fn send_suggestion(&mut self, index: usize) -> Result<(), SendRejection> {
        let prompt = self
            .persona()
            .suggestions()
            .get(index)
            .map(|s| s.prompt)
            .ok_or(SendRejection::UnknownSuggestion)?;
        self.send_message(prompt, None)
    }

    pub fn set_persona(&mut self, target: Persona) -> PersonaChange {
        let change = self.conversation.set_persona(target);
        if change == PersonaChange::TransitionStarted {
            self.spawn_fheem_timer();
        }
        change
    }

    pub fn toggle_persona(&mut self) -> PersonaChange {
        self.set_persona(self.persona().toggled())
    }

    pub fn clear_chat(&mut self, confirmed: bool) -> bool {
        self.conversation.clear(confirmed)
    }

    pub fn select_topic(&mut self, topic: Topic) -> bool {
        match self.practice.select_topic(topic) {
            Some(request) => {
                self.spawn_question(request);
                true
            }
            None => false,
        }
    }

    pub fn answer(&mut self, index: usize) -> Option<AnswerOutcome> {
        self.practice.select_option(index)
    }

    pub fn next_question(&mut self) -> bool {
        match self.practice.next() {
            Some(request) => {
                self.spawn_question(request);
                true
            }
            None => false,
        }
    }

    pub fn back_to_topics(&mut self) {
        self.practice.go_back();
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Option<Notice> {
        match event {
            AppEvent::ReplyReceived(result) => self
                .conversation
                .complete_send(result)
                .then_some(Notice::ChatUpdated),
            AppEvent::QuestionReceived { ticket, result } => match result {
                Ok(question) => self
                    .practice
                    .on_question(ticket, question)
                    .then_some(Notice::QuestionReady),
                Err(err) => self.practice.on_error(ticket, &err).map(Notice::Alert),
            },
            AppEvent::TransitionStage(stage) => {
                self.conversation.is_transitioning().then_some(Notice::Stage(stage))
            }
            AppEvent::FheemTransitionComplete => self
                .conversation
                .complete_fheem_transition()
                .then_some(Notice::FheemEngaged),
        }
    }

    fn spawn_question(&self, request: QuestionRequest) {
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        // Persona is passed along but does not change question generation.
        let persona = self.persona();
        tokio::spawn(async move {
            let result = gateway.generate_question(request.topic, persona).await;
            events
                .send(AppEvent::QuestionReceived {
                    ticket: request.ticket,
                    result,
                })
                .ok();
        });
    }

    /// One-shot, fire-and-forget: once started the activation always completes.
    fn spawn_fheem_timer(&self) {
        let events = self.events.clone();
        let total = self.fheem_transition;
        tokio::spawn(async move {
            let mut elapsed = Duration::ZERO;
            for (at, stage) in [
                (IMPACT_AT, TransitionStage::Impact),
                (AFTERMATH_AT, TransitionStage::Aftermath),
            ] {
                if at >= total {
                    break;
                }
                tokio::time::sleep(at - elapsed).await;
                elapsed = at;
                events.send(AppEvent::TransitionStage(stage)).ok();
            }
            tokio::time::sleep(total.saturating_sub(elapsed)).await;
            events.send(AppEvent::FheemTransitionComplete).ok();
        });
    }
}
