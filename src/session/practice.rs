// src/session/practice.rs
use crate::error::ApexError;
use crate::models::{PracticeQuestion, Topic, OPTION_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeState {
    TopicSelection,
    Loading,
    Presenting,
    Answered,
}

/// Ask the gateway for a question. The ticket ties the eventual result to this
/// load so that results from abandoned loads can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionRequest {
    pub ticket: u64,
    pub topic: Topic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_index: usize,
    pub streak: u32,
}

/// Question-fetch-answer cycle for one topic at a time.
#[derive(Debug, Default)]
pub struct PracticeSession {
    topic: Option<Topic>,
    current: Option<PracticeQuestion>,
    user_answer: Option<usize>,
    streak: u32,
    loading: bool,
    ticket: u64,
}

impl PracticeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PracticeState {
        if self.loading {
            PracticeState::Loading
        } else if self.current.is_none() {
            PracticeState::TopicSelection
        } else if self.user_answer.is_some() {
            PracticeState::Answered
        } else {
            PracticeState::Presenting
        }
    }

    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    pub fn current(&self) -> Option<&PracticeQuestion> {
        self.current.as_ref()
    }

    pub fn user_answer(&self) -> Option<usize> {
        self.user_answer
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn select_topic(&mut self, topic: Topic) -> Option<QuestionRequest> {
        if self.state() != PracticeState::TopicSelection {
            tracing::warn!("Topic selection ignored in state {:?}", self.state());
            return None;
        }
        self.topic = Some(topic);
        Some(self.start_loading(topic))
    }

    /// Returns `false` when the question belongs to an abandoned load.
    pub fn on_question(&mut self, ticket: u64, question: PracticeQuestion) -> bool {
        if !self.is_current_load(ticket) {
            tracing::debug!("Dropping stale practice question (ticket {})", ticket);
            return false;
        }
        self.loading = false;
        self.current = Some(question);
        self.user_answer = None;
        true
    }

    /// Back to topic selection. Returns the alert text to show, or `None` for a
    /// stale failure that needs no alert.
    pub fn on_error(&mut self, ticket: u64, error: &ApexError) -> Option<String> {
        if !self.is_current_load(ticket) {
            return None;
        }
        tracing::error!("Practice question failed: {}", error);
        self.loading = false;
        self.topic = None;
        self.current = None;
        self.user_answer = None;
        Some(error.user_message().to_string())
    }

    /// First answer only; later calls return `None` and leave the answer locked.
    pub fn select_option(&mut self, index: usize) -> Option<AnswerOutcome> {
        if self.state() != PracticeState::Presenting || index >= OPTION_COUNT {
            return None;
        }
        let question = self.current.as_ref()?;

        let correct = question.is_correct(index);
        self.user_answer = Some(index);
        self.streak = if correct { self.streak.saturating_add(1) } else { 0 };

        Some(AnswerOutcome {
            correct,
            correct_index: question.correct_index,
            streak: self.streak,
        })
    }

    pub fn next(&mut self) -> Option<QuestionRequest> {
        if self.state() != PracticeState::Answered {
            return None;
        }
        let topic = self.topic?;
        self.current = None;
        self.user_answer = None;
        Some(self.start_loading(topic))
    }

    /// Abandon whatever is in progress and reset the streak.
    pub fn go_back(&mut self) {
        self.ticket += 1;
        self.loading = false;
        self.topic = None;
        self.current = None;
        self.user_answer = None;
        self.streak = 0;
    }

    fn start_loading(&mut self, topic: Topic) -> QuestionRequest {
        self.ticket += 1;
        self.loading = true;
        QuestionRequest {
            ticket: self.ticket,
            topic,
        }
    }

    fn is_current_load(&self, ticket: u64) -> bool {
        self.loading && ticket == self.ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_index: usize) -> PracticeQuestion {
        PracticeQuestion {
            question: "أي الكلمات شاذة؟".to_string(),
            context: None,
            options: ["أ".into(), "ب".into(), "ج".into(), "د".into()],
            correct_index,
            explanation: "شرح".to_string(),
        }
    }

    fn present(session: &mut PracticeSession, correct_index: usize) {
        let request = match session.state() {
            PracticeState::TopicSelection => session.select_topic(Topic::OddOneOut),
            PracticeState::Answered => session.next(),
            other => panic!("cannot load from {:?}", other),
        }
        .unwrap();
        assert!(session.on_question(request.ticket, question(correct_index)));
    }

    #[test]
    fn test_full_cycle_states() {
        let mut session = PracticeSession::new();
        assert_eq!(session.state(), PracticeState::TopicSelection);

        let request = session.select_topic(Topic::VerbalAnalogy).unwrap();
        assert_eq!(request.topic, Topic::VerbalAnalogy);
        assert_eq!(session.state(), PracticeState::Loading);
        assert!(session.select_topic(Topic::OddOneOut).is_none());

        session.on_question(request.ticket, question(1));
        assert_eq!(session.state(), PracticeState::Presenting);

        let outcome = session.select_option(1).unwrap();
        assert!(outcome.correct);
        assert_eq!(session.state(), PracticeState::Answered);

        let next = session.next().unwrap();
        assert_eq!(next.topic, Topic::VerbalAnalogy);
        assert!(session.current().is_none());
        assert!(session.user_answer().is_none());
        assert_eq!(session.state(), PracticeState::Loading);
    }

    #[test]
    fn test_answer_lock() {
        let mut session = PracticeSession::new();
        present(&mut session, 2);

        session.select_option(0).unwrap();
        assert!(session.select_option(2).is_none());
        assert!(session.select_option(3).is_none());
        assert_eq!(session.user_answer(), Some(0));
        assert_eq!(session.streak(), 0);
    }

    #[test]
    fn test_out_of_range_option_is_ignored() {
        let mut session = PracticeSession::new();
        present(&mut session, 0);
        assert!(session.select_option(OPTION_COUNT).is_none());
        assert_eq!(session.state(), PracticeState::Presenting);
    }

    #[test]
    fn test_streak_tracks_trailing_correct_run() {
        let mut session = PracticeSession::new();
        let script = [(1, 1), (3, 3), (2, 0), (0, 0)];
        let mut streaks = Vec::new();

        for (correct_index, answer) in script {
            present(&mut session, correct_index);
            streaks.push(session.select_option(answer).unwrap().streak);
        }
        assert_eq!(streaks, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_streak_saturates_at_max() {
        let mut session = PracticeSession::new();
        session.streak = u32::MAX;
        present(&mut session, 2);
        assert_eq!(session.select_option(2).unwrap().streak, u32::MAX);
    }

    #[test]
    fn test_go_back_resets_streak_and_drops_late_question() {
        let mut session = PracticeSession::new();
        present(&mut session, 1);
        session.select_option(1);
        let pending = session.next().unwrap();
        assert_eq!(session.streak(), 1);

        session.go_back();
        assert_eq!(session.state(), PracticeState::TopicSelection);
        assert_eq!(session.streak(), 0);
        assert!(session.topic().is_none());

        assert!(!session.on_question(pending.ticket, question(0)));
        assert_eq!(session.state(), PracticeState::TopicSelection);
    }

    #[test]
    fn test_error_returns_to_topic_selection() {
        let mut session = PracticeSession::new();
        let request = session.select_topic(Topic::ReadingComprehension).unwrap();

        let alert = session.on_error(request.ticket, &ApexError::malformed("missing field `options`"));
        assert_eq!(alert.as_deref(), Some(crate::error::PRACTICE_ERROR_MESSAGE));
        assert_eq!(session.state(), PracticeState::TopicSelection);
        assert!(session.topic().is_none());

        // A second report for the same load is stale.
        assert!(session.on_error(request.ticket, &ApexError::Generation).is_none());
        assert!(session.select_topic(Topic::ReadingComprehension).is_some());
    }

    #[test]
    fn test_next_requires_answer() {
        let mut session = PracticeSession::new();
        assert!(session.next().is_none());
        present(&mut session, 0);
        assert!(session.next().is_none());
    }
}
