// src/terminal.rs
//! Line-oriented front end. Renders session state as plain text and turns
//! input lines into controller calls; holds no tutoring logic of its own.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, Notice, TransitionStage, ViewMode};
use crate::models::{ChatMessage, ImageAttachment, Role, Topic};
use crate::persona::Persona;
use crate::session::{PersonaChange, PracticeState, SendRejection};

const HELP: &str = "\
Commands:
  <text>                 ask the tutor
  /image <path> [text]   ask about an image
  /suggest [n]           list or send a suggested prompt
  /fheem | /standard     switch persona
  /clear                 purge the chat log
  /practice | /chat      switch view
  /topic <n>             start practising a topic
  /answer <n>            answer the current question
  /next | /back          next question | back to topics
  /help | /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Image { path: String, text: String },
    Suggest(Option<usize>),
    Persona(Persona),
    Clear,
    View(ViewMode),
    Topic(usize),
    Answer(usize),
    Next,
    Back,
    Help,
    Quit,
    Invalid(String),
}

/// Numbers are 1-based on input and 0-based in the returned command.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let index = |arg: &str| arg.parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1);

    match name {
        "image" => match arg.split_once(char::is_whitespace) {
            Some((path, text)) => Command::Image {
                path: path.to_string(),
                text: text.trim().to_string(),
            },
            None if !arg.is_empty() => Command::Image {
                path: arg.to_string(),
                text: String::new(),
            },
            None => Command::Invalid("usage: /image <path> [text]".to_string()),
        },
        "suggest" if arg.is_empty() => Command::Suggest(None),
        "suggest" => index(arg)
            .map(|i| Command::Suggest(Some(i)))
            .unwrap_or_else(|| Command::Invalid(format!("not a suggestion number: {}", arg))),
        "fheem" => Command::Persona(Persona::Fheem),
        "standard" => Command::Persona(Persona::Standard),
        "clear" => Command::Clear,
        "practice" => Command::View(ViewMode::Practice),
        "chat" => Command::View(ViewMode::Chat),
        "topic" => index(arg)
            .map(Command::Topic)
            .unwrap_or_else(|| Command::Invalid(format!("not a topic number: {}", arg))),
        "answer" => index(arg)
            .map(Command::Answer)
            .unwrap_or_else(|| Command::Invalid(format!("not an option number: {}", arg))),
        "next" => Command::Next,
        "back" => Command::Back,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command /{}", other)),
    }
}

struct Terminal {
    app: App,
    printed: usize,
    confirming_clear: bool,
}

pub async fn run(app: App, mut events: mpsc::UnboundedReceiver<AppEvent>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut terminal = Terminal {
        app,
        printed: 0,
        confirming_clear: false,
    };

    println!("APEX // Verbal Aptitude Tutor. Type /help for commands.");
    terminal.print_suggestions();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !terminal.handle_line(&line).await {
                    break;
                }
            }
            Some(event) = events.recv() => {
                if let Some(notice) = terminal.app.handle_event(event) {
                    terminal.show_notice(notice);
                }
            }
        }
        terminal.flush_messages();
    }

    tracing::info!("Terminal session ended");
    Ok(())
}

impl Terminal {
    /// Returns `false` when the user asked to quit.
    async fn handle_line(&mut self, line: &str) -> bool {
        if self.confirming_clear {
            self.confirming_clear = false;
            let confirmed = matches!(line.trim(), "y" | "Y" | "yes");
            if self.app.clear_chat(confirmed) {
                self.printed = 0;
                println!("Session logs purged.");
            }
            return true;
        }

        match parse_command(line) {
            Command::Send(text) => self.send(&text, None),
            Command::Image { path, text } => match ImageAttachment::from_path(&path).await {
                Ok(image) => self.send(&text, Some(image)),
                Err(e) => println!("Cannot read image {}: {}", path, e),
            },
            Command::Suggest(None) => self.print_suggestions(),
            Command::Suggest(Some(i)) => match self.app.send_suggestion(i) {
                Ok(()) => self.print_thinking(),
                Err(SendRejection::Busy) => println!("Still waiting for the previous answer."),
                Err(SendRejection::UnknownSuggestion) => println!("No such suggestion."),
                Err(SendRejection::Empty) => {}
            },
            Command::Persona(persona) => match self.app.set_persona(persona) {
                PersonaChange::TransitionStarted => println!("Initiating FHEEM override..."),
                PersonaChange::Restored => {}
                PersonaChange::Unchanged => println!("Already {}.", self.app.persona().label()),
            },
            Command::Clear => {
                println!("Purge current session logs? [y/N]");
                self.confirming_clear = true;
            }
            Command::View(view) => {
                self.app.set_view(view);
                match view {
                    ViewMode::Practice => self.print_practice(),
                    ViewMode::Chat => self.print_suggestions(),
                }
            }
            Command::Topic(i) => {
                let Some(topic) = Topic::from_index(i) else {
                    println!("No such topic.");
                    return true;
                };
                if self.app.select_topic(topic) {
                    self.app.set_view(ViewMode::Practice);
                    println!("Loading a {} question...", topic.display_name());
                } else {
                    println!("A question is already in progress. Use /back first.");
                }
            }
            Command::Answer(i) => match self.app.answer(i) {
                Some(outcome) => {
                    if outcome.correct {
                        println!("✅ إجابة صحيحة! Streak: {}", outcome.streak);
                    } else {
                        println!("❌ إجابة خاطئة. الصحيح: {}", outcome.correct_index + 1);
                    }
                    if let Some(question) = self.app.practice().current() {
                        println!("{}", question.explanation);
                    }
                    println!("/next for another question, /back for topics.");
                }
                None => println!("Nothing to answer right now."),
            },
            Command::Next => {
                if self.app.next_question() {
                    println!("Loading next question...");
                } else {
                    println!("Answer the current question first.");
                }
            }
            Command::Back => {
                self.app.back_to_topics();
                self.print_practice();
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
            Command::Invalid(reason) => println!("{}", reason),
        }
        true
    }

    fn send(&mut self, text: &str, image: Option<ImageAttachment>) {
        match self.app.send_message(text, image) {
            Ok(()) => self.print_thinking(),
            Err(SendRejection::Busy) => println!("Still waiting for the previous answer."),
            Err(SendRejection::Empty | SendRejection::UnknownSuggestion) => {}
        }
    }

    fn show_notice(&mut self, notice: Notice) {
        match notice {
            Notice::ChatUpdated | Notice::FheemEngaged => {}
            Notice::QuestionReady => self.print_practice(),
            Notice::Alert(message) => {
                println!("⚠ {}", message);
                self.print_practice();
            }
            Notice::Stage(TransitionStage::Impact) => println!("   AP // EX  ...  FHEEM"),
            Notice::Stage(TransitionStage::Aftermath) => println!("   🧠 SUPER INTELLIGENCE"),
        }
    }

    /// Print chat turns appended since the last flush.
    fn flush_messages(&mut self) {
        let messages = self.app.conversation().messages();
        if self.printed > messages.len() {
            self.printed = 0;
        }
        for message in &messages[self.printed..] {
            if message.role == Role::User {
                // Echo of the user's own input is only needed for attachments.
                if let Some(image) = &message.image {
                    println!("[you] ({} attached)", image.media_type);
                }
                continue;
            }
            print_model_message(self.app.persona(), message);
        }
        self.printed = messages.len();
    }

    fn print_thinking(&self) {
        match self.app.persona() {
            Persona::Standard => println!("APEX::ANALYZING..."),
            Persona::Fheem => println!("FHEEM_CORE::PROCESSING..."),
        }
    }

    fn print_suggestions(&self) {
        for (i, suggestion) in self.app.persona().suggestions().iter().enumerate() {
            println!("  /suggest {}  {}", i + 1, suggestion.title);
        }
    }

    fn print_practice(&self) {
        let practice = self.app.practice();
        match practice.state() {
            PracticeState::TopicSelection => {
                println!("تدريب القدرات: choose a topic");
                for (i, topic) in Topic::ALL.iter().enumerate() {
                    println!("  /topic {}  {}: {}", i + 1, topic.display_name(), topic.description());
                }
            }
            PracticeState::Loading => println!("Loading question..."),
            PracticeState::Presenting | PracticeState::Answered => {
                let Some(question) = practice.current() else {
                    return;
                };
                println!("Streak: {}", practice.streak());
                if let Some(passage) = question.passage() {
                    println!("{}\n", passage);
                }
                println!("{}", question.question);
                for (i, option) in question.options.iter().enumerate() {
                    let marker = if practice.user_answer() == Some(i) { '*' } else { ' ' };
                    println!(" {}{}. {}", marker, i + 1, option);
                }
            }
        }
    }
}

fn print_model_message(persona: Persona, message: &ChatMessage) {
    println!(
        "\n[{} {}]\n{}\n",
        persona.label(),
        message.timestamp.format("%H:%M"),
        message.content
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_send() {
        assert_eq!(parse_command("  ما معنى كلمة؟ "), Command::Send("ما معنى كلمة؟".to_string()));
        assert_eq!(parse_command(""), Command::Send(String::new()));
    }

    #[test]
    fn test_image_command() {
        assert_eq!(
            parse_command("/image q.png حل السؤال"),
            Command::Image {
                path: "q.png".to_string(),
                text: "حل السؤال".to_string()
            }
        );
        assert_eq!(
            parse_command("/image q.png"),
            Command::Image {
                path: "q.png".to_string(),
                text: String::new()
            }
        );
        assert!(matches!(parse_command("/image"), Command::Invalid(_)));
    }

    #[test]
    fn test_numbers_are_one_based() {
        assert_eq!(parse_command("/topic 1"), Command::Topic(0));
        assert_eq!(parse_command("/answer 4"), Command::Answer(3));
        assert_eq!(parse_command("/suggest 2"), Command::Suggest(Some(1)));
        assert_eq!(parse_command("/suggest"), Command::Suggest(None));
        assert!(matches!(parse_command("/answer 0"), Command::Invalid(_)));
        assert!(matches!(parse_command("/topic x"), Command::Invalid(_)));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("/fheem"), Command::Persona(Persona::Fheem));
        assert_eq!(parse_command("/standard"), Command::Persona(Persona::Standard));
        assert_eq!(parse_command("/practice"), Command::View(ViewMode::Practice));
        assert_eq!(parse_command("/clear"), Command::Clear);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert!(matches!(parse_command("/dance"), Command::Invalid(_)));
    }
}
