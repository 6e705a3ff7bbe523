// src/gateway.rs
use async_trait::async_trait;

use crate::config::Config;
use crate::error::ApexError;
use crate::gemini_client::{Content, GeminiClient, GenerateContentRequest, GenerationConfig, Part};
use crate::models::{ImageAttachment, PracticeQuestion, Topic};
use crate::parser::parse_practice_question;
use crate::persona::Persona;

/// Returned when the model answers with no text at all.
pub const EMPTY_REPLY_FALLBACK: &str = "عذراً، لم أتمكن من معالجة طلبك.";

pub const PRACTICE_TEMPERATURE: f32 = 0.7;

/// The only two calls the tutor makes to the hosted model.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Freeform tutoring reply in markdown.
    async fn converse(
        &self,
        prompt: &str,
        image: Option<&ImageAttachment>,
        persona: Persona,
    ) -> Result<String, ApexError>;

    /// One multiple-choice question for `topic`.
    async fn generate_question(
        &self,
        topic: Topic,
        persona: Persona,
    ) -> Result<PracticeQuestion, ApexError>;
}

pub struct GeminiGateway {
    client: GeminiClient,
    chat_model: String,
    practice_model: String,
}

impl GeminiGateway {
    pub fn new(client: GeminiClient, chat_model: String, practice_model: String) -> Self {
        Self {
            client,
            chat_model,
            practice_model,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            GeminiClient::with_base_url(config.api_key.clone(), config.api_base_url.clone()),
            config.chat_model.clone(),
            config.practice_model.clone(),
        )
    }
}

/// Image part first, then the text part. A blank prompt next to an image is
/// replaced by the persona's image-analysis prompt.
pub fn build_conversation_request(
    prompt: &str,
    image: Option<&ImageAttachment>,
    persona: Persona,
) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);

    if let Some(image) = image {
        parts.push(image.to_part());
    }

    let text = if prompt.trim().is_empty() && image.is_some() {
        persona.image_only_prompt().to_string()
    } else {
        prompt.to_string()
    };
    parts.push(Part::Text { text });

    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        system_instruction: Some(Content::system(persona.system_instruction())),
        generation_config: Some(GenerationConfig {
            temperature: persona.temperature(),
            response_mime_type: None,
        }),
    }
}

pub fn practice_prompt(topic: Topic) -> String {
    format!(
        r#"
      Generate a single, high-quality Saudi Qudrat (General Aptitude Test) verbal question.
      Topic: {}
      Difficulty: Hard/Advanced

      Return ONLY a raw JSON object (no markdown formatting, no backticks) with this exact structure:
      {{
        "question": "The question text in Arabic",
        "context": "If reading comprehension, put the passage here. Otherwise leave empty.",
        "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
        "correctIndex": 0,
        "explanation": "A concise, clear explanation in Arabic why the answer is correct."
      }}
      correctIndex is an integer from 0 to 3 indicating the correct option.
    "#,
        topic.id()
    )
}

pub fn build_question_request(topic: Topic) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![Part::Text {
            text: practice_prompt(topic),
        }])],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            temperature: PRACTICE_TEMPERATURE,
            response_mime_type: Some("application/json".to_string()),
        }),
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn converse(
        &self,
        prompt: &str,
        image: Option<&ImageAttachment>,
        persona: Persona,
    ) -> Result<String, ApexError> {
        let request = build_conversation_request(prompt, image, persona);

        tracing::info!(
            "Sending {} message (image: {})",
            persona.label(),
            image.map(|i| i.media_type.as_str()).unwrap_or("none")
        );

        let response = self
            .client
            .generate_content(&self.chat_model, &request)
            .await
            .map_err(|e| {
                tracing::error!("Gemini API Error: {}", e);
                ApexError::service()
            })?;

        Ok(response
            .text()
            .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string()))
    }

    async fn generate_question(
        &self,
        topic: Topic,
        persona: Persona,
    ) -> Result<PracticeQuestion, ApexError> {
        // Question generation uses the same prompt and temperature in every persona.
        tracing::info!("Generating {} practice question (persona: {})", topic.id(), persona.label());

        let request = build_question_request(topic);
        let response = self
            .client
            .generate_content(&self.practice_model, &request)
            .await
            .map_err(|e| {
                tracing::error!("Practice Gen Error: {}", e);
                ApexError::Generation
            })?;

        let raw = response.text().unwrap_or_else(|| "{}".to_string());
        parse_practice_question(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(part: &Part) -> &str {
        match part {
            Part::Text { text } => text,
            other => panic!("expected text part, got {:?}", other),
        }
    }

    #[test]
    fn test_text_only_request_uses_persona() {
        let request = build_conversation_request("ما العلاقة؟", None, Persona::Fheem);
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 1);
        assert_eq!(text_of(&parts[0]), "ما العلاقة؟");

        let config = request.generation_config.unwrap();
        assert_eq!(config.temperature, 0.5);
        assert!(config.response_mime_type.is_none());

        let system = request.system_instruction.unwrap();
        assert_eq!(text_of(&system.parts[0]), Persona::Fheem.system_instruction());
    }

    #[test]
    fn test_image_precedes_text_and_blank_prompt_is_replaced() {
        let image = ImageAttachment::from_data_url("data:image/webp;base64,UklGRg==");
        let request = build_conversation_request("   ", Some(&image), Persona::Standard);
        let parts = &request.contents[0].parts;

        assert_eq!(parts.len(), 2);
        match &parts[0] {
            Part::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/webp");
                assert_eq!(inline_data.data, "UklGRg==");
            }
            other => panic!("expected inline data first, got {:?}", other),
        }
        assert_eq!(text_of(&parts[1]), Persona::Standard.image_only_prompt());
        assert_eq!(request.generation_config.unwrap().temperature, 0.3);
    }

    #[test]
    fn test_blank_prompt_without_image_is_passed_through() {
        let request = build_conversation_request("", None, Persona::Standard);
        assert_eq!(text_of(&request.contents[0].parts[0]), "");
    }

    #[test]
    fn test_question_request_asks_for_json() {
        let request = build_question_request(Topic::ReadingComprehension);
        let config = request.generation_config.unwrap();
        assert_eq!(config.temperature, PRACTICE_TEMPERATURE);
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert!(request.system_instruction.is_none());
        assert!(text_of(&request.contents[0].parts[0]).contains("Topic: Reading Comprehension"));
    }

    #[tokio::test]
    async fn test_unreachable_service_maps_to_service_error() {
        let client = GeminiClient::with_base_url(String::new(), "http://127.0.0.1:9".to_string());
        let gateway = GeminiGateway::new(client, "chat".to_string(), "practice".to_string());

        let err = gateway.converse("مرحبا", None, Persona::Standard).await.unwrap_err();
        assert_eq!(err, ApexError::service());

        let err = gateway
            .generate_question(Topic::OddOneOut, Persona::Fheem)
            .await
            .unwrap_err();
        assert_eq!(err, ApexError::Generation);
    }
}
