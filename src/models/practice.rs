// src/models/practice.rs
use serde::{Deserialize, Serialize};

pub const OPTION_COUNT: usize = 4;

/// Verbal-aptitude question categories offered in practice mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "Verbal Analogy")]
    VerbalAnalogy,
    #[serde(rename = "Sentence Completion")]
    SentenceCompletion,
    #[serde(rename = "Contextual Error")]
    ContextualError,
    #[serde(rename = "Reading Comprehension")]
    ReadingComprehension,
    #[serde(rename = "Odd One Out")]
    OddOneOut,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::VerbalAnalogy,
        Topic::SentenceCompletion,
        Topic::ContextualError,
        Topic::ReadingComprehension,
        Topic::OddOneOut,
    ];

    /// English identifier, used verbatim in the generation prompt.
    pub fn id(self) -> &'static str {
        match self {
            Topic::VerbalAnalogy => "Verbal Analogy",
            Topic::SentenceCompletion => "Sentence Completion",
            Topic::ContextualError => "Contextual Error",
            Topic::ReadingComprehension => "Reading Comprehension",
            Topic::OddOneOut => "Odd One Out",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Topic::VerbalAnalogy => "تناظر لفظي",
            Topic::SentenceCompletion => "إكمال الجمل",
            Topic::ContextualError => "الخطأ السياقي",
            Topic::ReadingComprehension => "استيعاب المقروء",
            Topic::OddOneOut => "المفردة الشاذة",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Topic::VerbalAnalogy => "اكتشف العلاقة بين زوجين من الكلمات.",
            Topic::SentenceCompletion => "املأ الفراغات بما يناسب السياق.",
            Topic::ContextualError => "حدد الكلمة التي تفسد المعنى.",
            Topic::ReadingComprehension => "حلل النصوص وأجب عن الأسئلة.",
            Topic::OddOneOut => "استخرج الكلمة المختلفة في المعنى.",
        }
    }

    /// Zero-based position in [`Topic::ALL`].
    pub fn from_index(index: usize) -> Option<Topic> {
        Topic::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeQuestion {
    pub question: String,
    /// Passage for reading-comprehension questions; empty or absent otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
    pub explanation: String,
}

impl PracticeQuestion {
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    pub fn passage(&self) -> Option<&str> {
        self.context
            .as_deref()
            .map(str::trim)
            .filter(|context| !context.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_index_lookup() {
        assert_eq!(Topic::from_index(0), Some(Topic::VerbalAnalogy));
        assert_eq!(Topic::from_index(4), Some(Topic::OddOneOut));
        assert_eq!(Topic::from_index(5), None);
    }

    #[test]
    fn test_topic_serializes_as_identifier() {
        for topic in Topic::ALL {
            let value = serde_json::to_value(topic).unwrap();
            assert_eq!(value, topic.id());
        }
    }

    #[test]
    fn test_blank_context_is_not_a_passage() {
        let question = PracticeQuestion {
            question: "q".to_string(),
            context: Some("   ".to_string()),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 2,
            explanation: "e".to_string(),
        };
        assert!(question.passage().is_none());
        assert!(question.is_correct(2));
        assert!(!question.is_correct(0));
    }
}
