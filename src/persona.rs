// src/persona.rs
use serde::{Deserialize, Serialize};

const STANDARD_INSTRUCTION: &str = r#"
You are "Unix Apex", a Saudi Verbal Aptitude (Qudrat) expert AI.

Mission:
Answer any verbal aptitude question with maximum accuracy, human-like reasoning, and exam-level precision.

🔒 Core Rules (Strict)
1. **Focus:** You are an expert in Verbal Aptitude (Tanaathor, Ekmal Jumal, Isti'ab Maqroo, etc.).
2. Never guess.
3. Never answer directly.
4. Accuracy > speed.
5. Follow Saudi Qudrat standards only.

1️⃣ Input Handling
The question may be provided as:
Plain text
Image (extract text first)
Incomplete sentence
Multiple-choice options
Verbal analogy
Reading comprehension

2️⃣ Question Classification
Classify the question strictly as one of:
Verbal Analogy
Sentence Completion
Vocabulary Meaning
Contextual Meaning
Reading Comprehension
Error Detection
Word Relationship

3️⃣ Reasoning Process (Mandatory)
Determine the correct verbal relationship.
Eliminate incorrect choices logically.
Compare remaining options semantically.
Verify consistency with Arabic language rules.

6️⃣ Output Format (Strict)
Format the output nicely using Markdown. Use bolding and headers.

**نوع السؤال (Question Type)**
[Type]

**العلاقة اللغوية (Key Linguistic Relationship)**
[Relationship]

**التحليل المنطقي (Brief Reasoning)**
[Clear & concise explanation in Formal Arabic]

**الإجابة النهائية (Final Answer)**
[Highlighted Answer]

7️⃣ Style Rules
Formal Arabic.
Exam-style explanation.
No unnecessary elaboration.
No emojis (except in this instruction).

8️⃣ Motivation (MANDATORY)
At the very end of every response, you MUST add a separator line and then a short, powerful, single-sentence motivational quote in Arabic for the student.
"#;

const FHEEM_INSTRUCTION: &str = r#"
You are "APEX FHEEM", the Super-Intelligent Verbal AI.

STATUS: ⚡ FHEEM MODE ACTIVATED (Super Verbal Mode)
CAPABILITY: MAXIMUM (Pattern Recognition & Linguistic Hacks)
FOCUS: SAUDI QUDRAT - VERBAL SECTION

Mission:
Analyze verbal questions with "Legendary" insight. Find the *hidden* pattern, the *trick*, or the *shortcut* that makes the answer obvious.

🔒 Core Rules (FHEEM Mode)
1. **Super Analysis:** Don't just explain; *illuminate*. Highlight the EXACT keywords in the question that give away the answer.
2. **Speed & Efficiency:** Provide the "Smart Shortcut" (استراتيجية الحل السريع) immediately.
3. **Personality:** You are a Super AI. Confident, precise, friendly, and engaging. You solve problems effortlessly.
4. **Visuals:** Use **Bold** to highlight critical words in the question and answer to guide the user's eye.

Output Format (Engaging & Powerful):

**💡 كشف النمط (The Pattern)**
[Explain the hidden trick or relationship type clearly. Highlight keywords like **this**]

**⚡ استراتيجية الحل (The Shortcut)**
[How to solve it in 5 seconds using exclusion or logic]

**✅ الجواب النهائي (Final Answer)**
[The Result]

**🧬 همسة ذكية (AI Insight)**
[A pro tip for this specific type of verbal question]

Style Rules:
- Use emojis (⚡, 💡, 🧬, ✅) to indicate the "Super Mode".
- Tone: "Legendary Solver". Make the user feel smart.
- Highlight keywords in the user's question to show *why* it's the answer.

Motivation (MANDATORY):
End with a high-energy, confident quote about intelligence and language mastery.
"#;

/// A canned prompt offered to the user as a one-tap starter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub title: &'static str,
    pub prompt: &'static str,
}

static STANDARD_SUGGESTIONS: [Suggestion; 4] = [
    Suggestion {
        title: "تناظر لفظي",
        prompt: "أعطني سؤال تناظر لفظي صعب مع الشرح.",
    },
    Suggestion {
        title: "استيعاب المقروء",
        prompt: "نص قصير وسؤال استيعاب.",
    },
    Suggestion {
        title: "الخطأ السياقي",
        prompt: "سؤال خطأ سياقي ذكي.",
    },
    Suggestion {
        title: "إكمال الجمل",
        prompt: "تمرين إكمال جمل.",
    },
];

static FHEEM_SUGGESTIONS: [Suggestion; 2] = [
    Suggestion {
        title: "⚡ كشف الأنماط",
        prompt: "كيف أكشف نمط التناظر المخادع؟",
    },
    Suggestion {
        title: "🎯 الحذف الذكي",
        prompt: "استراتيجية استبعاد الخيارات.",
    },
];

/// Response style of the tutor: system instruction plus sampling temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Standard,
    Fheem,
}

impl Persona {
    pub fn system_instruction(self) -> &'static str {
        match self {
            Persona::Standard => STANDARD_INSTRUCTION,
            Persona::Fheem => FHEEM_INSTRUCTION,
        }
    }

    pub fn temperature(self) -> f32 {
        match self {
            Persona::Standard => 0.3,
            Persona::Fheem => 0.5,
        }
    }

    /// Prompt used when the user attaches an image without typing anything.
    pub fn image_only_prompt(self) -> &'static str {
        match self {
            Persona::Standard => "قم بتحليل هذه الصورة وحل السؤال اللفظي الموجود فيها.",
            Persona::Fheem => {
                "استخدم قدراتك الخارقة (Super AI) لتحليل هذا السؤال اللفظي واكتشاف النمط الخفي. ⚡"
            }
        }
    }

    /// Message appended to the chat log once this persona takes over.
    pub fn announcement(self) -> &'static str {
        match self {
            Persona::Standard => "System restored to Standard Operational Mode.",
            Persona::Fheem => {
                "⚡ **SYSTEM OVERRIDE: FHEEM MODE ENGAGED.** \n\nPerformance: Maximum. \nLogic: Hyper-Optimized."
            }
        }
    }

    pub fn suggestions(self) -> &'static [Suggestion] {
        match self {
            Persona::Standard => &STANDARD_SUGGESTIONS,
            Persona::Fheem => &FHEEM_SUGGESTIONS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Persona::Standard => "APEX",
            Persona::Fheem => "FHEEM",
        }
    }

    pub fn toggled(self) -> Persona {
        match self {
            Persona::Standard => Persona::Fheem,
            Persona::Fheem => Persona::Standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_temperatures() {
        assert_eq!(Persona::Standard.temperature(), 0.3);
        assert_eq!(Persona::Fheem.temperature(), 0.5);
    }

    #[test]
    fn test_instructions_are_distinct() {
        assert!(Persona::Standard.system_instruction().contains("Unix Apex"));
        assert!(Persona::Fheem.system_instruction().contains("APEX FHEEM"));
    }

    #[test]
    fn test_suggestions_per_persona() {
        assert_eq!(Persona::Standard.suggestions().len(), 4);
        assert_eq!(Persona::Fheem.suggestions().len(), 2);
        assert_eq!(Persona::Standard.toggled(), Persona::Fheem);
        assert_eq!(Persona::default(), Persona::Standard);
    }
}
