// src/models/question.rs

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick exactly one of `options`.
    #[serde(alias = "MCQ")]
    MultipleChoice,
    #[serde(alias = "Short")]
    ShortAnswer,
    #[serde(alias = "Long")]
    LongAnswer,
}

impl QuestionKind {
    pub fn is_free_text(self) -> bool {
        !matches!(self, QuestionKind::MultipleChoice)
    }
}

/// A single exam question. Immutable once handed to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_kind_options))]
pub struct Question {
    pub id: i64,

    /// Mapped from 'type' in the paper since `type` is a reserved keyword in Rust.
    #[serde(rename = "type")]
    pub kind: QuestionKind,

    #[validate(length(min = 1, max = 2000))]
    pub prompt: String,

    /// Present and non-empty iff `kind` is MultipleChoice.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[validate(range(min = 1))]
    pub marks: u32,
}

fn validate_kind_options(question: &Question) -> Result<(), validator::ValidationError> {
    match question.kind {
        QuestionKind::MultipleChoice => {
            if question.options.is_empty() {
                return Err(validator::ValidationError::new("options_cannot_be_empty"));
            }
            if question.options.iter().any(|opt| opt.trim().is_empty()) {
                return Err(validator::ValidationError::new("option_cannot_be_blank"));
            }
        }
        QuestionKind::ShortAnswer | QuestionKind::LongAnswer => {
            if !question.options.is_empty() {
                return Err(validator::ValidationError::new("free_text_has_options"));
            }
        }
    }
    Ok(())
}

impl Question {
    /// Whether `value` is an acceptable answer for this question.
    pub fn accepts(&self, value: &str) -> bool {
        match self.kind {
            QuestionKind::MultipleChoice => self.options.iter().any(|opt| opt == value),
            QuestionKind::ShortAnswer | QuestionKind::LongAnswer => true,
        }
    }
}

/// Ordered, validated, non-empty sequence of questions.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    questions: Vec<Question>,
    by_id: HashMap<i64, usize>,
}

impl QuestionSet {
    /// Keeps every valid question in order.
    ///
    /// * Questions failing validation are skipped with a warning.
    /// * Duplicate ids keep the first occurrence.
    /// * Fails only when nothing usable remains.
    pub fn new(candidates: Vec<Question>) -> Result<Self, AppError> {
        let mut questions = Vec::with_capacity(candidates.len());
        let mut by_id = HashMap::with_capacity(candidates.len());

        for question in candidates {
            if let Err(errors) = question.validate() {
                tracing::warn!("Skipping malformed question {}: {}", question.id, errors);
                continue;
            }
            if by_id.contains_key(&question.id) {
                tracing::warn!("Skipping duplicate question id {}", question.id);
                continue;
            }
            by_id.insert(question.id, questions.len());
            questions.push(question);
        }

        if questions.is_empty() {
            return Err(AppError::InvalidQuestionSet(
                "exam paper contains no usable questions".to_string(),
            ));
        }

        Ok(Self { questions, by_id })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed set; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn by_id(&self, id: i64) -> Option<&Question> {
        self.by_id.get(&id).map(|&idx| &self.questions[idx])
    }

    pub fn contains(&self, id: i64) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn total_marks(&self) -> u32 {
        self.questions.iter().map(|q| q.marks).sum()
    }
}

/// An exam paper as supplied by the authoring side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamPaper {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Countdown length; the configuration may override it.
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    pub questions: Vec<Question>,
}

impl ExamPaper {
    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }
}
