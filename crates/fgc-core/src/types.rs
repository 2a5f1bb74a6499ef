//! Shared answer types

use serde::{Deserialize, Serialize};

use crate::Snippet;

/// Fixed reply when no grounded answer can be produced
pub const NOT_FOUND_ANSWER: &str = "Not found in my notes yet.";

/// Answer rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerStyle {
    /// Short and precise
    Concise,
    /// Simple wording with a small example
    EliFifteen,
}

impl AnswerStyle {
    /// Sentence injected into the prompt to steer the answer register
    pub fn prompt_sentence(&self) -> &'static str {
        match self {
            AnswerStyle::Concise => "Be concise and correct. ",
            AnswerStyle::EliFifteen => {
                "Explain in simple terms, suitable for a 15-year-old. \
                 Use short sentences and a small example. "
            }
        }
    }
}

impl Default for AnswerStyle {
    fn default() -> Self {
        AnswerStyle::Concise
    }
}

/// A produced answer together with the snippets it was grounded on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<Snippet>,
    /// True when the text came from the LLM rather than a retrieved snippet
    pub generated: bool,
}

impl Answer {
    /// The fixed not-found answer with no sources
    pub fn not_found() -> Self {
        Self {
            text: NOT_FOUND_ANSWER.to_string(),
            sources: Vec::new(),
            generated: false,
        }
    }
}
