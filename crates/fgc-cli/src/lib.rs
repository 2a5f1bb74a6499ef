//! Terminal interface for Finance Glossary Copilot

mod answerer;
mod ui;

pub use answerer::{GlossaryAnswerer, build_prompt};
pub use ui::{display_banner, handle_input_with_history, print_help, render_answer};

// Re-export core types
pub use fgc_core::{Answer, AnswerStyle, Error, Result};
