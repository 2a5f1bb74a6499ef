//! Grounded answering over retrieved glossary snippets

use fgc_core::{
    Answer, AnswerStyle, GenerationConfig, LlmProvider, NOT_FOUND_ANSWER, RetrievalQuery,
    Result, Retriever,
};

/// Build the grounded-answer prompt for the chat model
pub fn build_prompt(context: &str, question: &str, style: AnswerStyle) -> String {
    format!(
        "You are a careful finance tutor. Use ONLY the CONTEXT to answer. \
         If the context is insufficient, reply: 'Not found in my notes yet.' \
         {}\n\nCONTEXT:\n{}\n\nQUESTION: {}\n\nANSWER:",
        style.prompt_sentence(),
        context,
        question
    )
}

/// Answers questions from retrieved snippets, optionally via the LLM
///
/// With no LLM attached (or when the model call fails) the top retrieved
/// snippet is returned unmodified.
pub struct GlossaryAnswerer<R: Retriever, L: LlmProvider> {
    retriever: R,
    llm: Option<L>,
}

impl<R: Retriever, L: LlmProvider> GlossaryAnswerer<R, L> {
    /// Create an answerer that serves answers straight from retrieval
    pub fn new(retriever: R) -> Self {
        Self {
            retriever,
            llm: None,
        }
    }

    /// Create an answerer that asks the LLM for a grounded answer
    pub fn with_llm(retriever: R, llm: L) -> Self {
        Self {
            retriever,
            llm: Some(llm),
        }
    }

    /// Check if an LLM is attached
    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Access the underlying retriever
    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    /// Answer a question, grounded in the retrieved snippets
    pub async fn answer(&self, question: &str, style: AnswerStyle) -> Result<Answer> {
        let retrieved = self
            .retriever
            .retrieve(&RetrievalQuery::new(question))
            .await?;

        if retrieved.is_empty() {
            return Ok(Answer::not_found());
        }

        let top_snippet = retrieved.snippets[0].content.clone();

        let llm = match &self.llm {
            Some(llm) => llm,
            None => {
                return Ok(Answer {
                    text: top_snippet,
                    sources: retrieved.snippets,
                    generated: false,
                });
            }
        };

        let prompt = build_prompt(&retrieved.context, question, style);
        let config = GenerationConfig {
            model_id: llm.model_id().to_string(),
            ..Default::default()
        };

        match llm.generate_with_config(&prompt, &config).await {
            Ok(text) => {
                let text = text.trim().to_string();
                Ok(Answer {
                    text: if text.is_empty() {
                        NOT_FOUND_ANSWER.to_string()
                    } else {
                        text
                    },
                    sources: retrieved.snippets,
                    generated: true,
                })
            }
            Err(e) => {
                eprintln!(
                    "⚠️  Could not reach the model: {}. Showing the top matching note instead.",
                    e
                );
                Ok(Answer {
                    text: top_snippet,
                    sources: retrieved.snippets,
                    generated: false,
                })
            }
        }
    }
}
