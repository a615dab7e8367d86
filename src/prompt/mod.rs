use std::sync::Arc;

use crate::config::PersonaConfig;
use crate::knowledge::KnowledgeBase;

/// Reply the model must use verbatim when a question is in-domain but the
/// knowledge base has no answer.
pub const FALLBACK_SENTENCE: &str = "I don't have that information on hand right now; \
please contact the program office directly to confirm.";

/// Reply the model must use verbatim for out-of-domain questions.
pub const REFUSAL_SENTENCE: &str = "Sorry, I'm not the right assistant to answer that question.";

/// Builds the instruction sent to the model on every turn: persona, numbered
/// behavioral rules, the knowledge blob verbatim, then the user question.
///
/// The whole blob goes out on every turn. The remote conversation only
/// retains what the transcript carries, so the rules and knowledge cannot be
/// assumed to survive from one call to the next.
pub struct PromptComposer {
    persona: PersonaConfig,
    knowledge: Arc<KnowledgeBase>,
    clarify_sentence: String,
}

impl PromptComposer {
    pub fn new(persona: PersonaConfig, knowledge: Arc<KnowledgeBase>) -> Self {
        let clarify_sentence = match persona.programs.as_slice() {
            [a, b] => format!("Do you mean the {} or the {}?", a, b),
            _ => "Could you clarify which program you are asking about?".to_string(),
        };
        Self {
            persona,
            knowledge,
            clarify_sentence,
        }
    }

    /// The exact clarification sentence used when a question is ambiguous
    /// between the configured programs.
    pub fn clarify_sentence(&self) -> &str {
        &self.clarify_sentence
    }

    fn domain(&self) -> String {
        self.persona.programs.join(" and ")
    }

    fn instruction_header(&self) -> String {
        format!(
            "Role:\n\
             You are {name}, the dedicated AI advisor for {institution}. \
             {description}\n\
             \n\
             Rules:\n\
             1. Answer only questions about {domain}, strictly based on the knowledge base below.\n\
             2. If the question concerns {domain} but the knowledge base has no answer, reply exactly: \"{fallback}\"\n\
             3. If the question is unrelated to {domain}, reply exactly: \"{refusal}\"\n\
             4. Do not answer personal questions or engage in small talk.\n\
             5. Present complex information as bullet lists.\n\
             6. If it is unclear which program the question is about, reply exactly: \"{clarify}\"",
            name = self.persona.assistant_name,
            institution = self.persona.institution,
            description = self.persona.description,
            domain = self.domain(),
            fallback = FALLBACK_SENTENCE,
            refusal = REFUSAL_SENTENCE,
            clarify = self.clarify_sentence,
        )
    }

    /// Full per-turn prompt: header, knowledge blob, user question.
    pub fn compose(&self, question: &str) -> String {
        format!(
            "{header}\n\
             \n\
             Knowledge base:\n\
             ---\n\
             {knowledge}\n\
             ---\n\
             \n\
             User question: {question}",
            header = self.instruction_header(),
            knowledge = self.knowledge.text(),
            question = question,
        )
    }

    /// One-time system priming message sent before the first user question of
    /// a session when `persona.priming` is enabled.
    pub fn priming_message(&self) -> String {
        format!(
            "system: {header}\n\
             \n\
             Knowledge base:\n\
             ---\n\
             {knowledge}\n\
             ---",
            header = self.instruction_header(),
            knowledge = self.knowledge.text(),
        )
    }
}
