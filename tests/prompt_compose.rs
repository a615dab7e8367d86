#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kiosk::config::PersonaConfig;
    use kiosk::knowledge::KnowledgeBase;
    use kiosk::prompt::{PromptComposer, FALLBACK_SENTENCE, REFUSAL_SENTENCE};

    const KNOWLEDGE: &str = "Applications open December 2.\n\nThe interview is in February.\n\n";

    fn persona() -> PersonaConfig {
        PersonaConfig {
            assistant_name: "Campus Helper".to_string(),
            institution: "the CCU Business School".to_string(),
            programs: vec!["MBA program".to_string(), "FinTech program".to_string()],
            description: "You answer admissions questions.".to_string(),
            greeting: String::new(),
            priming: false,
        }
    }

    fn composer() -> PromptComposer {
        PromptComposer::new(persona(), Arc::new(KnowledgeBase::from_text(KNOWLEDGE)))
    }

    #[test]
    fn sections_appear_in_template_order() {
        let prompt = composer().compose("When do applications open?");

        let role = prompt.find("Role:").unwrap();
        let rules = prompt.find("Rules:").unwrap();
        let knowledge = prompt.find("Knowledge base:").unwrap();
        let question = prompt.find("User question: When do applications open?").unwrap();

        assert!(role < rules);
        assert!(rules < knowledge);
        assert!(knowledge < question);
    }

    #[test]
    fn knowledge_blob_is_verbatim() {
        let prompt = composer().compose("Anything");
        assert!(prompt.contains(KNOWLEDGE));
    }

    #[test]
    fn fixed_sentences_are_quoted_in_the_rules() {
        let prompt = composer().compose("Anything");
        assert!(prompt.contains(FALLBACK_SENTENCE));
        assert!(prompt.contains(REFUSAL_SENTENCE));
    }

    #[test]
    fn clarification_names_both_programs() {
        let composer = composer();
        assert_eq!(
            composer.clarify_sentence(),
            "Do you mean the MBA program or the FinTech program?"
        );
        assert!(composer.compose("x").contains(composer.clarify_sentence()));
    }

    #[test]
    fn single_program_gets_generic_clarification() {
        let mut persona = persona();
        persona.programs = vec!["MBA program".to_string()];
        let composer = PromptComposer::new(persona, Arc::new(KnowledgeBase::from_text(KNOWLEDGE)));
        assert_eq!(
            composer.clarify_sentence(),
            "Could you clarify which program you are asking about?"
        );
    }

    #[test]
    fn priming_message_has_no_question() {
        let composer = composer();
        let priming = composer.priming_message();

        assert!(priming.starts_with("system: "));
        assert!(priming.contains(KNOWLEDGE));
        assert!(!priming.contains("User question:"));
    }
}
