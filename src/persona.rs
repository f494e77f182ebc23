//! Persona prompt framing
//!
//! Every question is wrapped in a fixed template before it reaches the
//! model. The template holds a single `{question}` placeholder.

const QUESTION_PLACEHOLDER: &str = "{question}";

/// The persona the app ships with
const ORACLE_TEMPLATE: &str =
    "Act as the oracle of Delphi and give some mystical advice for the question: {question}";

/// A fixed prompt template that frames user questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    template: String,
}

impl Persona {
    /// The Oracle of Delphi
    pub fn oracle() -> Self {
        Self {
            template: ORACLE_TEMPLATE.to_string(),
        }
    }

    /// Generic persona: "Act as <name> and answer: {question}"
    pub fn acting_as(name: &str) -> Self {
        Self {
            template: format!("Act as {} and answer: {QUESTION_PLACEHOLDER}", name.trim()),
        }
    }

    /// Build the prompt sent to the model
    pub fn wrap(&self, question: &str) -> String {
        self.template.replacen(QUESTION_PLACEHOLDER, question, 1)
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::oracle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_wraps_question() {
        assert_eq!(
            Persona::oracle().wrap("Will it rain?"),
            "Act as the oracle of Delphi and give some mystical advice for the question: Will it rain?"
        );
    }

    #[test]
    fn test_acting_as() {
        assert_eq!(
            Persona::acting_as(" a pirate ").wrap("Where is the gold?"),
            "Act as a pirate and answer: Where is the gold?"
        );
    }

    #[test]
    fn test_placeholder_in_question_is_not_expanded() {
        let persona = Persona::acting_as("a parrot");
        assert_eq!(
            persona.wrap("say {question}"),
            "Act as a parrot and answer: say {question}"
        );
    }

    #[test]
    fn test_default_is_oracle() {
        assert_eq!(Persona::default(), Persona::oracle());
    }
}
