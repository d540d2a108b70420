use serde::{Deserialize, Serialize};

/// A question and the answer that solves it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub text: String,
    pub answer: String,
}

impl Challenge {
    pub fn new(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { text: text.into(), answer: answer.into() }
    }

    /// Whether `given` solves this challenge.
    ///
    /// Comparison ignores case but not whitespace. A cancelled prompt
    /// (`None`) or an empty reply never matches.
    pub fn accepts(&self, given: Option<&str>) -> bool {
        match given {
            Some(answer) if !answer.is_empty() => {
                answer.to_lowercase() == self.answer.to_lowercase()
            }
            _ => false,
        }
    }
}

/// The stock question set.
pub fn default_challenges() -> Vec<Challenge> {
    vec![
        Challenge::new("Solve this math problem: 2 + 2 = ?", "4"),
        Challenge::new("What color is the sky?", "blue"),
        Challenge::new("How many fingers do you have?", "10"),
    ]
}
