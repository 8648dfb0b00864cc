//! DASS-21 questionnaire catalog and answer collection.
//!
//! The 21 statements and their category assignments are fixed (Lovibond &
//! Lovibond, 1995). Answers are transient; they exist only until scoring.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The three DASS-21 subscales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Depression,
    Anxiety,
    Stress,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Depression => "Depression",
            Category::Anxiety => "Anxiety",
            Category::Stress => "Stress",
        }
    }
}

/// A single questionnaire statement.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub id: u8,
    pub category: Category,
    pub text: &'static str,
}

/// Shared answer options: (label, value 0..=3).
pub const ANSWER_OPTIONS: [(&str, u8); 4] = [
    ("Did not apply to me at all", 0),
    ("Applied to me to some degree, or some of the time", 1),
    ("Applied to me to a considerable degree or a good part of time", 2),
    ("Applied to me very much or most of the time", 3),
];

/// The 21 fixed questions, in presentation order.
pub const QUESTIONS: [Question; 21] = [
    Question { id: 1, category: Category::Stress, text: "I found it hard to wind down" },
    Question { id: 2, category: Category::Anxiety, text: "I was aware of dryness of my mouth" },
    Question { id: 3, category: Category::Depression, text: "I couldn't seem to experience any positive feeling at all" },
    Question { id: 4, category: Category::Anxiety, text: "I experienced breathing difficulty (e.g. excessively rapid breathing, breathlessness in the absence of physical exertion)" },
    Question { id: 5, category: Category::Depression, text: "I found it difficult to work up the initiative to do things" },
    Question { id: 6, category: Category::Stress, text: "I tended to over-react to situations" },
    Question { id: 7, category: Category::Anxiety, text: "I experienced trembling (e.g. in the hands)" },
    Question { id: 8, category: Category::Stress, text: "I felt that I was using a lot of nervous energy" },
    Question { id: 9, category: Category::Anxiety, text: "I was worried about situations in which I might panic and make a fool of myself" },
    Question { id: 10, category: Category::Depression, text: "I felt that I had nothing to look forward to" },
    Question { id: 11, category: Category::Stress, text: "I found myself getting agitated" },
    Question { id: 12, category: Category::Stress, text: "I found it difficult to relax" },
    Question { id: 13, category: Category::Depression, text: "I felt down-hearted and blue" },
    Question { id: 14, category: Category::Stress, text: "I was intolerant of anything that kept me from getting on with what I was doing" },
    Question { id: 15, category: Category::Anxiety, text: "I felt I was close to panic" },
    Question { id: 16, category: Category::Depression, text: "I was unable to become enthusiastic about anything" },
    Question { id: 17, category: Category::Depression, text: "I felt I wasn't worth much as a person" },
    Question { id: 18, category: Category::Stress, text: "I felt that I was rather touchy" },
    Question { id: 19, category: Category::Anxiety, text: "I was aware of the action of my heart in the absence of physical exertion (e.g. sense of heart rate increase, heart missing a beat)" },
    Question { id: 20, category: Category::Anxiety, text: "I felt scared without any good reason" },
    Question { id: 21, category: Category::Depression, text: "I felt that life was meaningless" },
];

/// Selected answers, question id -> value. Held only until submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerSet {
    answers: BTreeMap<u8, u8>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. Ids are 1..=21, values 0..=3.
    pub fn set(&mut self, question_id: u8, value: u8) -> CoreResult<()> {
        if !(1..=21).contains(&question_id) {
            return Err(CoreError::InvalidAnswer(format!(
                "question id {} out of range",
                question_id
            )));
        }
        if value > 3 {
            return Err(CoreError::InvalidAnswer(format!(
                "value {} out of range for question {}",
                value, question_id
            )));
        }
        self.answers.insert(question_id, value);
        Ok(())
    }

    /// Answer for a question; unanswered questions count as 0 when scored.
    pub fn get(&self, question_id: u8) -> u8 {
        self.answers.get(&question_id).copied().unwrap_or(0)
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == QUESTIONS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_category_counts() {
        let count = |c: Category| QUESTIONS.iter().filter(|q| q.category == c).count();
        assert_eq!(count(Category::Depression), 7);
        assert_eq!(count(Category::Anxiety), 7);
        assert_eq!(count(Category::Stress), 7);
    }

    #[test]
    fn answers_validate_ranges() {
        let mut set = AnswerSet::new();
        assert!(set.set(1, 3).is_ok());
        assert!(set.set(0, 1).is_err());
        assert!(set.set(22, 1).is_err());
        assert!(set.set(5, 4).is_err());
        assert_eq!(set.get(1), 3);
        assert_eq!(set.get(2), 0); // unanswered counts as 0
        assert!(!set.is_complete());
    }
}
