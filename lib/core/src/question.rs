//! Question banks.
//!
//! Two immutable banks ship with the crate: 30 questions profiling an
//! individual and 20 profiling an organization. Question ids and option keys
//! are the stable contract the scoring tables rely on; titles and scenario
//! wording are display content.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::answer::Answer;
use crate::config::{BudgetPolicy, ValidationPolicy};
use crate::dimension::Dimension;
use crate::error::{Error, Result};

const INDIVIDUAL_BANK_JSON: &str = include_str!("../data/individual_bank.json");
const ORGANIZATION_BANK_JSON: &str = include_str!("../data/organization_bank.json");

/// Which questionnaire a bank, table or answer set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankKind {
    Individual,
    Organization,
}

impl fmt::Display for BankKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankKind::Individual => f.write_str("individual"),
            BankKind::Organization => f.write_str("organization"),
        }
    }
}

impl FromStr for BankKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "individual" | "candidate" | "career" => Ok(BankKind::Individual),
            "organization" | "company" => Ok(BankKind::Organization),
            other => Err(Error::QuestionBank(format!("unknown bank '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Choice,
    Ranking,
    Budget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub title: String,
    pub scenario: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<QuestionOption>,
    /// Axes this question is meant to probe. Display only; scoring is table-driven.
    pub dimensions: Vec<Dimension>,
}

impl Question {
    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|o| o.key == key)
    }

    pub fn option_keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.key.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct BankFile {
    bank: BankKind,
    version: u32,
    questions: Vec<Question>,
}

/// An ordered, immutable list of questions with id lookup.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    kind: BankKind,
    version: u32,
    questions: Vec<Question>,
    index: AHashMap<String, usize>,
}

impl QuestionBank {
    /// The built-in individual (candidate) bank.
    pub fn individual() -> Result<Self> {
        Self::from_json_str(INDIVIDUAL_BANK_JSON)
    }

    /// The built-in organization bank.
    pub fn organization() -> Result<Self> {
        Self::from_json_str(ORGANIZATION_BANK_JSON)
    }

    pub fn builtin(kind: BankKind) -> Result<Self> {
        match kind {
            BankKind::Individual => Self::individual(),
            BankKind::Organization => Self::organization(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let file: BankFile =
            serde_json::from_str(s).map_err(|e| Error::QuestionBank(e.to_string()))?;

        let mut index = AHashMap::with_capacity(file.questions.len());
        for (i, q) in file.questions.iter().enumerate() {
            if q.options.is_empty() {
                return Err(Error::QuestionBank(format!("question {} has no options", q.id)));
            }
            if index.insert(q.id.clone(), i).is_some() {
                return Err(Error::QuestionBank(format!("duplicate question id {}", q.id)));
            }
        }

        Ok(Self {
            kind: file.bank,
            version: file.version,
            questions: file.questions,
            index,
        })
    }

    #[inline]
    pub fn kind(&self) -> BankKind {
        self.kind
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.index.get(id).map(|&i| &self.questions[i])
    }

    /// Check answers against the bank's question shapes.
    ///
    /// Scoring itself never needs this: it tolerates unknown ids and takes
    /// answers as given. Callers at an input boundary use it to reject
    /// malformed submissions before they are stored.
    pub fn validate_answers(&self, answers: &[Answer], policy: &ValidationPolicy) -> Result<()> {
        for answer in answers {
            let question = self
                .get(answer.question_id())
                .ok_or_else(|| Error::UnknownQuestion(answer.question_id().to_string()))?;
            validate_answer(question, answer, policy.budget_policy)?;
        }
        Ok(())
    }
}

fn validate_answer(question: &Question, answer: &Answer, budget_policy: BudgetPolicy) -> Result<()> {
    let qid = question.id.as_str();
    if answer.question_type() != question.question_type {
        return Err(Error::invalid_answer(
            qid,
            format!(
                "expected a {:?} answer, got {:?}",
                question.question_type,
                answer.question_type()
            ),
        ));
    }

    match answer {
        Answer::Choice { selected_key, .. } => {
            if !question.has_option(selected_key) {
                return Err(Error::invalid_answer(qid, format!("unknown option '{}'", selected_key)));
            }
        }
        Answer::Ranking { ranking, .. } => {
            let mut seen = AHashSet::with_capacity(ranking.len());
            for key in ranking {
                if !question.has_option(key) {
                    return Err(Error::invalid_answer(qid, format!("unknown option '{}'", key)));
                }
                if !seen.insert(key.as_str()) {
                    return Err(Error::invalid_answer(qid, format!("option '{}' ranked twice", key)));
                }
            }
            if seen.len() != question.options.len() {
                return Err(Error::invalid_answer(
                    qid,
                    format!("ranking covers {} of {} options", seen.len(), question.options.len()),
                ));
            }
        }
        Answer::Budget { allocations, .. } => {
            for (key, pct) in allocations {
                if !question.has_option(key) {
                    return Err(Error::invalid_answer(qid, format!("unknown option '{}'", key)));
                }
                if !(0..=100).contains(pct) {
                    return Err(Error::invalid_answer(
                        qid,
                        format!("allocation {} for '{}' is outside 0..=100", pct, key),
                    ));
                }
            }
            let total: i32 = allocations.values().sum();
            if budget_policy == BudgetPolicy::Reject && total != 100 {
                return Err(Error::invalid_answer(
                    qid,
                    format!("allocations sum to {}, expected 100", total),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_banks_load() {
        let individual = QuestionBank::individual().unwrap();
        assert_eq!(individual.kind(), BankKind::Individual);
        assert_eq!(individual.len(), 30);

        let organization = QuestionBank::organization().unwrap();
        assert_eq!(organization.kind(), BankKind::Organization);
        assert_eq!(organization.len(), 20);
    }

    #[test]
    fn test_question_lookup_and_types() {
        let bank = QuestionBank::individual().unwrap();
        assert_eq!(bank.get("Q01").unwrap().question_type, QuestionType::Choice);
        assert_eq!(bank.get("Q09").unwrap().question_type, QuestionType::Ranking);
        assert_eq!(bank.get("Q10").unwrap().question_type, QuestionType::Budget);
        assert!(bank.get("Q99").is_none());
        assert_eq!(bank.questions()[0].id, "Q01");
    }

    #[test]
    fn test_validate_accepts_well_formed_answers() {
        let bank = QuestionBank::individual().unwrap();
        let answers = vec![
            Answer::choice("Q01", "A"),
            Answer::ranking("Q09", ["B", "A", "C", "D", "E"]),
            Answer::budget("Q10", [("A", 20), ("B", 30), ("C", 10), ("D", 20), ("E", 20)]),
        ];
        let policy = ValidationPolicy { strict: true, budget_policy: BudgetPolicy::Reject };
        assert!(bank.validate_answers(&answers, &policy).is_ok());
    }

    #[test]
    fn test_validate_rejects_shape_violations() {
        let bank = QuestionBank::individual().unwrap();
        let policy = ValidationPolicy::default();

        let wrong_type = [Answer::choice("Q09", "A")];
        assert!(matches!(
            bank.validate_answers(&wrong_type, &policy),
            Err(Error::InvalidAnswer { .. })
        ));

        let duplicate = [Answer::ranking("Q24", ["A", "A", "B", "C"])];
        assert!(bank.validate_answers(&duplicate, &policy).is_err());

        let incomplete = [Answer::ranking("Q24", ["A", "B"])];
        assert!(bank.validate_answers(&incomplete, &policy).is_err());

        let unknown = [Answer::choice("Q77", "A")];
        assert!(matches!(
            bank.validate_answers(&unknown, &policy),
            Err(Error::UnknownQuestion(_))
        ));
    }

    #[test]
    fn test_budget_sum_policy() {
        let bank = QuestionBank::individual().unwrap();
        let short = [Answer::budget("Q27", [("A", 50), ("B", 20)])];

        let permissive = ValidationPolicy::default();
        assert!(bank.validate_answers(&short, &permissive).is_ok());

        let reject = ValidationPolicy { strict: true, budget_policy: BudgetPolicy::Reject };
        assert!(bank.validate_answers(&short, &reject).is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"bank": "individual", "version": 1, "questions": [
            {"id": "X", "title": "", "scenario": "", "type": "choice",
             "options": [{"key": "A", "text": ""}], "dimensions": ["pace"]},
            {"id": "X", "title": "", "scenario": "", "type": "choice",
             "options": [{"key": "A", "text": ""}], "dimensions": ["pace"]}
        ]}"#;
        assert!(matches!(QuestionBank::from_json_str(json), Err(Error::QuestionBank(_))));
    }
}
