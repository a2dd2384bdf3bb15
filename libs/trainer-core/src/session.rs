//! Per-exercise attempt session.
//!
//! ```text
//! Answering --correct--> Solved
//! Answering --incorrect, attempts < max--> Answering
//! Answering --incorrect, attempts == max--> Revealed
//! Answering --digits for a number--> AwaitingNumberWord
//! any --reset--> Answering
//! ```
//!
//! `Solved` and `Revealed` are terminal: further submits are ignored. This
//! guard is what makes a duplicated submit event harmless.

use crate::error::ScoringError;
use crate::scoring;
use crate::types::{Answer, Exercise, ExerciseContent};
use crate::validators::{self, Outcome, Verdict};
use serde::{Deserialize, Serialize};

/// Session phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Answering,
    AwaitingNumberWord { expected: String },
    Solved,
    Revealed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Solved | Self::Revealed)
    }
}

/// What a submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The session was already finished; nothing changed.
    Ignored,
    /// The answer was evaluated.
    Evaluated(Verdict),
}

impl SubmitOutcome {
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            Self::Ignored => None,
            Self::Evaluated(v) => Some(v),
        }
    }
}

/// Data needed to record a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub correct: bool,
    pub attempts: u32,
    pub score: u8,
}

/// Attempt state for one presented exercise.
#[derive(Debug, Clone)]
pub struct ExerciseSession<'a> {
    exercise: &'a Exercise,
    max_attempts: u32,
    attempts: u32,
    is_correct: Option<bool>,
    phase: Phase,
    selection: Option<Answer>,
    last_verdict: Option<Verdict>,
}

impl<'a> ExerciseSession<'a> {
    /// Start a session. `max_attempts` below 1 is raised to 1.
    pub fn new(exercise: &'a Exercise, max_attempts: u32) -> Self {
        Self {
            exercise,
            max_attempts: max_attempts.max(1),
            attempts: 0,
            is_correct: None,
            phase: Phase::Answering,
            selection: None,
            last_verdict: None,
        }
    }

    pub fn exercise(&self) -> &'a Exercise {
        self.exercise
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn show_solution(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn selection(&self) -> Option<&Answer> {
        self.selection.as_ref()
    }

    pub fn last_verdict(&self) -> Option<&Verdict> {
        self.last_verdict.as_ref()
    }

    /// Attempts left before the solution is revealed.
    pub fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Store the learner's current selection. Ignored once finished.
    pub fn select(&mut self, answer: Answer) {
        if self.phase.is_terminal() {
            return;
        }
        self.selection = Some(answer);
    }

    /// Submit the current selection. Nothing selected counts as an empty answer.
    pub fn submit(&mut self) -> SubmitOutcome {
        let answer = self
            .selection
            .clone()
            .unwrap_or_else(|| Answer::empty_for(self.exercise.exercise_type));
        self.submit_answer(&answer)
    }

    /// Evaluate an answer and advance the state machine.
    pub fn submit_answer(&mut self, answer: &Answer) -> SubmitOutcome {
        if self.phase.is_terminal() {
            return SubmitOutcome::Ignored;
        }

        let verdict = match &self.phase {
            Phase::AwaitingNumberWord { expected } => match answer {
                Answer::Text(text) => validators::validate_number_word(expected, text),
                _ => Verdict::incorrect(),
            },
            _ => validators::validate(&self.exercise.content, answer),
        };

        match &verdict.outcome {
            Outcome::Correct => {
                self.attempts += 1;
                self.is_correct = Some(true);
                self.phase = Phase::Solved;
            }
            Outcome::Incorrect => {
                self.attempts += 1;
                self.is_correct = Some(false);
                if self.attempts >= self.max_attempts {
                    self.phase = Phase::Revealed;
                }
            }
            Outcome::WrongCase => {}
            Outcome::NumberWordRequired { expected } => {
                self.phase = Phase::AwaitingNumberWord {
                    expected: expected.clone(),
                };
            }
        }

        self.last_verdict = Some(verdict.clone());
        SubmitOutcome::Evaluated(verdict)
    }

    /// Back to a fresh `Answering` state.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.is_correct = None;
        self.phase = Phase::Answering;
        self.selection = None;
        self.last_verdict = None;
    }

    /// Star rating of a solved session.
    pub fn stars(&self) -> Option<u8> {
        match self.phase {
            Phase::Solved => scoring::stars(i64::from(self.attempts)).ok(),
            _ => None,
        }
    }

    /// Outcome of a finished session, `None` while still answering.
    pub fn outcome(&self) -> Result<Option<SessionOutcome>, ScoringError> {
        let correct = match self.phase {
            Phase::Solved => true,
            Phase::Revealed => false,
            _ => return Ok(None),
        };
        Ok(Some(SessionOutcome {
            correct,
            attempts: self.attempts,
            score: scoring::result_score(correct, self.attempts)?,
        }))
    }

    /// The solution to display once the session is finished.
    pub fn solution(&self) -> Option<Answer> {
        if !self.show_solution() {
            return None;
        }
        validators::canonical_answer(&self.exercise.content)
    }

    /// Text shown for a fill-in-the-blank hint, if the content has one.
    pub fn hint(&self) -> Option<&'a str> {
        match &self.exercise.content {
            ExerciseContent::FillBlank { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}
