//! Decision points: where the conversion asks an operator to pick a candidate.
//!
//! The engine only sees [`Operator::decide`]. Whether the answer comes from
//! a terminal, an answers file or a test script is up to the implementor.

use std::collections::VecDeque;
use std::fmt;

use tracing::warn;

use crate::catalog::Catalog;
use crate::id::{EnvironmentId, MaterialId};

/// An operator's answer to one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// 1-based index into the presented candidates.
    Pick(usize),
    /// Leave this step untouched.
    Skip,
    /// Input that could not be read as an index.
    Unreadable(String),
}

impl Decision {
    /// Parse one line of operator input: empty means skip, otherwise a 1-based index.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Decision::Skip;
        }
        match trimmed.parse::<usize>() {
            Ok(n) => Decision::Pick(n),
            Err(_) => Decision::Unreadable(trimmed.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    Environment,
    ReplacementProduct,
    ReplacedIntermediate,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DecisionKind::Environment => "select new environment",
            DecisionKind::ReplacementProduct => "select replacement P2",
            DecisionKind::ReplacedIntermediate => "select which current P1 to replace",
        };
        f.write_str(text)
    }
}

/// What the operator is being asked, with the candidates in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    Environment {
        current: EnvironmentId,
        candidates: &'a [EnvironmentId],
    },
    /// Pick a P2 product to take the place of `current`.
    ReplacementProduct {
        current: MaterialId,
        candidates: &'a [MaterialId],
    },
    /// Pick which P1 currently in use should become `required`.
    ReplacedIntermediate {
        required: MaterialId,
        candidates: &'a [MaterialId],
    },
}

impl Prompt<'_> {
    pub fn kind(&self) -> DecisionKind {
        match self {
            Prompt::Environment { .. } => DecisionKind::Environment,
            Prompt::ReplacementProduct { .. } => DecisionKind::ReplacementProduct,
            Prompt::ReplacedIntermediate { .. } => DecisionKind::ReplacedIntermediate,
        }
    }

    pub fn candidate_count(&self) -> usize {
        match self {
            Prompt::Environment { candidates, .. } => candidates.len(),
            Prompt::ReplacementProduct { candidates, .. }
            | Prompt::ReplacedIntermediate { candidates, .. } => candidates.len(),
        }
    }
}

/// Source of decisions for a conversion.
pub trait Operator {
    fn decide(&mut self, prompt: &Prompt<'_>) -> Decision;
}

impl<T: Operator + ?Sized> Operator for &mut T {
    fn decide(&mut self, prompt: &Prompt<'_>) -> Decision {
        (**self).decide(prompt)
    }
}

/// Operator input that does not name a presented candidate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("selection {index} is outside 1..={len}")]
    OutOfRange { index: usize, len: usize },
    #[error("'{0}' is not a number")]
    NotANumber(String),
}

/// Map a decision onto a 0-based candidate index.
pub fn resolve_selection(decision: Decision, len: usize) -> Result<Option<usize>, SelectionError> {
    match decision {
        Decision::Skip => Ok(None),
        Decision::Pick(index) if (1..=len).contains(&index) => Ok(Some(index - 1)),
        Decision::Pick(index) => Err(SelectionError::OutOfRange { index, len }),
        Decision::Unreadable(text) => Err(SelectionError::NotANumber(text)),
    }
}

/// Ask `operator` and resolve the answer against the prompt's candidates.
pub fn ask<O: Operator + ?Sized>(
    operator: &mut O,
    prompt: &Prompt<'_>,
) -> Result<Option<usize>, SelectionError> {
    if prompt.candidate_count() == 0 {
        return Ok(None);
    }
    resolve_selection(operator.decide(prompt), prompt.candidate_count())
}

/// Offer every catalog environment other than `current`, in catalog order.
pub fn select_environment<O: Operator + ?Sized>(
    catalog: &Catalog,
    current: EnvironmentId,
    operator: &mut O,
) -> Result<Option<EnvironmentId>, SelectionError> {
    let candidates: Vec<EnvironmentId> = catalog
        .environments()
        .map(|(id, _)| id)
        .filter(|&id| id != current)
        .collect();
    let prompt = Prompt::Environment {
        current,
        candidates: &candidates,
    };
    match ask(operator, &prompt) {
        Ok(choice) => Ok(choice.map(|i| candidates[i])),
        Err(e) => {
            warn!(error = %e, "environment selection rejected");
            Err(e)
        }
    }
}

/// Replays a fixed list of decisions, then skips everything.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<Decision>,
    asked: Vec<DecisionKind>,
}

impl ScriptedOperator {
    pub fn new(answers: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Build from raw response lines, using the console grammar.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(lines.into_iter().map(Decision::parse))
    }

    /// Prompts seen so far, in order.
    pub fn asked(&self) -> &[DecisionKind] {
        &self.asked
    }
}

impl Operator for ScriptedOperator {
    fn decide(&mut self, prompt: &Prompt<'_>) -> Decision {
        self.asked.push(prompt.kind());
        self.answers.pop_front().unwrap_or(Decision::Skip)
    }
}

/// Declines every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineAll;

impl Operator for DeclineAll {
    fn decide(&mut self, _prompt: &Prompt<'_>) -> Decision {
        Decision::Skip
    }
}
