//! Transition rule DSL.
//!
//! A rule set is a `;`-separated list of rules, each mapping one source
//! state to one or more target states:
//!
//! ```text
//! 1 => 2, 3; 2 => 3; 6 => 7, 8
//! ```
//!
//! - `;` separates rules. Empty pieces (leading, trailing or repeated `;`) are skipped.
//! - `=>` separates the source state from its targets and must occur exactly once per rule.
//! - `,` separates targets. Empty targets are skipped, but a rule must keep at least one.
//! - Whitespace around any delimiter is insignificant.
//!
//! States are signed 64-bit integers. A source state that appears in several
//! rules gets the concatenation of their target lists, in encounter order.

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Separates rules within a rule set.
pub const RULE_SEPARATOR: &str = ";";

/// Separates the source state from its targets.
pub const TRANSITION_ARROW: &str = "=>";

/// Separates targets within a rule.
pub const TARGET_SEPARATOR: &str = ",";

/// A state identifier.
pub type StateId = i64;

/// Source state -> ordered target states.
///
/// Target lists keep insertion order and duplicates.
pub type Adjacency = BTreeMap<StateId, Vec<StateId>>;

/// How a rule set text that contains no rules is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyInputPolicy {
    /// No rules is a valid, empty rule set.
    #[default]
    Allow,
    /// No rules is rejected with [`RuleError::EmptyInput`].
    Reject,
}

/// Parses a rule set into its adjacency.
///
/// An empty text yields an empty adjacency. Parsing is all-or-nothing: the
/// first malformed rule fails the whole call.
pub fn parse(rules: &str) -> Result<Adjacency, RuleError> {
    let mut adjacency = Adjacency::new();

    for piece in rules.split(RULE_SEPARATOR) {
        let rule = piece.trim();
        if rule.is_empty() {
            continue;
        }

        let (from, targets) = parse_rule(rule)?;
        adjacency.entry(from).or_default().extend(targets);
    }

    Ok(adjacency)
}

/// Parses a rule set, applying the given empty-input policy.
pub fn parse_with_policy(rules: &str, policy: EmptyInputPolicy) -> Result<Adjacency, RuleError> {
    let adjacency = parse(rules)?;
    if adjacency.is_empty() && policy == EmptyInputPolicy::Reject {
        return Err(RuleError::EmptyInput);
    }
    Ok(adjacency)
}

/// Parses a single trimmed, non-empty rule.
fn parse_rule(rule: &str) -> Result<(StateId, Vec<StateId>), RuleError> {
    let mut parts = rule.split(TRANSITION_ARROW);
    let (from, to) = match (parts.next(), parts.next(), parts.next()) {
        (Some(from), Some(to), None) => (from.trim(), to.trim()),
        _ => return Err(RuleError::wrong_input(rule)),
    };

    let from: StateId = from.parse().map_err(|_| RuleError::wrong_input(rule))?;

    if to.is_empty() {
        return Err(RuleError::target_empty(rule));
    }

    let targets = parse_targets(to).map_err(|_| RuleError::wrong_input(rule))?;
    if targets.is_empty() {
        return Err(RuleError::target_empty(rule));
    }

    Ok((from, targets))
}

/// Parses a `,`-separated list of states.
///
/// Empty tokens are skipped, so a blank or comma-only text yields an empty
/// list. Any other malformed token fails with [`RuleError::WrongInput`].
pub fn parse_targets(text: &str) -> Result<Vec<StateId>, RuleError> {
    let mut targets = Vec::new();

    for token in text.split(TARGET_SEPARATOR) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let state = token
            .parse::<StateId>()
            .map_err(|_| RuleError::wrong_input(token))?;
        targets.push(state);
    }

    Ok(targets)
}

/// Renders an adjacency in canonical DSL form (`1=>2,3;2=>3`).
///
/// Keys are emitted in ascending order and targets in stored order. Source
/// states with no targets are omitted, since they cannot be expressed.
pub fn format_adjacency(adjacency: &Adjacency) -> String {
    adjacency
        .iter()
        .filter(|(_, targets)| !targets.is_empty())
        .map(|(from, targets)| {
            let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
            format!(
                "{}{}{}",
                from,
                TRANSITION_ARROW,
                targets.join(TARGET_SEPARATOR)
            )
        })
        .collect::<Vec<_>>()
        .join(RULE_SEPARATOR)
}

/// A named slot's accumulated rules.
///
/// Holds every text accepted for the slot, in order, and the merged
/// adjacency. The first accepted text is the rule set's original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    fragments: Vec<String>,
    transitions: Adjacency,
}

impl RuleSet {
    /// Creates a rule set from already parsed transitions.
    pub(crate) fn new(source: impl Into<String>, transitions: Adjacency) -> Self {
        Self {
            fragments: vec![source.into()],
            transitions,
        }
    }

    /// Appends a parsed fragment. Targets are appended per source state,
    /// never replaced or deduplicated.
    pub(crate) fn merge(&mut self, source: impl Into<String>, transitions: Adjacency) {
        self.fragments.push(source.into());
        for (from, targets) in transitions {
            self.transitions.entry(from).or_default().extend(targets);
        }
    }

    /// The text supplied when this rule set was created.
    pub fn original(&self) -> &str {
        self.fragments.first().map(String::as_str).unwrap_or("")
    }

    /// Every accepted text, oldest first.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn transitions(&self) -> &Adjacency {
        &self.transitions
    }

    /// Targets allowed from `from`, if any rule names it.
    pub fn allowed_to(&self, from: StateId) -> Option<&[StateId]> {
        self.transitions.get(&from).map(Vec::as_slice)
    }

    /// Returns true if `from -> to` appears in the rules.
    pub fn allows(&self, from: StateId, to: StateId) -> bool {
        self.allowed_to(from)
            .map(|targets| targets.contains(&to))
            .unwrap_or(false)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_adjacency(&self.transitions))
    }
}

impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s, parse(s)?))
    }
}
