//! Named rule set registry.
//!
//! `set` on an existing name merges rather than replaces: new targets are
//! appended to the stored list for each source state. A failed `set` leaves
//! the registry untouched.
//!
//! The registry does no locking. Callers that share it across threads wrap
//! it in their own lock.

use crate::error::RuleError;
use crate::rules::{self, Adjacency, EmptyInputPolicy, RuleSet, StateId};
use std::collections::HashMap;

/// Registry of named transition rule sets.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rule_sets: HashMap<String, RuleSet>,
    policy: EmptyInputPolicy,
}

impl Registry {
    /// Creates an empty registry that accepts empty rule texts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given empty-input policy.
    pub fn with_policy(policy: EmptyInputPolicy) -> Self {
        Self {
            rule_sets: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> EmptyInputPolicy {
        self.policy
    }

    /// Parses `rules` and merges them into the rule set named `name`,
    /// creating it if needed.
    pub fn set(&mut self, name: &str, rules: &str) -> Result<(), RuleError> {
        let parsed = match rules::parse_with_policy(rules, self.policy) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    rule_set = name,
                    code = e.error_code(),
                    "Rejected rule set: {}",
                    e
                );
                return Err(e);
            }
        };

        match self.rule_sets.get_mut(name) {
            Some(existing) => {
                existing.merge(rules, parsed);
                tracing::debug!(
                    rule_set = name,
                    fragments = existing.fragments().len(),
                    "Merged rule set"
                );
            }
            None => {
                tracing::debug!(rule_set = name, sources = parsed.len(), "Created rule set");
                self.rule_sets
                    .insert(name.to_string(), RuleSet::new(rules, parsed));
            }
        }

        Ok(())
    }

    /// Removes the rule set named `name`. Returns whether one existed.
    pub fn del(&mut self, name: &str) -> bool {
        let removed = self.rule_sets.remove(name).is_some();
        if removed {
            tracing::debug!(rule_set = name, "Deleted rule set");
        }
        removed
    }

    /// Returns true if `from -> to` is allowed by the rule set `name`.
    ///
    /// Unknown names and states are simply not valid.
    pub fn is_transition_valid(&self, name: &str, from: StateId, to: StateId) -> bool {
        self.rule_sets
            .get(name)
            .map(|set| set.allows(from, to))
            .unwrap_or(false)
    }

    /// Returns the targets allowed from `from` in the rule set `name`.
    pub fn allowed_to(&self, name: &str, from: StateId) -> Option<&[StateId]> {
        self.rule_sets.get(name).and_then(|set| set.allowed_to(from))
    }

    /// Returns the full adjacency of the rule set `name`.
    pub fn transitions(&self, name: &str) -> Option<&Adjacency> {
        self.rule_sets.get(name).map(RuleSet::transitions)
    }

    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.rule_sets.get(name)
    }

    /// Returns the text supplied when `name` was first set.
    pub fn original(&self, name: &str) -> Option<&str> {
        self.rule_sets.get(name).map(RuleSet::original)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rule_sets.contains_key(name)
    }

    /// Lists registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rule_sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }

    pub fn clear(&mut self) {
        self.rule_sets.clear();
    }
}
