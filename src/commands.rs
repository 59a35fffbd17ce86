//! Command execution.

use crate::Commands;
use colored::Colorize;
use transval_core::{format_adjacency, parse_with_policy, Registry, RuleSet, StateId};

/// Result of a command: text to print and whether it succeeded.
#[derive(Debug)]
pub struct Output {
    pub text: String,
    pub success: bool,
}

impl Output {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

/// Executes a read-only command against the registry.
pub fn execute(registry: &Registry, cmd: Commands) -> Result<Output, Box<dyn std::error::Error>> {
    match cmd {
        Commands::Repl => unreachable!(),

        Commands::Check { name, from, to } => Ok(check(registry, &name, from, to)),

        Commands::Allowed { name, from } => Ok(allowed(registry, &name, from)),

        Commands::Show { name, json } => {
            let rule_set = lookup(registry, &name)?;
            if json {
                Ok(Output::ok(serde_json::to_string_pretty(rule_set)?))
            } else {
                Ok(Output::ok(format_rule_set(&name, rule_set)))
            }
        }

        Commands::List => Ok(Output::ok(list(registry))),

        Commands::Lint { rules } => Ok(lint(registry, &rules)),
    }
}

fn lookup<'a>(registry: &'a Registry, name: &str) -> Result<&'a RuleSet, String> {
    registry
        .get(name)
        .ok_or_else(|| format!("rule set not found: {}", name))
}

pub fn check(registry: &Registry, name: &str, from: StateId, to: StateId) -> Output {
    if registry.is_transition_valid(name, from, to) {
        Output::ok(format!("{} {} → {} in {}", "Valid".green(), from, to, name.cyan()))
    } else if !registry.contains(name) {
        Output::failed(format!(
            "{} {} → {} (unknown rule set {})",
            "Invalid".red(),
            from,
            to,
            name.cyan()
        ))
    } else {
        Output::failed(format!("{} {} → {} in {}", "Invalid".red(), from, to, name.cyan()))
    }
}

pub fn allowed(registry: &Registry, name: &str, from: StateId) -> Output {
    match registry.allowed_to(name, from) {
        Some(targets) => Output::ok(format!("{} → {}", from, join_states(targets).yellow())),
        None => Output::failed(format!("No transitions from {} in {}", from, name.cyan())),
    }
}

pub fn list(registry: &Registry) -> String {
    let names = registry.names();
    if names.is_empty() {
        return "No rule sets".yellow().to_string();
    }

    let mut output = String::new();
    for name in names {
        let sources = registry.transitions(name).map(|t| t.len()).unwrap_or(0);
        output.push_str(&format!("  {} ({} source states)\n", name.cyan(), sources));
    }
    output
}

/// Parses `rules` under the registry's policy and reports the canonical form.
pub fn lint(registry: &Registry, rules: &str) -> Output {
    match parse_with_policy(rules, registry.policy()) {
        Ok(adjacency) => Output::ok(format!(
            "{} {}",
            "OK".green(),
            format_adjacency(&adjacency)
        )),
        Err(e) => Output::failed(format!("{} {}", e.error_code().red(), e)),
    }
}

pub fn format_rule_set(name: &str, rule_set: &RuleSet) -> String {
    let mut output = format!("{}\n", format!("Rule set {}", name.cyan()).bold());
    output.push_str(&format!("  Original: {}\n", rule_set.original()));
    output.push_str(&format!("  Fragments: {}\n", rule_set.fragments().len()));
    output.push_str(&format!("  Canonical: {}\n", rule_set));
    for (from, targets) in rule_set.transitions() {
        output.push_str(&format!("  {:>6} → {}\n", from, join_states(targets)));
    }
    output
}

fn join_states(states: &[StateId]) -> String {
    states
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> Registry {
        colored::control::set_override(false);
        let mut registry = Registry::new();
        registry.set("n", "1=>2,3,4;2=>1,3;6=>7,8;7=>6,8").unwrap();
        registry
    }

    #[test]
    fn test_check() {
        let registry = sample_registry();
        assert!(check(&registry, "n", 1, 2).success);
        assert!(!check(&registry, "n", 1, 1).success);
        assert!(!check(&registry, "n", 10, 1).success);

        let output = check(&registry, "missing", 1, 2);
        assert!(!output.success);
        assert!(output.text.contains("unknown rule set"));
    }

    #[test]
    fn test_allowed() {
        let registry = sample_registry();
        let output = allowed(&registry, "n", 6);
        assert!(output.success);
        assert_eq!(output.text, "6 → 7, 8");
        assert!(!allowed(&registry, "n", 5).success);
    }

    #[test]
    fn test_lint() {
        let registry = sample_registry();
        let output = lint(&registry, " 2 => 3 ; 1=>2 ,3 ");
        assert!(output.success);
        assert_eq!(output.text, "OK 1=>2,3;2=>3");

        let output = lint(&registry, "1=>2=>3");
        assert!(!output.success);
        assert!(output.text.starts_with("WRONG_INPUT"));
    }

    #[test]
    fn test_show_json() {
        let registry = sample_registry();
        let output = execute(
            &registry,
            Commands::Show {
                name: "n".to_string(),
                json: true,
            },
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output.text).unwrap();
        assert_eq!(value["transitions"]["6"], serde_json::json!([7, 8]));
    }

    #[test]
    fn test_show_missing() {
        let registry = sample_registry();
        let result = execute(
            &registry,
            Commands::Show {
                name: "missing".to_string(),
                json: false,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_list() {
        let registry = sample_registry();
        assert!(list(&registry).contains("n (4 source states)"));
        assert_eq!(list(&Registry::new()), "No rule sets");
    }
}
