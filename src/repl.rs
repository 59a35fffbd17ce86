//! Interactive REPL.

use crate::commands;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::path::Path;
use transval_core::{Registry, StateId};

const HELP_TEXT: &str = r#"
Available commands:
  help                          Show this help

  set <name> <rules>            Parse rules and merge them into a rule set
  del <name>                    Delete a rule set
  show <name>                   Show a rule set
  list                          List all rule sets

  check <name> <from> <to>      Check whether a transition is allowed
  allowed <name> <from>         List states reachable from <from>

  lint <rules>                  Parse rules without storing them

  quit, exit                    Exit the REPL
"#;

pub fn run(registry: &mut Registry, history_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "transval".bold().cyan());
    println!("{} rule set(s) loaded.", registry.len());

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(config)?;
    let _ = rl.load_history(history_path);

    println!("Type 'help' for available commands.\n");

    loop {
        let prompt = format!("{} ", "transval>".cyan());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match execute_repl_command(registry, line) {
                    Ok(Some(output)) => println!("{}\n", output),
                    Ok(None) => break,
                    Err(e) => println!("{}: {}\n", "Error".red(), e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                println!("{}: {:?}", "Error".red(), err);
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(history_path) {
        tracing::debug!("Failed to save history: {}", e);
    }

    Ok(())
}

/// Runs one REPL line. `Ok(None)` means exit.
fn execute_repl_command(
    registry: &mut Registry,
    line: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Ok(Some(String::new()));
    }

    let cmd = parts[0].to_lowercase();
    let args = &parts[1..];

    match cmd.as_str() {
        "help" | "?" => Ok(Some(HELP_TEXT.to_string())),

        "quit" | "exit" | "q" => Ok(None),

        "set" | "s" => {
            if args.len() < 2 {
                return Ok(Some("Usage: set <name> <rules>".to_string()));
            }
            let name = args[0];
            let rules = args[1..].join(" ");
            let existed = registry.contains(name);
            registry.set(name, &rules)?;
            Ok(Some(format!(
                "{} {}",
                if existed {
                    "Merged into".yellow()
                } else {
                    "Created".green()
                },
                name.cyan()
            )))
        }

        "del" | "d" => {
            if args.is_empty() {
                return Ok(Some("Usage: del <name>".to_string()));
            }
            if registry.del(args[0]) {
                Ok(Some(format!("{} {}", "Deleted".green(), args[0].cyan())))
            } else {
                Ok(Some(format!("{} {}", "No rule set".yellow(), args[0].cyan())))
            }
        }

        "show" => {
            if args.is_empty() {
                return Ok(Some("Usage: show <name>".to_string()));
            }
            match registry.get(args[0]) {
                Some(rule_set) => Ok(Some(commands::format_rule_set(args[0], rule_set))),
                None => Err(format!("rule set not found: {}", args[0]).into()),
            }
        }

        "list" | "ls" => Ok(Some(commands::list(registry))),

        "check" | "c" => {
            if args.len() < 3 {
                return Ok(Some("Usage: check <name> <from> <to>".to_string()));
            }
            let from: StateId = args[1].parse()?;
            let to: StateId = args[2].parse()?;
            Ok(Some(commands::check(registry, args[0], from, to).text))
        }

        "allowed" | "a" => {
            if args.len() < 2 {
                return Ok(Some("Usage: allowed <name> <from>".to_string()));
            }
            let from: StateId = args[1].parse()?;
            Ok(Some(commands::allowed(registry, args[0], from).text))
        }

        "lint" | "l" => {
            if args.is_empty() {
                return Ok(Some("Usage: lint <rules>".to_string()));
            }
            Ok(Some(commands::lint(registry, &args.join(" ")).text))
        }

        _ => Ok(Some(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            cmd
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transval_core::{EmptyInputPolicy, RuleError, RuleErrorKind};

    fn run_line(registry: &mut Registry, line: &str) -> String {
        colored::control::set_override(false);
        execute_repl_command(registry, line).unwrap().unwrap()
    }

    #[test]
    fn test_set_merges_and_checks() {
        let mut registry = Registry::new();
        assert_eq!(run_line(&mut registry, "set x 1 => 2"), "Created x");
        assert_eq!(run_line(&mut registry, "set x 1=>3"), "Merged into x");

        assert_eq!(registry.allowed_to("x", 1), Some(&[2, 3][..]));
        assert!(run_line(&mut registry, "check x 1 3").starts_with("Valid"));
        assert!(run_line(&mut registry, "check x 3 1").starts_with("Invalid"));
        assert_eq!(run_line(&mut registry, "allowed x 1"), "1 → 2, 3");
    }

    #[test]
    fn test_set_error_propagates() {
        let mut registry = Registry::with_policy(EmptyInputPolicy::Reject);
        let err = execute_repl_command(&mut registry, "set x ;").unwrap_err();
        let err = err.downcast::<RuleError>().unwrap();
        assert_eq!(err.kind(), RuleErrorKind::EmptyInput);

        let err = execute_repl_command(&mut registry, "set x 1=>").unwrap_err();
        let err = err.downcast::<RuleError>().unwrap();
        assert_eq!(err.kind(), RuleErrorKind::TargetEmpty);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_del() {
        let mut registry = Registry::new();
        run_line(&mut registry, "set x 1=>2");
        assert_eq!(run_line(&mut registry, "del x"), "Deleted x");
        assert_eq!(run_line(&mut registry, "del x"), "No rule set x");
        assert!(!registry.is_transition_valid("x", 1, 2));
    }

    #[test]
    fn test_quit_and_unknown() {
        let mut registry = Registry::new();
        assert!(execute_repl_command(&mut registry, "quit").unwrap().is_none());
        assert!(run_line(&mut registry, "frobnicate").starts_with("Unknown command"));
        assert!(run_line(&mut registry, "check x").starts_with("Usage"));
    }

    #[test]
    fn test_bad_state_argument() {
        let mut registry = Registry::new();
        assert!(execute_repl_command(&mut registry, "check x one 2").is_err());
    }
}
