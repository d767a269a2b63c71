//! Command-line parsing
//!
//! With no arguments the window opens; the remaining commands talk to the
//! backend directly and print to stdout.

/// Parsed command from the process arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the window (default)
    Gui,
    /// Print suggestions: search <ingredients...>
    Search { ingredients: String },
    /// Follow-up question: ask <recipe-id> <question...>
    Ask { recipe_id: String, question: String },
    /// Show effective settings: config
    Config,
    /// Write effective settings to the config file: config init
    ConfigInit,
    /// Show help: help
    Help,
    /// Bad invocation, with the message to print
    Invalid { message: String },
}

impl Command {
    /// Parse arguments (without the program name)
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let Some((cmd, rest)) = args.split_first() else {
            return Command::Gui;
        };
        let rest: Vec<&str> = rest.iter().map(|s| s.as_ref()).collect();

        match cmd.as_ref().to_lowercase().as_str() {
            "search" | "s" => {
                let ingredients = rest.join(" ").trim().to_string();
                if ingredients.is_empty() {
                    Command::Invalid {
                        message: "Usage: recipe-finder search <ingredients>".to_string(),
                    }
                } else {
                    Command::Search { ingredients }
                }
            }
            "ask" | "a" => match rest.split_first() {
                Some((id, words)) if !words.is_empty() => Command::Ask {
                    recipe_id: id.to_string(),
                    question: words.join(" ").trim().to_string(),
                },
                _ => Command::Invalid {
                    message: "Usage: recipe-finder ask <recipe-id> <question>".to_string(),
                },
            },
            "config" => match rest.first() {
                None => Command::Config,
                Some(&"init") => Command::ConfigInit,
                Some(other) => Command::Invalid {
                    message: format!("Unknown config action: {}", other),
                },
            },
            "gui" | "open" => Command::Gui,
            "help" | "--help" | "-h" => Command::Help,
            other => Command::Invalid {
                message: format!(
                    "Unknown command: {}. Run 'recipe-finder help' for usage.",
                    other
                ),
            },
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r#"Recipe Finder - recipe ideas from the ingredients you have

Usage: recipe-finder [command]

Commands:
  (none), gui                 Open the window
  search <ingredients>        Print recipe suggestions
  ask <recipe-id> <question>  Ask about a recipe from the latest search
  config                      Show effective settings
  config init                 Write effective settings to the config file
  help                        Show this help

Environment:
  RECIPE_FINDER_BACKEND_URL   Backend base URL (default http://127.0.0.1:5000)
  RECIPE_FINDER_TIMEOUT_SECS  Request timeout in seconds
  RUST_LOG                    Log filter, e.g. recipe_finder=debug"#
    }
}
