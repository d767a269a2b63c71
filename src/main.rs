//! Recipe Finder: recipe ideas from the ingredients you have
//!
//! Desktop client for the recipe backend: suggestions, narrated instructions
//! and follow-up questions.
//!
//! Usage:
//!   recipe-finder                      - Open the window
//!   recipe-finder search <ingredients> - Print suggestions
//!   recipe-finder ask <id> <question>  - Ask about a recipe
//!   recipe-finder config [init]        - Show or write settings
//!   recipe-finder help                 - Show help

mod app;
mod audio;
mod backend;
mod cli;
mod config;
mod session;
mod ui;

use std::env;
use std::time::Duration;

use app::RecipeFinder;
use backend::{BackendClient, RecipeId};
use cli::Command;
use config::Settings;
use iced::{window, Size};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> iced::Result {
    // Use try_init to avoid panic if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().skip(1).collect();
    let settings = Settings::load();

    match Command::parse(&args) {
        Command::Gui => start_gui(settings),
        command => {
            handle_cli_command(command, &settings);
            Ok(())
        }
    }
}

fn handle_cli_command(command: Command, settings: &Settings) {
    match command {
        Command::Search { ingredients } => {
            let client = backend_client(settings);
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(async {
                match client.search_recipes(&ingredients).await {
                    Ok(response) => {
                        if let Some(error) = response.error {
                            eprintln!("{}", error);
                        } else if response.recipes.is_empty() {
                            println!("No recipes found for these ingredients.");
                        }
                        for recipe in &response.recipes {
                            if recipe.is_unprocessed() {
                                println!("! Could not process a suggestion: {}", recipe.name);
                                continue;
                            }
                            println!("== {} [{}]", recipe.name, recipe.id);
                            println!("{}\n", recipe.ingredients_text);
                            println!("{}\n", recipe.instructions_text);
                        }
                    }
                    Err(e) => eprintln!("Error fetching recipes: {}", e),
                }
            });
        }
        Command::Ask { recipe_id, question } => {
            let client = backend_client(settings);
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(async {
                match client.ask_question(&RecipeId::new(recipe_id), &question).await {
                    Ok(response) => match (response.answer, response.error) {
                        (Some(answer), _) => println!("{}", answer),
                        (None, Some(error)) => eprintln!("{}", error),
                        (None, None) => eprintln!("Could not get an answer."),
                    },
                    Err(e) => eprintln!("Error: {}", e),
                }
            });
        }
        Command::Config => {
            println!("Config file: {}", Settings::path().display());
            match serde_json::to_string_pretty(settings) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Command::ConfigInit => {
            let path = Settings::path();
            match settings.save_to(&path) {
                Ok(()) => println!("Wrote {}", path.display()),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Command::Help => println!("{}", Command::help_text()),
        Command::Invalid { message } => eprintln!("{}", message),
        Command::Gui => {}
    }
}

fn backend_client(settings: &Settings) -> BackendClient {
    let timeout = Duration::from_secs(settings.request_timeout_secs);
    BackendClient::with_timeout(&settings.backend_url, timeout).unwrap_or_else(|e| {
        tracing::warn!("Could not configure HTTP client ({}), using defaults", e);
        BackendClient::new(&settings.backend_url)
    })
}

fn start_gui(settings: Settings) -> iced::Result {
    tracing::info!("Starting Recipe Finder");

    let size = Size::new(settings.window_width, settings.window_height);
    let backend = backend_client(&settings);
    iced::application("Recipe Finder", RecipeFinder::update, RecipeFinder::view)
        .subscription(RecipeFinder::subscription)
        .theme(RecipeFinder::theme)
        .window(window::Settings {
            size,
            position: window::Position::Centered,
            resizable: true,
            ..Default::default()
        })
        .antialiasing(true)
        .run_with(move || RecipeFinder::new(backend))
}
