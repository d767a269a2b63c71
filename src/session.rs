//! View controller state
//!
//! Everything the window shows is derived from [`Session`]: panel visibility,
//! trigger labels, messages and the recipe list. Flows that need the backend
//! return a [`Request`] instead of performing I/O; the caller runs it and feeds
//! the outcome back through the matching `*_finished` method together with the
//! request's [`Ticket`]. Outcomes whose ticket is no longer pending are dropped.

use crate::audio::{Playback, PlaybackEvent};
use crate::backend::types::{AnswerResponse, SearchResponse};
use crate::backend::{RecipeId, RecipeSummary};

/// User-facing strings
pub mod labels {
    pub const LISTEN: &str = "Listen to instructions";
    pub const GENERATING: &str = "Generating audio...";
    pub const PLAYING: &str = "Playing...";
    pub const ASK: &str = "Ask";
    pub const ASKING: &str = "Asking...";

    pub const SEARCHING: &str = "Searching for recipes... this may take a moment.";
    pub const EMPTY_INGREDIENTS: &str = "Please enter some ingredients.";
    pub const NO_RECIPES: &str = "No recipes found for these ingredients.";
    pub const NO_RECIPE_SELECTED: &str = "No recipe selected.";
    pub const AUDIO_UNAVAILABLE: &str = "Could not get the audio.";
    pub const PLAYBACK_FAILED: &str = "Error loading or playing the audio.";
    pub const QUESTION_PROMPT: &str =
        "Please type a question and make sure a recipe is selected.";
    pub const NO_ANSWER: &str = "Could not get an answer.";
}

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Backend call a flow wants performed
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Search {
        ticket: Ticket,
        ingredients: String,
    },
    Audio {
        ticket: Ticket,
        recipe_id: RecipeId,
    },
    Question {
        ticket: Ticket,
        recipe_id: RecipeId,
        question: String,
    },
}

/// Result of the audio request once the file has been fetched
#[derive(Debug, Clone)]
pub enum AudioOutcome {
    /// Downloaded audio, ready to play
    Ready(Vec<u8>),
    /// Backend answered without an audio reference
    Unavailable(Option<String>),
}

/// One line of the rendered recipe list
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    /// Selectable recipe, `index` into the last search results
    Recipe { index: usize, name: String },
    /// Non-selectable notice for an unprocessed suggestion
    Notice(String),
}

/// Label and enabled state of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub label: &'static str,
    pub enabled: bool,
}

impl Trigger {
    const fn idle(label: &'static str) -> Self {
        Self { label, enabled: true }
    }

    const fn busy(label: &'static str) -> Self {
        Self { label, enabled: false }
    }
}

/// Kind of a line in the status area under the ingredients input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Busy,
    Error,
}

/// Text of the recipe shown in the detail view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDetail {
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
}

pub struct Session<P: Playback> {
    ingredients_input: String,
    question_input: String,

    loading: Option<String>,
    error: Option<String>,
    audio_error: Option<String>,
    question_prompt: Option<String>,
    answer: Option<String>,

    results_visible: bool,
    detail_visible: bool,
    qa_visible: bool,
    player_visible: bool,

    list: Vec<ListEntry>,
    detail: RecipeDetail,
    play_trigger: Trigger,
    ask_trigger: Trigger,

    current_recipe_id: Option<RecipeId>,
    last_recipes: Vec<RecipeSummary>,

    player: P,
    next_ticket: u64,
    pending_search: Option<Ticket>,
    pending_audio: Option<Ticket>,
    pending_question: Option<Ticket>,
}

impl<P: Playback> Session<P> {
    pub fn new(player: P) -> Self {
        Self {
            ingredients_input: String::new(),
            question_input: String::new(),
            loading: None,
            error: None,
            audio_error: None,
            question_prompt: None,
            answer: None,
            results_visible: false,
            detail_visible: false,
            qa_visible: false,
            player_visible: false,
            list: Vec::new(),
            detail: RecipeDetail::default(),
            play_trigger: Trigger::idle(labels::LISTEN),
            ask_trigger: Trigger::idle(labels::ASK),
            current_recipe_id: None,
            last_recipes: Vec::new(),
            player,
            next_ticket: 0,
            pending_search: None,
            pending_audio: None,
            pending_question: None,
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    pub fn set_ingredients(&mut self, value: String) {
        self.ingredients_input = value;
    }

    pub fn set_question(&mut self, value: String) {
        self.question_input = value;
        self.question_prompt = None;
    }

    // ========================================================================
    // Search flow
    // ========================================================================

    /// Validate the ingredients and start a search
    pub fn submit_search(&mut self) -> Option<Request> {
        let ingredients = self.ingredients_input.trim().to_string();
        if ingredients.is_empty() {
            self.show_error(labels::EMPTY_INGREDIENTS.to_string());
            return None;
        }

        self.clear_messages();
        self.loading = Some(labels::SEARCHING.to_string());
        self.results_visible = false;
        self.detail_visible = false;
        self.qa_visible = false;
        self.answer = None;
        self.list.clear();
        self.leave_recipe();

        let ticket = self.issue();
        self.pending_search = Some(ticket);
        tracing::info!("Searching recipes for: {}", ingredients);
        Some(Request::Search { ticket, ingredients })
    }

    pub fn search_finished(&mut self, ticket: Ticket, result: Result<SearchResponse, String>) {
        if self.pending_search != Some(ticket) {
            tracing::debug!("Dropping stale search response {:?}", ticket);
            return;
        }
        self.pending_search = None;
        self.loading = None;

        let result = result.map(|response| SearchResponse {
            error: non_empty(response.error),
            ..response
        });
        match result {
            Err(message) => {
                tracing::error!("Recipe search failed: {}", message);
                self.show_error(format!("Error fetching recipes: {}", message));
            }
            Ok(SearchResponse { error: Some(error), .. }) => {
                tracing::warn!("Backend reported: {}", error);
                self.show_error(error);
            }
            Ok(SearchResponse { recipes, .. }) if !recipes.is_empty() => {
                tracing::info!("Received {} recipe suggestions", recipes.len());
                self.display_recipes(recipes);
                self.results_visible = true;
            }
            Ok(_) => self.show_error(labels::NO_RECIPES.to_string()),
        }
    }

    fn display_recipes(&mut self, recipes: Vec<RecipeSummary>) {
        self.list = recipes
            .iter()
            .enumerate()
            .map(|(index, recipe)| {
                if recipe.is_unprocessed() {
                    tracing::warn!(
                        "Unprocessed recipe {}: {}",
                        recipe.id,
                        recipe.raw_text.as_deref().unwrap_or("")
                    );
                    ListEntry::Notice(format!(
                        "Could not process a suggestion: {}. Try refining your ingredients.",
                        recipe.name
                    ))
                } else {
                    ListEntry::Recipe {
                        index,
                        name: recipe.name.clone(),
                    }
                }
            })
            .collect();
        self.last_recipes = recipes;
    }

    // ========================================================================
    // Detail selection / back navigation
    // ========================================================================

    /// Show the recipe at `index` of the last search results
    pub fn select_recipe(&mut self, index: usize) {
        let Some(recipe) = self.last_recipes.get(index) else {
            return;
        };
        if recipe.is_unprocessed() {
            return;
        }

        self.current_recipe_id = Some(recipe.id.clone());
        self.detail = RecipeDetail {
            name: recipe.name.clone(),
            ingredients: recipe.ingredients_text.clone(),
            instructions: recipe.instructions_text.clone(),
        };
        self.detail_visible = true;
        self.results_visible = false;

        self.reset_audio();
        self.reset_questions();
        self.qa_visible = true;
    }

    pub fn back_to_list(&mut self) {
        self.detail_visible = false;
        self.results_visible = !self.last_recipes.is_empty();
        self.qa_visible = false;
        self.leave_recipe();
    }

    fn leave_recipe(&mut self) {
        self.current_recipe_id = None;
        self.reset_audio();
        self.reset_questions();
    }

    fn reset_audio(&mut self) {
        self.player.stop();
        self.player_visible = false;
        self.audio_error = None;
        self.play_trigger = Trigger::idle(labels::LISTEN);
        self.pending_audio = None;
    }

    fn reset_questions(&mut self) {
        self.answer = None;
        self.question_input.clear();
        self.question_prompt = None;
        self.ask_trigger = Trigger::idle(labels::ASK);
        self.pending_question = None;
    }

    // ========================================================================
    // Audio flow
    // ========================================================================

    pub fn request_audio(&mut self) -> Option<Request> {
        let Some(recipe_id) = self.current_recipe_id.clone() else {
            self.audio_error = Some(labels::NO_RECIPE_SELECTED.to_string());
            return None;
        };
        if !self.play_trigger.enabled {
            return None;
        }

        self.clear_messages();
        self.play_trigger = Trigger::busy(labels::GENERATING);

        let ticket = self.issue();
        self.pending_audio = Some(ticket);
        tracing::info!("Requesting audio for recipe {}", recipe_id);
        Some(Request::Audio { ticket, recipe_id })
    }

    pub fn audio_finished(&mut self, ticket: Ticket, result: Result<AudioOutcome, String>) {
        if self.pending_audio != Some(ticket) {
            tracing::debug!("Dropping stale audio response {:?}", ticket);
            return;
        }
        self.pending_audio = None;

        match result {
            Ok(AudioOutcome::Ready(bytes)) => {
                self.player.play(bytes);
                self.player_visible = true;
                self.play_trigger = Trigger::busy(labels::PLAYING);
            }
            Ok(AudioOutcome::Unavailable(error)) => {
                self.audio_error = Some(
                    non_empty(error).unwrap_or_else(|| labels::AUDIO_UNAVAILABLE.to_string()),
                );
                self.play_trigger = Trigger::idle(labels::LISTEN);
            }
            Err(message) => {
                tracing::error!("Audio request failed: {}", message);
                self.audio_error = Some(format!("Error fetching audio: {}", message));
                self.play_trigger = Trigger::idle(labels::LISTEN);
            }
        }
    }

    /// Pick up completion or failure of the playing narration
    pub fn poll_playback(&mut self) {
        match self.player.poll_event() {
            Some(PlaybackEvent::Finished) => {
                tracing::debug!("Narration finished");
                self.play_trigger = Trigger::idle(labels::LISTEN);
            }
            Some(PlaybackEvent::Failed(reason)) => {
                tracing::warn!("Narration failed: {}", reason);
                self.audio_error = Some(labels::PLAYBACK_FAILED.to_string());
                self.play_trigger = Trigger::idle(labels::LISTEN);
            }
            None => {}
        }
    }

    pub fn is_playing(&self) -> bool {
        self.player.has_source() && self.play_trigger.label == labels::PLAYING
    }

    // ========================================================================
    // Question flow
    // ========================================================================

    pub fn ask_question(&mut self) -> Option<Request> {
        if !self.ask_trigger.enabled {
            return None;
        }
        let question = self.question_input.trim().to_string();
        let recipe_id = match &self.current_recipe_id {
            Some(id) if !question.is_empty() => id.clone(),
            _ => {
                self.question_prompt = Some(labels::QUESTION_PROMPT.to_string());
                return None;
            }
        };

        self.question_prompt = None;
        self.ask_trigger = Trigger::busy(labels::ASKING);
        self.answer = None;

        let ticket = self.issue();
        self.pending_question = Some(ticket);
        tracing::info!("Asking about recipe {}: {}", recipe_id, question);
        Some(Request::Question {
            ticket,
            recipe_id,
            question,
        })
    }

    pub fn question_finished(&mut self, ticket: Ticket, result: Result<AnswerResponse, String>) {
        if self.pending_question != Some(ticket) {
            tracing::debug!("Dropping stale answer {:?}", ticket);
            return;
        }
        self.pending_question = None;
        self.ask_trigger = Trigger::idle(labels::ASK);

        let text = match result {
            Ok(response) => non_empty(response.answer)
                .or_else(|| non_empty(response.error))
                .unwrap_or_else(|| labels::NO_ANSWER.to_string()),
            Err(message) => {
                tracing::error!("Question failed: {}", message);
                format!("Error: {}", message)
            }
        };
        self.answer = Some(text);
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn issue(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    fn show_error(&mut self, message: String) {
        self.error = Some(message);
        self.results_visible = false;
        self.detail_visible = false;
        self.qa_visible = false;
    }

    fn clear_messages(&mut self) {
        self.error = None;
        self.audio_error = None;
    }

    // ========================================================================
    // View accessors
    // ========================================================================

    pub fn ingredients_input(&self) -> &str {
        &self.ingredients_input
    }

    pub fn question_input(&self) -> &str {
        &self.question_input
    }

    pub fn loading(&self) -> Option<&str> {
        self.loading.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Busy line first, then the error; both show when a search is running
    pub fn status_lines(&self) -> Vec<(StatusKind, &str)> {
        self.loading()
            .map(|line| (StatusKind::Busy, line))
            .into_iter()
            .chain(self.error().map(|line| (StatusKind::Error, line)))
            .collect()
    }

    pub fn audio_error(&self) -> Option<&str> {
        self.audio_error.as_deref()
    }

    pub fn question_prompt(&self) -> Option<&str> {
        self.question_prompt.as_deref()
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn detail_visible(&self) -> bool {
        self.detail_visible && self.current_recipe_id.is_some()
    }

    pub fn qa_visible(&self) -> bool {
        self.qa_visible
    }

    pub fn player_visible(&self) -> bool {
        self.player_visible
    }

    pub fn list(&self) -> &[ListEntry] {
        &self.list
    }

    pub fn detail(&self) -> &RecipeDetail {
        &self.detail
    }

    pub fn play_trigger(&self) -> Trigger {
        self.play_trigger
    }

    pub fn ask_trigger(&self) -> Trigger {
        self.ask_trigger
    }

    #[cfg(test)]
    pub fn current_recipe_id(&self) -> Option<&RecipeId> {
        self.current_recipe_id.as_ref()
    }

    pub fn last_recipes(&self) -> &[RecipeSummary] {
        &self.last_recipes
    }

    #[cfg(test)]
    pub fn player(&self) -> &P {
        &self.player
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct FakePlayer {
        source: Option<Vec<u8>>,
        events: VecDeque<PlaybackEvent>,
        stops: usize,
    }

    impl Playback for FakePlayer {
        fn play(&mut self, bytes: Vec<u8>) {
            self.source = Some(bytes);
        }

        fn stop(&mut self) {
            if self.source.take().is_some() {
                self.stops += 1;
            }
        }

        fn has_source(&self) -> bool {
            self.source.is_some()
        }

        fn poll_event(&mut self) -> Option<PlaybackEvent> {
            self.events.pop_front()
        }
    }

    fn recipe(id: &str, name: &str) -> RecipeSummary {
        RecipeSummary {
            id: RecipeId::new(id),
            name: name.to_string(),
            ingredients_text: format!("- {} ingredients", name),
            instructions_text: format!("1. Cook {}.", name),
            raw_text: None,
        }
    }

    fn ticket_of(request: &Request) -> Ticket {
        match request {
            Request::Search { ticket, .. }
            | Request::Audio { ticket, .. }
            | Request::Question { ticket, .. } => *ticket,
        }
    }

    fn session_with_results(recipes: Vec<RecipeSummary>) -> Session<FakePlayer> {
        let mut session = Session::new(FakePlayer::default());
        session.set_ingredients("eggs, flour".into());
        let request = session.submit_search().unwrap();
        session.search_finished(
            ticket_of(&request),
            Ok(SearchResponse {
                recipes,
                error: None,
            }),
        );
        session
    }

    fn session_playing() -> Session<FakePlayer> {
        let mut session = session_with_results(vec![recipe("recipe_0", "Omelete")]);
        session.select_recipe(0);
        let request = session.request_audio().unwrap();
        session.audio_finished(ticket_of(&request), Ok(AudioOutcome::Ready(vec![0xff, 0xfb])));
        session
    }

    #[test]
    fn test_empty_ingredients_rejected() {
        let mut session = Session::new(FakePlayer::default());
        assert!(session.submit_search().is_none());
        assert_eq!(session.error(), Some(labels::EMPTY_INGREDIENTS));

        session.set_ingredients("   \n ".into());
        assert!(session.submit_search().is_none());
        assert!(session.loading().is_none());
    }

    #[test]
    fn test_empty_submit_during_search_still_shows_message() {
        let mut session = Session::new(FakePlayer::default());
        session.set_ingredients("eggs".into());
        let first = session.submit_search().unwrap();

        session.set_ingredients("   ".into());
        assert!(session.submit_search().is_none());
        assert_eq!(
            session.status_lines(),
            vec![
                (StatusKind::Busy, labels::SEARCHING),
                (StatusKind::Error, labels::EMPTY_INGREDIENTS),
            ]
        );

        session.search_finished(
            ticket_of(&first),
            Ok(SearchResponse {
                recipes: vec![recipe("recipe_0", "Omelete")],
                error: None,
            }),
        );
        assert!(session.results_visible());
        assert!(session.status_lines().iter().all(|(kind, _)| *kind != StatusKind::Busy));
    }

    #[test]
    fn test_blank_error_fields_use_fallbacks() {
        let mut session = Session::new(FakePlayer::default());
        session.set_ingredients("sal".into());
        let request = session.submit_search().unwrap();
        let response: SearchResponse =
            serde_json::from_str(r#"{"recipes": [], "error": ""}"#).unwrap();
        session.search_finished(ticket_of(&request), Ok(response));
        assert_eq!(session.error(), Some(labels::NO_RECIPES));

        let mut session = session_with_results(vec![recipe("recipe_0", "Omelete")]);
        session.select_recipe(0);
        let request = session.request_audio().unwrap();
        session.audio_finished(
            ticket_of(&request),
            Ok(AudioOutcome::Unavailable(Some(String::new()))),
        );
        assert_eq!(session.audio_error(), Some(labels::AUDIO_UNAVAILABLE));
    }

    #[test]
    fn test_search_sends_trimmed_ingredients() {
        let mut session = Session::new(FakePlayer::default());
        session.set_ingredients("  eggs, flour ".into());

        match session.submit_search() {
            Some(Request::Search { ingredients, .. }) => assert_eq!(ingredients, "eggs, flour"),
            other => panic!("Expected search request, got {:?}", other),
        }
        assert_eq!(session.loading(), Some(labels::SEARCHING));
        assert!(!session.results_visible());
    }

    #[test]
    fn test_search_renders_recipes_in_order() {
        let mut unprocessed = recipe("unparsed_recipe_1", "Receita não processada 2");
        unprocessed.raw_text = Some("??".into());
        let session = session_with_results(vec![
            recipe("recipe_0", "Pancakes"),
            unprocessed,
            recipe("recipe_2", "Crepes"),
        ]);

        assert!(session.results_visible());
        assert!(session.loading().is_none());
        assert_eq!(
            session.list(),
            &[
                ListEntry::Recipe { index: 0, name: "Pancakes".into() },
                ListEntry::Notice(
                    "Could not process a suggestion: Receita não processada 2. Try refining your ingredients."
                        .into()
                ),
                ListEntry::Recipe { index: 2, name: "Crepes".into() },
            ]
        );
    }

    #[test]
    fn test_single_recipe_example() {
        let mut session = Session::new(FakePlayer::default());
        session.set_ingredients("eggs, flour".into());
        let request = session.submit_search().unwrap();
        let response: SearchResponse = serde_json::from_str(
            r#"{"recipes":[{"id":1,"name":"Pancakes","ingredients_text":"eggs","instructions_text":"mix"}]}"#,
        )
        .unwrap();
        session.search_finished(ticket_of(&request), Ok(response));

        let buttons: Vec<_> = session
            .list()
            .iter()
            .filter_map(|e| match e {
                ListEntry::Recipe { name, .. } => Some(name.as_str()),
                ListEntry::Notice(_) => None,
            })
            .collect();
        assert_eq!(buttons, vec!["Pancakes"]);
    }

    #[test]
    fn test_zero_recipes_shows_not_found() {
        let session = session_with_results(vec![]);
        assert_eq!(session.error(), Some(labels::NO_RECIPES));
        assert!(!session.results_visible());
    }

    #[test]
    fn test_server_error_field_shown_verbatim() {
        let mut session = Session::new(FakePlayer::default());
        session.set_ingredients("sal".into());
        let request = session.submit_search().unwrap();
        session.search_finished(
            ticket_of(&request),
            Ok(SearchResponse {
                recipes: vec![],
                error: Some("Modelo Gemini não disponível.".into()),
            }),
        );
        assert_eq!(session.error(), Some("Modelo Gemini não disponível."));
    }

    #[test]
    fn test_transport_error_is_prefixed() {
        let mut session = Session::new(FakePlayer::default());
        session.set_ingredients("sal".into());
        let request = session.submit_search().unwrap();
        session.search_finished(ticket_of(&request), Err("HTTP error: 500".into()));
        assert_eq!(session.error(), Some("Error fetching recipes: HTTP error: 500"));
        assert!(session.loading().is_none());
    }

    #[test]
    fn test_stale_search_response_ignored() {
        let mut session = Session::new(FakePlayer::default());
        session.set_ingredients("eggs".into());
        let first = session.submit_search().unwrap();
        session.set_ingredients("rice".into());
        let second = session.submit_search().unwrap();

        session.search_finished(
            ticket_of(&first),
            Ok(SearchResponse {
                recipes: vec![recipe("recipe_0", "Omelete")],
                error: None,
            }),
        );
        assert!(session.list().is_empty());
        assert!(session.loading().is_some());

        session.search_finished(
            ticket_of(&second),
            Ok(SearchResponse {
                recipes: vec![recipe("recipe_0", "Risotto")],
                error: None,
            }),
        );
        assert_eq!(session.last_recipes()[0].name, "Risotto");
    }

    #[test]
    fn test_select_recipe_shows_detail() {
        let mut session = session_with_results(vec![recipe("recipe_0", "Omelete")]);
        session.select_recipe(0);

        assert_eq!(session.current_recipe_id(), Some(&RecipeId::new("recipe_0")));
        assert!(session.detail_visible());
        assert!(session.qa_visible());
        assert!(!session.results_visible());
        assert_eq!(session.detail().name, "Omelete");
        assert_eq!(session.detail().instructions, "1. Cook Omelete.");
    }

    #[test]
    fn test_select_unprocessed_is_ignored() {
        let mut session =
            session_with_results(vec![recipe("unparsed_recipe_0", "Receita não processada 1")]);
        session.select_recipe(0);
        assert!(session.current_recipe_id().is_none());
        assert!(!session.detail_visible());
    }

    #[test]
    fn test_select_clears_previous_audio() {
        let mut session = session_playing();
        assert!(session.player().has_source());

        session.select_recipe(0);

        assert!(!session.player().has_source());
        assert!(!session.player_visible());
        assert_eq!(session.play_trigger(), Trigger::idle(labels::LISTEN));
        assert!(session.audio_error().is_none());
    }

    #[test]
    fn test_audio_without_recipe_is_local_error() {
        let mut session = Session::new(FakePlayer::default());
        assert!(session.request_audio().is_none());
        assert_eq!(session.audio_error(), Some(labels::NO_RECIPE_SELECTED));
    }

    #[test]
    fn test_audio_plays_and_reverts_on_completion() {
        let mut session = session_with_results(vec![recipe("recipe_0", "Omelete")]);
        session.select_recipe(0);

        let request = session.request_audio().unwrap();
        assert_eq!(session.play_trigger(), Trigger::busy(labels::GENERATING));
        assert!(matches!(&request, Request::Audio { recipe_id, .. } if recipe_id.as_str() == "recipe_0"));

        session.audio_finished(ticket_of(&request), Ok(AudioOutcome::Ready(vec![1, 2, 3])));
        assert!(session.player().has_source());
        assert!(session.player_visible());
        assert_eq!(session.play_trigger().label, labels::PLAYING);
        assert!(session.is_playing());

        session.poll_playback();
        assert_eq!(session.play_trigger().label, labels::PLAYING);

        session.player.events.push_back(PlaybackEvent::Finished);
        session.poll_playback();
        assert_eq!(session.play_trigger(), Trigger::idle(labels::LISTEN));
        assert!(!session.is_playing());
    }

    #[test]
    fn test_playback_failure_restores_trigger() {
        let mut session = session_playing();
        session
            .player
            .events
            .push_back(PlaybackEvent::Failed("unsupported format".into()));
        session.poll_playback();

        assert_eq!(session.audio_error(), Some(labels::PLAYBACK_FAILED));
        assert_eq!(session.play_trigger(), Trigger::idle(labels::LISTEN));
    }

    #[test]
    fn test_audio_unavailable_and_failure() {
        let mut session = session_with_results(vec![recipe("recipe_0", "Omelete")]);
        session.select_recipe(0);

        let request = session.request_audio().unwrap();
        session.audio_finished(
            ticket_of(&request),
            Ok(AudioOutcome::Unavailable(Some("Falha ao gerar áudio.".into()))),
        );
        assert_eq!(session.audio_error(), Some("Falha ao gerar áudio."));
        assert!(session.play_trigger().enabled);

        let request = session.request_audio().unwrap();
        assert!(session.audio_error().is_none());
        session.audio_finished(ticket_of(&request), Ok(AudioOutcome::Unavailable(None)));
        assert_eq!(session.audio_error(), Some(labels::AUDIO_UNAVAILABLE));

        let request = session.request_audio().unwrap();
        session.audio_finished(ticket_of(&request), Err("HTTP error: 404".into()));
        assert_eq!(session.audio_error(), Some("Error fetching audio: HTTP error: 404"));
        assert_eq!(session.play_trigger(), Trigger::idle(labels::LISTEN));
        assert!(!session.player().has_source());
    }

    #[test]
    fn test_back_to_list_resets_detail() {
        let mut session = session_playing();
        session.set_question("Can I bake it?".into());

        session.back_to_list();

        assert!(!session.detail_visible());
        assert!(session.results_visible());
        assert!(!session.qa_visible());
        assert!(session.answer().is_none());
        assert_eq!(session.question_input(), "");
        assert!(!session.player().has_source());
        assert_eq!(session.player().stops, 1);
        assert!(session.current_recipe_id().is_none());
    }

    #[test]
    fn test_empty_question_blocked() {
        let mut session = session_with_results(vec![recipe("recipe_0", "Omelete")]);
        session.select_recipe(0);

        session.set_question("   ".into());
        assert!(session.ask_question().is_none());
        assert_eq!(session.question_prompt(), Some(labels::QUESTION_PROMPT));
        assert!(session.ask_trigger().enabled);
    }

    #[test]
    fn test_question_without_recipe_blocked() {
        let mut session = Session::new(FakePlayer::default());
        session.set_question("How long?".into());
        assert!(session.ask_question().is_none());
        assert_eq!(session.question_prompt(), Some(labels::QUESTION_PROMPT));
    }

    #[test]
    fn test_question_trigger_restored_after_success_and_failure() {
        let mut session = session_with_results(vec![recipe("recipe_0", "Omelete")]);
        session.select_recipe(0);

        session.set_question(" Can I use butter? ".into());
        let request = session.ask_question().unwrap();
        assert!(matches!(&request, Request::Question { question, .. } if question == "Can I use butter?"));
        assert_eq!(session.ask_trigger(), Trigger::busy(labels::ASKING));

        session.question_finished(
            ticket_of(&request),
            Ok(AnswerResponse {
                answer: Some("Yes, butter works.".into()),
                error: None,
            }),
        );
        assert_eq!(session.answer(), Some("Yes, butter works."));
        assert_eq!(session.ask_trigger(), Trigger::idle(labels::ASK));

        let request = session.ask_question().unwrap();
        assert!(session.answer().is_none());
        session.question_finished(ticket_of(&request), Err("connection refused".into()));
        assert_eq!(session.answer(), Some("Error: connection refused"));
        assert_eq!(session.ask_trigger(), Trigger::idle(labels::ASK));
    }

    #[test]
    fn test_question_server_error_and_empty_answer() {
        let mut session = session_with_results(vec![recipe("recipe_0", "Omelete")]);
        session.select_recipe(0);
        session.set_question("Why?".into());

        let request = session.ask_question().unwrap();
        session.question_finished(
            ticket_of(&request),
            Ok(AnswerResponse {
                answer: None,
                error: Some("Erro ao processar a pergunta".into()),
            }),
        );
        assert_eq!(session.answer(), Some("Erro ao processar a pergunta"));

        let request = session.ask_question().unwrap();
        session.question_finished(ticket_of(&request), Ok(AnswerResponse::default()));
        assert_eq!(session.answer(), Some(labels::NO_ANSWER));
    }

    #[test]
    fn test_answer_for_previous_recipe_dropped() {
        let mut session = session_with_results(vec![
            recipe("recipe_0", "Omelete"),
            recipe("recipe_1", "Frittata"),
        ]);
        session.select_recipe(0);
        session.set_question("Serves how many?".into());
        let request = session.ask_question().unwrap();

        session.back_to_list();
        session.select_recipe(1);
        session.question_finished(
            ticket_of(&request),
            Ok(AnswerResponse {
                answer: Some("Two".into()),
                error: None,
            }),
        );

        assert!(session.answer().is_none());
        assert!(session.ask_trigger().enabled);
    }
}
