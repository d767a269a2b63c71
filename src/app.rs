//! Core application state and Iced Application implementation
//!
//! The window is a thin shell around [`Session`]: messages are forwarded to
//! it, and the backend requests it returns are turned into async tasks whose
//! results come back as messages.

use std::time::Duration;

use iced::keyboard::{self, Key};
use iced::widget::{column, container, scrollable, text, Space};
use iced::{time, Background, Border, Element, Event, Length, Subscription, Task, Theme};

use crate::audio::AudioPlayer;
use crate::backend::types::{AnswerResponse, SearchResponse};
use crate::backend::{BackendClient, RecipeId};
use crate::session::{AudioOutcome, Request, Session, Ticket};
use crate::ui::{input_bar, panels, theme::DarkTheme};

const PLAYBACK_POLL: Duration = Duration::from_millis(50);

// ============================================================================
// Application State
// ============================================================================

pub struct RecipeFinder {
    session: Session<AudioPlayer>,
    backend: BackendClient,
}

#[derive(Debug, Clone)]
pub enum Message {
    IngredientsChanged(String),
    FindRecipes,
    SearchFinished(Ticket, Result<SearchResponse, String>),
    RecipeSelected(usize),
    PlayAudio,
    AudioFinished(Ticket, Result<AudioOutcome, String>),
    PlaybackTick,
    BackToList,
    QuestionChanged(String),
    AskQuestion,
    QuestionFinished(Ticket, Result<AnswerResponse, String>),
    IcedEvent(Event),
}

impl RecipeFinder {
    pub fn new(backend: BackendClient) -> (Self, Task<Message>) {
        tracing::info!("Using recipe backend at {}", backend.base_url());

        let app = Self {
            session: Session::new(AudioPlayer::spawn()),
            backend,
        };
        (app, Task::none())
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::IngredientsChanged(value) => {
                self.session.set_ingredients(value);
                Task::none()
            }

            Message::FindRecipes => {
                let request = self.session.submit_search();
                self.perform(request)
            }

            Message::SearchFinished(ticket, result) => {
                self.session.search_finished(ticket, result);
                Task::none()
            }

            Message::RecipeSelected(index) => {
                self.session.select_recipe(index);
                Task::none()
            }

            Message::PlayAudio => {
                let request = self.session.request_audio();
                self.perform(request)
            }

            Message::AudioFinished(ticket, result) => {
                self.session.audio_finished(ticket, result);
                Task::none()
            }

            Message::PlaybackTick => {
                self.session.poll_playback();
                Task::none()
            }

            Message::BackToList => {
                self.session.back_to_list();
                Task::none()
            }

            Message::QuestionChanged(value) => {
                self.session.set_question(value);
                Task::none()
            }

            Message::AskQuestion => {
                let request = self.session.ask_question();
                self.perform(request)
            }

            Message::QuestionFinished(ticket, result) => {
                self.session.question_finished(ticket, result);
                Task::none()
            }

            Message::IcedEvent(event) => {
                if let Event::Keyboard(keyboard::Event::KeyPressed {
                    key: Key::Named(keyboard::key::Named::Escape),
                    ..
                }) = event
                {
                    if self.session.detail_visible() {
                        return self.update(Message::BackToList);
                    }
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut content = column![
            text("Recipe Finder").size(26).color(DarkTheme::TEXT),
            text("Tell us what is in your kitchen, separated by commas.")
                .size(14)
                .color(DarkTheme::TEXT_MUTED),
            input_bar::view(
                "e.g. eggs, flour, tomato",
                self.session.ingredients_input(),
                Message::IngredientsChanged,
                Message::FindRecipes,
                "Find recipes",
                true,
            ),
        ]
        .spacing(10);

        if let Some(status) = panels::status(&self.session) {
            content = content.push(status);
        }
        if self.session.results_visible() {
            content = content.push(panels::recipe_list(&self.session));
        }
        if self.session.detail_visible() {
            content = content.push(panels::recipe_detail(&self.session));
        }
        if self.session.qa_visible() {
            content = content.push(panels::questions(&self.session));
        }
        content = content.push(Space::with_height(8));

        container(scrollable(container(content).padding(20)).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(Background::Color(DarkTheme::BACKGROUND)),
                border: Border::default(),
                ..Default::default()
            })
            .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let events = iced::event::listen().map(Message::IcedEvent);
        if self.session.is_playing() {
            Subscription::batch([
                events,
                time::every(PLAYBACK_POLL).map(|_| Message::PlaybackTick),
            ])
        } else {
            events
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    // ========================================================================
    // Backend calls
    // ========================================================================

    fn perform(&self, request: Option<Request>) -> Task<Message> {
        let Some(request) = request else {
            return Task::none();
        };
        let backend = self.backend.clone();

        match request {
            Request::Search {
                ticket,
                ingredients,
            } => Task::perform(
                async move {
                    backend
                        .search_recipes(&ingredients)
                        .await
                        .map_err(|e| e.to_string())
                },
                move |result| Message::SearchFinished(ticket, result),
            ),
            Request::Audio { ticket, recipe_id } => Task::perform(
                fetch_audio(backend, recipe_id),
                move |result| Message::AudioFinished(ticket, result),
            ),
            Request::Question {
                ticket,
                recipe_id,
                question,
            } => Task::perform(
                async move {
                    backend
                        .ask_question(&recipe_id, &question)
                        .await
                        .map_err(|e| e.to_string())
                },
                move |result| Message::QuestionFinished(ticket, result),
            ),
        }
    }
}

/// Ask for narration and download it when the backend provides a reference
async fn fetch_audio(backend: BackendClient, recipe_id: RecipeId) -> Result<AudioOutcome, String> {
    let response = backend
        .recipe_audio(&recipe_id)
        .await
        .map_err(|e| e.to_string())?;

    match response.audio_url.filter(|url| !url.is_empty()) {
        Some(url) => {
            tracing::debug!("Downloading narration from {}", url);
            backend
                .download_audio(&url)
                .await
                .map(AudioOutcome::Ready)
                .map_err(|e| e.to_string())
        }
        None => Ok(AudioOutcome::Unavailable(response.error)),
    }
}
