//! View pieces for the result list, the recipe detail and the Q&A panel

use iced::widget::{button, column, container, row, scrollable, text, Column, Space};
use iced::{Background, Border, Color, Element, Length, Padding};

use super::input_bar;
use super::theme::DarkTheme;
use crate::app::Message;
use crate::audio::Playback;
use crate::session::{ListEntry, Session, StatusKind};

fn panel<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Background::Color(DarkTheme::SURFACE)),
            border: Border::default().rounded(8),
            ..Default::default()
        })
        .into()
}

fn message_line<'a>(message: &'a str, color: Color) -> Element<'a, Message> {
    text(message).size(14).color(color).into()
}

/// Busy indicator and search error
pub fn status<'a, P: Playback>(session: &'a Session<P>) -> Option<Element<'a, Message>> {
    let lines: Vec<Element<'a, Message>> = session
        .status_lines()
        .into_iter()
        .map(|(kind, line)| match kind {
            StatusKind::Busy => message_line(line, DarkTheme::TEXT_MUTED),
            StatusKind::Error => message_line(line, DarkTheme::ERROR),
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(Column::with_children(lines).spacing(4).into())
    }
}

pub fn recipe_list<'a, P: Playback>(session: &'a Session<P>) -> Element<'a, Message> {
    let items: Vec<Element<'a, Message>> = session
        .list()
        .iter()
        .map(|entry| match entry {
            ListEntry::Recipe { index, name } => button(text(name).size(15))
                .width(Length::Fill)
                .padding(Padding::from([10.0, 12.0]))
                .style(button::secondary)
                .on_press(Message::RecipeSelected(*index))
                .into(),
            ListEntry::Notice(notice) => text(notice)
                .size(13)
                .color(DarkTheme::WARNING)
                .into(),
        })
        .collect();

    panel(column![
        text(format!("Suggestions ({})", session.last_recipes().len()))
            .size(18)
            .color(DarkTheme::TEXT),
        Space::with_height(8),
        Column::with_children(items).spacing(6),
    ])
}

pub fn recipe_detail<'a, P: Playback>(session: &'a Session<P>) -> Element<'a, Message> {
    let detail = session.detail();
    let play = session.play_trigger();

    let controls = row![
        button(text(play.label).size(14))
            .style(button::primary)
            .on_press_maybe(play.enabled.then_some(Message::PlayAudio)),
        button(text("Back to list").size(14))
            .style(button::secondary)
            .on_press(Message::BackToList),
    ]
    .spacing(8);

    let mut content = column![
        text(&detail.name).size(22).color(DarkTheme::TEXT),
        text("Ingredients").size(16).color(DarkTheme::PRIMARY),
        text(&detail.ingredients).size(14).color(DarkTheme::TEXT),
        text("Instructions").size(16).color(DarkTheme::PRIMARY),
        text(&detail.instructions).size(14).color(DarkTheme::TEXT),
        controls,
    ]
    .spacing(8);

    if session.player_visible() {
        let state = if session.is_playing() {
            "♪ Narration playing"
        } else {
            "♪ Narration loaded"
        };
        content = content.push(message_line(state, DarkTheme::TEXT_MUTED));
    }
    if let Some(error) = session.audio_error() {
        content = content.push(message_line(error, DarkTheme::ERROR));
    }

    panel(content)
}

pub fn questions<'a, P: Playback>(session: &'a Session<P>) -> Element<'a, Message> {
    let ask = session.ask_trigger();

    let mut content = column![
        text("Questions about this recipe?").size(16).color(DarkTheme::TEXT),
        input_bar::view(
            "e.g. Can I swap butter for oil?",
            session.question_input(),
            Message::QuestionChanged,
            Message::AskQuestion,
            ask.label,
            ask.enabled,
        ),
    ]
    .spacing(8);

    if let Some(prompt) = session.question_prompt() {
        content = content.push(message_line(prompt, DarkTheme::WARNING));
    }
    if let Some(answer) = session.answer() {
        content = content.push(
            container(scrollable(text(answer).size(14).color(DarkTheme::TEXT)))
                .padding(12)
                .max_height(220)
                .width(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Background::Color(DarkTheme::BACKGROUND)),
                    border: Border::default().rounded(6),
                    ..Default::default()
                }),
        );
    }

    panel(content)
}
