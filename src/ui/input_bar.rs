//! Text input with a trailing action button

use iced::widget::{button, container, row, text, text_input};
use iced::{Background, Border, Color, Element, Length, Padding};

use super::theme::DarkTheme;

/// Input row used for the ingredients and the follow-up question
pub fn view<'a, Message: Clone + 'a>(
    placeholder: &str,
    value: &str,
    on_input: impl Fn(String) -> Message + 'a,
    on_submit: Message,
    action_label: &'a str,
    action_enabled: bool,
) -> Element<'a, Message> {
    let input = text_input(placeholder, value)
        .on_input(on_input)
        .on_submit(on_submit.clone())
        .padding(Padding::new(12.0))
        .size(16)
        .style(|_theme, _status| text_input::Style {
            background: Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            icon: DarkTheme::TEXT_MUTED,
            placeholder: DarkTheme::TEXT_PLACEHOLDER,
            value: DarkTheme::TEXT,
            selection: DarkTheme::PRIMARY,
        });

    let action = button(text(action_label).size(14))
        .padding(Padding::from([10.0, 16.0]))
        .style(button::primary)
        .on_press_maybe(action_enabled.then_some(on_submit));

    container(
        row![input, action]
            .spacing(8)
            .align_y(iced::Alignment::Center),
    )
    .padding(Padding::from([4.0, 8.0]))
    .width(Length::Fill)
    .style(|_theme| container::Style {
        background: Some(Background::Color(DarkTheme::SURFACE)),
        border: Border {
            color: DarkTheme::BORDER,
            width: 1.0,
            radius: 12.0.into(),
        },
        ..Default::default()
    })
    .into()
}
