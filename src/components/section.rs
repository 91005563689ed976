use crate::message::Message;
use iced::widget::{button, column, container, text, Column};
use iced::{Alignment, Background, Color, Length, Shadow, Theme};

/// The four parameter groups of the filter panel, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    BadChannels,
    Sss,
    MoveComp,
    HeadOrigin,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::BadChannels => "Bad channels",
            Section::Sss => "(t)SSS parameters",
            Section::MoveComp => "Movement compensation",
            Section::HeadOrigin => "Head origin",
        }
    }
}

/// Collapsible titled group: a full-width header button over the section
/// body. The collapsed set lives in app state and is toggled through
/// [`Message::ToggleSection`].
pub fn section(kind: Section, collapsed: bool, body: Column<'_, Message>) -> Column<'_, Message> {
    let arrow = if collapsed { "▶" } else { "▼" };
    let header = button(
        container(text(format!("{arrow} {}", kind.title())).size(15))
            .width(Length::Fill)
            .align_y(Alignment::Center)
            .padding([4, 10]),
    )
    .padding(0)
    .width(Length::Fill)
    .on_press(Message::ToggleSection(kind))
    .style(header_style);

    let mut group = column![header].spacing(6);
    if !collapsed {
        group = group.push(
            container(body.spacing(8))
                .padding([4, 12])
                .width(Length::Fill),
        );
    }
    group
}

fn header_style(theme: &Theme, status: iced::widget::button::Status) -> iced::widget::button::Style {
    let palette = theme.extended_palette();

    let background_color = match status {
        iced::widget::button::Status::Hovered | iced::widget::button::Status::Pressed => {
            palette.background.strong.color
        }
        _ => palette.background.strong.color.scale_alpha(0.5),
    };

    iced::widget::button::Style {
        background: Some(Background::Color(background_color)),
        text_color: palette.background.base.text,
        border: iced::border::Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: iced::border::Radius::new(6.0),
        },
        shadow: Shadow::default(),
    }
}
