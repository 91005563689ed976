use crate::message::Message;
use crate::model::{BrowserState, Modality};
use iced::widget::text::Wrapping;
use iced::widget::{column, container, pick_list, radio, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};

const LABEL_WIDTH: f32 = 110.0;

/// Renders the four cascading selectors plus the files display, in fixed
/// order: subject, modality, study, series, files.
pub fn browser_panel(state: &BrowserState) -> Column<'_, Message> {
    let subject = pick_list(
        state.subject_options.clone(),
        Some(state.subject_choice.clone()),
        Message::SubjectPicked,
    )
    .width(Length::Fill);

    let modality = row![
        radio(
            "MEG",
            Modality::Meg,
            Some(state.modality_choice),
            Message::ModalityPicked,
        ),
        radio(
            "MR",
            Modality::Mr,
            Some(state.modality_choice),
            Message::ModalityPicked,
        ),
    ]
    .spacing(12);

    let study = pick_list(
        state.study_options.clone(),
        Some(state.study_choice.clone()),
        Message::StudyPicked,
    )
    .width(Length::Fill);

    let series = pick_list(
        state.series_options.to_vec(),
        Some(state.series_choice.clone()),
        Message::SeriesPicked,
    )
    .width(Length::Fill);

    let files = container(scrollable(
        text(&state.files_display).wrapping(Wrapping::Word),
    ))
    .padding(8)
    .width(Length::Fill)
    .height(Length::Fixed(120.0));

    column![
        text("Acquisition records").size(20),
        labeled("Subject ID", subject.into()),
        labeled("Modality", modality.into()),
        labeled("Study date", study.into()),
        labeled("Series name", series.into()),
        labeled("Files", files.into()),
    ]
    .spacing(10)
}

fn labeled<'a>(label: &'a str, control: Element<'a, Message>) -> Element<'a, Message> {
    row![
        text(label).size(14).width(Length::Fixed(LABEL_WIDTH)),
        control,
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}
