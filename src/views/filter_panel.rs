use crate::components::section::{section, Section};
use crate::message::Message;
use crate::model::maxfilter::{
    AutobadMode, SssFrame, BUFFER_RANGE, CORR_LIMIT_RANGE, YLIM_RANGE, ZLIM_RANGE,
};
use crate::model::panel::PanelState;
use iced::widget::{button, checkbox, column, pick_list, row, slider, text, text_input, Column};
use iced::{Alignment, Element, Length};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

const LABEL_WIDTH: f32 = 130.0;

/// Renders the four parameter groups in fixed order, followed by the export
/// action.
pub fn filter_panel<'a>(
    panel: &'a PanelState,
    collapsed: &BTreeSet<Section>,
) -> Column<'a, Message> {
    let bad_channels = column![
        labeled(
            "Autobad",
            pick_list(
                AutobadMode::ALL,
                Some(panel.params.autobad),
                Message::AutobadPicked,
            )
            .into(),
        ),
        labeled(
            "Bad channels",
            text_input("MEG1143 MEG2433", &panel.params.bad_channels)
                .on_input(Message::BadChannelsEdited)
                .into(),
        ),
    ];

    let sss = column![
        labeled(
            "SSS frame",
            pick_list(SssFrame::ALL, Some(panel.params.frame), Message::FramePicked).into(),
        ),
        checkbox("Use temporal SSS (tSSS)", panel.params.tsss)
            .on_toggle(Message::TemporalSssToggled),
        labeled(
            &format!("Correlation limit: {:.2}", panel.params.correlation_limit),
            slider(
                CORR_LIMIT_RANGE,
                panel.params.correlation_limit,
                Message::CorrelationLimitChanged,
            )
            .step(0.01)
            .into(),
        ),
        labeled(
            &format!("Buffer length: {} s", panel.params.buffer_length),
            slider(
                BUFFER_RANGE,
                panel.params.buffer_length,
                Message::BufferLengthChanged,
            )
            .into(),
        ),
    ];

    let movecomp = column![
        checkbox("Active", panel.params.movecomp).on_toggle(Message::MovecompToggled),
        labeled(
            "Compensate to",
            pick_list(
                panel.target_options(),
                Some(panel.params.movecomp_target.clone()),
                Message::MovecompTargetPicked,
            )
            .width(Length::Fill)
            .into(),
        ),
    ];

    let fit_button = button(text("Fit sphere to head shape"))
        .on_press_maybe((!panel.fitting).then_some(Message::FitRequested));

    let head_origin = column![
        fit_button,
        range_pair(
            "y-limit of head shape points",
            panel.params.ylim,
            YLIM_RANGE,
            Message::YLimLowerChanged,
            Message::YLimUpperChanged,
        ),
        range_pair(
            "z-limit of head shape points",
            panel.params.zlim,
            ZLIM_RANGE,
            Message::ZLimLowerChanged,
            Message::ZLimUpperChanged,
        ),
        labeled("Origin", text(&panel.origin_text).size(14).into()),
    ];

    column![
        text("MaxFilter parameters").size(20),
        section(
            Section::BadChannels,
            collapsed.contains(&Section::BadChannels),
            bad_channels,
        ),
        section(Section::Sss, collapsed.contains(&Section::Sss), sss),
        section(
            Section::MoveComp,
            collapsed.contains(&Section::MoveComp),
            movecomp,
        ),
        section(
            Section::HeadOrigin,
            collapsed.contains(&Section::HeadOrigin),
            head_origin,
        ),
        button(text("Export parameters")).on_press(Message::ExportRequested),
    ]
    .spacing(12)
}

fn labeled<'a>(label: &str, control: Element<'a, Message>) -> Element<'a, Message> {
    row![
        text(label.to_string()).size(14).width(Length::Fixed(LABEL_WIDTH)),
        control,
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

fn range_pair<'a>(
    label: &'a str,
    value: (f32, f32),
    bounds: RangeInclusive<f32>,
    on_lower: fn(f32) -> Message,
    on_upper: fn(f32) -> Message,
) -> Column<'a, Message> {
    column![
        text(format!("{label}: {:.0} to {:.0}", value.0, value.1)).size(14),
        row![
            slider(bounds.clone(), value.0, on_lower).step(2.0),
            slider(bounds, value.1, on_upper).step(2.0),
        ]
        .spacing(8),
    ]
    .spacing(4)
}
