use crate::components::section::Section;
use crate::model::maxfilter::{AutobadMode, CompTarget, SssFrame};
use crate::model::{Modality, SeriesOption};

#[derive(Debug, Clone)]
pub enum Message {
    SubjectPicked(String),
    ModalityPicked(Modality),
    StudyPicked(String),
    SeriesPicked(SeriesOption),

    ToggleSection(Section),
    AutobadPicked(AutobadMode),
    BadChannelsEdited(String),
    FramePicked(SssFrame),
    TemporalSssToggled(bool),
    CorrelationLimitChanged(f32),
    BufferLengthChanged(u32),
    MovecompToggled(bool),
    MovecompTargetPicked(CompTarget),
    YLimLowerChanged(f32),
    YLimUpperChanged(f32),
    ZLimLowerChanged(f32),
    ZLimUpperChanged(f32),

    FitRequested,
    FitCompleted(Result<String, String>),
    ExportRequested,
    /// `Ok(None)` means the save dialog was cancelled.
    ExportFinished(Result<Option<String>, String>),
}
