use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no query backend configured")]
    MissingBackend,
    #[error("series id {0} is not in the current option set")]
    UnknownSeriesId(u32),
    #[error("backend returned non-numeric series id {0:?}")]
    BadSeriesId(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("no files resolved for the current selection")]
    NoFiles,
}
