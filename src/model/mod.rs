pub mod maxfilter;
pub mod panel;
pub mod query;
pub mod selection;
pub mod series;

pub use query::{FileListing, Modality, RecordQuery, StudyList};
pub use selection::{BrowserState, SelectionInfo};
pub use series::SeriesOption;
