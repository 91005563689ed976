use crate::error::SelectionError;
use crate::model::query::{FileListing, Modality, RecordQuery};
use crate::model::series::{SeriesOption, SeriesOptions, SENTINEL};

/// Everything the user has picked so far. A clone of this record is the
/// snapshot the filter panel is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionInfo {
    pub proj_code: String,
    pub subj_id: Option<String>,
    pub modality: Option<Modality>,
    pub study: Option<String>,
    pub series: Option<u32>,
    pub series_name: Option<String>,
    pub files: Option<FileListing>,
}

impl SelectionInfo {
    pub fn new(proj_code: impl Into<String>) -> Self {
        Self {
            proj_code: proj_code.into(),
            subj_id: None,
            modality: None,
            study: None,
            series: None,
            series_name: None,
            files: None,
        }
    }

    fn clear_below_subject(&mut self) {
        self.study = None;
        self.clear_below_study();
    }

    fn clear_below_study(&mut self) {
        self.series = None;
        self.series_name = None;
        self.files = None;
    }
}

/// Record-browser state: the selection record plus the option sets backing
/// the dropdowns.
///
/// Each `apply_*` method writes the selection record first and then rebuilds
/// everything below it in one synchronous step, so no later read can observe
/// a half-updated cascade.
#[derive(Debug, Clone)]
pub struct BrowserState {
    pub info: SelectionInfo,
    pub subject_options: Vec<String>,
    pub study_options: Vec<String>,
    pub series_options: SeriesOptions,
    pub files_display: String,
    pub subject_choice: String,
    pub modality_choice: Modality,
    pub study_choice: String,
    pub series_choice: SeriesOption,
}

impl BrowserState {
    pub fn new(query: &dyn RecordQuery) -> Self {
        let mut subject_options = vec![SENTINEL.to_string()];
        subject_options.extend(query.subjects());
        log::info!(
            "query backend for {} lists {} subjects",
            query.project_code(),
            subject_options.len() - 1
        );

        Self {
            info: SelectionInfo::new(query.project_code()),
            subject_options,
            study_options: vec![SENTINEL.to_string()],
            series_options: SeriesOptions::only_sentinel(),
            files_display: String::new(),
            subject_choice: SENTINEL.to_string(),
            modality_choice: Modality::Meg,
            study_choice: SENTINEL.to_string(),
            series_choice: SeriesOption::sentinel(),
        }
    }

    /// Subject or modality changed: requery the studies for the pair and
    /// reset every level below.
    pub fn apply_subject(&mut self, query: &dyn RecordQuery) {
        self.study_choice = SENTINEL.to_string();
        self.series_choice = SeriesOption::sentinel();
        self.series_options = SeriesOptions::only_sentinel();
        self.files_display.clear();

        if self.subject_choice == SENTINEL {
            self.study_options = vec![SENTINEL.to_string()];
            self.info.subj_id = None;
            self.info.modality = None;
            self.info.clear_below_subject();
            return;
        }

        // Record first: the option rebuild below must never run against a
        // stale subject or modality.
        self.info.subj_id = Some(self.subject_choice.clone());
        self.info.modality = Some(self.modality_choice);
        self.info.clear_below_subject();

        let studies = query
            .studies(&self.subject_choice, self.modality_choice, false)
            .into_vec();
        log::info!(
            "{} studies for {}/{}",
            studies.len(),
            self.subject_choice,
            self.modality_choice
        );

        let mut options = vec![SENTINEL.to_string()];
        options.extend(studies);
        self.study_options = options;
    }

    /// Study changed: requery the series map for the selected study, or fall
    /// back to the sentinel-only option set.
    pub fn apply_study(&mut self, query: &dyn RecordQuery) -> Result<(), SelectionError> {
        self.series_choice = SeriesOption::sentinel();
        self.files_display.clear();

        if self.study_choice == SENTINEL {
            self.series_options = SeriesOptions::only_sentinel();
            return Ok(());
        }

        let (Some(subj_id), Some(modality)) = (self.info.subj_id.clone(), self.info.modality)
        else {
            return Ok(());
        };

        self.info.study = Some(self.study_choice.clone());
        self.info.clear_below_study();

        let pairs = query.series(&subj_id, &self.study_choice, modality);
        log::info!(
            "{} series for {}/{}/{}",
            pairs.len(),
            subj_id,
            modality,
            self.study_choice
        );
        self.series_options = SeriesOptions::from_backend(pairs)?;
        Ok(())
    }

    /// Series changed: a concrete series resolves its files and display
    /// name; the sentinel clears the files display and nothing else, so the
    /// record keeps the last concrete values.
    pub fn apply_series(&mut self, query: &dyn RecordQuery) -> Result<(), SelectionError> {
        if self.series_choice.is_sentinel() {
            self.files_display.clear();
            return Ok(());
        }

        let (Some(subj_id), Some(modality), Some(study)) = (
            self.info.subj_id.clone(),
            self.info.modality,
            self.info.study.clone(),
        ) else {
            return Ok(());
        };

        let listing = query.files(&subj_id, &study, modality, self.series_choice.id);
        self.files_display = match listing.paths() {
            Some(paths) => paths.join("\n"),
            None => String::new(),
        };

        self.info.series = Some(self.series_choice.id);
        self.info.files = Some(listing);
        self.info.series_name = Some(
            self.series_options
                .name_for(self.series_choice.id)?
                .to_string(),
        );
        Ok(())
    }
}
