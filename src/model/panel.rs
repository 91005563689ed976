use crate::error::PanelError;
use crate::model::maxfilter::{CompTarget, MaxFilterParams, SssFrame};
use crate::model::SelectionInfo;
use serde::{Deserialize, Serialize};

/// Marker shown in the origin field once a frame switch has invalidated a
/// previous fit.
pub const ORIGIN_UNSET: &str = "not computed";

/// Filter-panel state. Holds the selection snapshot taken when a concrete
/// series was chosen; later browser changes do not reach an existing panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub snapshot: SelectionInfo,
    pub output_dir: String,
    pub params: MaxFilterParams,
    pub origin_text: String,
    pub fitting: bool,
}

impl PanelState {
    pub fn new(snapshot: SelectionInfo) -> Result<Self, PanelError> {
        let has_files = snapshot
            .files
            .as_ref()
            .and_then(|listing| listing.paths())
            .is_some_and(|paths| !paths.is_empty());
        if !has_files {
            return Err(PanelError::NoFiles);
        }

        let output_dir = format!("/projects/{}/scratch/maxfilter", snapshot.proj_code);
        log::debug!("maxfilter output directory: {output_dir}");

        Ok(Self {
            snapshot,
            output_dir,
            params: MaxFilterParams::default(),
            origin_text: String::new(),
            fitting: false,
        })
    }

    pub fn files(&self) -> &[String] {
        self.snapshot
            .files
            .as_ref()
            .and_then(|listing| listing.paths())
            .unwrap_or(&[])
    }

    /// A frame switch invalidates any previous fit result.
    pub fn set_frame(&mut self, frame: SssFrame) {
        self.params.frame = frame;
        self.origin_text = ORIGIN_UNSET.to_string();
    }

    pub fn target_options(&self) -> Vec<CompTarget> {
        let mut options = vec![CompTarget::Initial];
        options.extend(self.files().iter().cloned().map(CompTarget::File));
        options
    }

    /// The record written by the export action: the tuning values plus the
    /// context a maxfilter launcher needs.
    pub fn to_params_file(&self) -> ParamsFile {
        ParamsFile {
            proj_code: self.snapshot.proj_code.clone(),
            subj_id: self.snapshot.subj_id.clone().unwrap_or_default(),
            modality: self
                .snapshot
                .modality
                .map(|modality| modality.to_string())
                .unwrap_or_default(),
            study: self.snapshot.study.clone().unwrap_or_default(),
            series: self.snapshot.series.unwrap_or_default(),
            series_name: self.snapshot.series_name.clone().unwrap_or_default(),
            files: self.files().to_vec(),
            output_dir: self.output_dir.clone(),
            maxfilter: self.params.clone(),
        }
    }
}

/// On-disk handoff format consumed by the downstream maxfilter launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsFile {
    pub proj_code: String,
    pub subj_id: String,
    pub modality: String,
    pub study: String,
    pub series: u32,
    pub series_name: String,
    pub files: Vec<String>,
    pub output_dir: String,
    pub maxfilter: MaxFilterParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::query::{FileListing, Modality};

    fn snapshot() -> SelectionInfo {
        SelectionInfo {
            proj_code: "MINDLAB2020_MEG-Rest".to_string(),
            subj_id: Some("0001".to_string()),
            modality: Some(Modality::Meg),
            study: Some("2020-01-02".to_string()),
            series: Some(1),
            series_name: Some("rest".to_string()),
            files: Some(FileListing::Files(vec![
                "/raw/0001/20200102/rest_raw.fif".to_string(),
            ])),
        }
    }

    #[test]
    fn construction_requires_resolved_files() {
        let mut empty = snapshot();
        empty.files = None;
        assert_eq!(PanelState::new(empty), Err(PanelError::NoFiles));

        let mut opaque = snapshot();
        opaque.files = Some(FileListing::Opaque("archived".to_string()));
        assert_eq!(PanelState::new(opaque), Err(PanelError::NoFiles));

        let mut no_paths = snapshot();
        no_paths.files = Some(FileListing::Files(Vec::new()));
        assert_eq!(PanelState::new(no_paths), Err(PanelError::NoFiles));
    }

    #[test]
    fn output_dir_is_derived_from_the_project_code() {
        let panel = PanelState::new(snapshot()).unwrap();
        assert_eq!(
            panel.output_dir,
            "/projects/MINDLAB2020_MEG-Rest/scratch/maxfilter"
        );
    }

    #[test]
    fn origin_field_starts_empty() {
        let panel = PanelState::new(snapshot()).unwrap();
        assert_eq!(panel.origin_text, "");
    }

    #[test]
    fn frame_switch_resets_the_origin_marker() {
        let mut panel = PanelState::new(snapshot()).unwrap();
        panel.origin_text = "0.0 10.0 40.0".to_string();

        panel.set_frame(SssFrame::Device);

        assert_eq!(panel.params.frame, SssFrame::Device);
        assert_eq!(panel.origin_text, ORIGIN_UNSET);
    }

    #[test]
    fn target_options_start_with_initial() {
        let panel = PanelState::new(snapshot()).unwrap();
        assert_eq!(
            panel.target_options(),
            vec![
                CompTarget::Initial,
                CompTarget::File("/raw/0001/20200102/rest_raw.fif".to_string()),
            ]
        );
    }

    #[test]
    fn params_file_carries_the_selection_context() {
        let panel = PanelState::new(snapshot()).unwrap();
        let file = panel.to_params_file();

        assert_eq!(file.subj_id, "0001");
        assert_eq!(file.modality, "MEG");
        assert_eq!(file.series, 1);
        assert_eq!(file.series_name, "rest");
        assert_eq!(file.files, panel.files());
        assert_eq!(file.output_dir, panel.output_dir);
    }
}
