use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub const CORR_LIMIT_RANGE: RangeInclusive<f32> = 0.5..=0.99;
pub const BUFFER_RANGE: RangeInclusive<u32> = 4..=30;
pub const YLIM_RANGE: RangeInclusive<f32> = -120.0..=120.0;
pub const ZLIM_RANGE: RangeInclusive<f32> = -60.0..=120.0;

/// Automatic bad-channel detection mode, passed through verbatim to the
/// maxfilter invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutobadMode {
    On,
    Off,
}

impl AutobadMode {
    pub const ALL: [AutobadMode; 2] = [AutobadMode::On, AutobadMode::Off];
}

impl fmt::Display for AutobadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AutobadMode::On => "on",
            AutobadMode::Off => "off",
        })
    }
}

/// Coordinate frame the SSS expansion origin is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SssFrame {
    Head,
    Device,
}

impl SssFrame {
    pub const ALL: [SssFrame; 2] = [SssFrame::Head, SssFrame::Device];
}

impl fmt::Display for SssFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SssFrame::Head => "head",
            SssFrame::Device => "device",
        })
    }
}

/// Movement-compensation target: the initial head position or one of the
/// selected raw files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CompTarget {
    Initial,
    File(String),
}

impl fmt::Display for CompTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompTarget::Initial => f.write_str("initial"),
            CompTarget::File(path) => f.write_str(path),
        }
    }
}

impl From<CompTarget> for String {
    fn from(target: CompTarget) -> Self {
        target.to_string()
    }
}

impl From<String> for CompTarget {
    fn from(raw: String) -> Self {
        if raw == "initial" {
            CompTarget::Initial
        } else {
            CompTarget::File(raw)
        }
    }
}

/// The tunable maxfilter parameters assembled by the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxFilterParams {
    pub autobad: AutobadMode,
    pub bad_channels: String,
    pub tsss: bool,
    pub correlation_limit: f32,
    pub buffer_length: u32,
    pub frame: SssFrame,
    pub movecomp: bool,
    pub movecomp_target: CompTarget,
    pub ylim: (f32, f32),
    pub zlim: (f32, f32),
}

impl Default for MaxFilterParams {
    fn default() -> Self {
        Self {
            autobad: AutobadMode::On,
            bad_channels: String::new(),
            tsss: false,
            correlation_limit: 0.96,
            buffer_length: 16,
            frame: SssFrame::Head,
            movecomp: false,
            movecomp_target: CompTarget::Initial,
            ylim: (*YLIM_RANGE.start(), *YLIM_RANGE.end()),
            zlim: (*ZLIM_RANGE.start(), *ZLIM_RANGE.end()),
        }
    }
}

impl MaxFilterParams {
    pub fn set_correlation_limit(&mut self, value: f32) {
        self.correlation_limit = value.clamp(*CORR_LIMIT_RANGE.start(), *CORR_LIMIT_RANGE.end());
    }

    pub fn set_buffer_length(&mut self, value: u32) {
        self.buffer_length = value.clamp(*BUFFER_RANGE.start(), *BUFFER_RANGE.end());
    }

    // The lower and upper ends of each range pair may not cross.

    pub fn set_ylim_lower(&mut self, value: f32) {
        self.ylim.0 = value.clamp(*YLIM_RANGE.start(), self.ylim.1);
    }

    pub fn set_ylim_upper(&mut self, value: f32) {
        self.ylim.1 = value.clamp(self.ylim.0, *YLIM_RANGE.end());
    }

    pub fn set_zlim_lower(&mut self, value: f32) {
        self.zlim.0 = value.clamp(*ZLIM_RANGE.start(), self.zlim.1);
    }

    pub fn set_zlim_upper(&mut self, value: f32) {
        self.zlim.1 = value.clamp(self.zlim.0, *ZLIM_RANGE.end());
    }
}

/// Result of a sphere fit to the digitized head-shape points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereFit {
    pub residual: f32,
    pub origin_head: [f32; 3],
    pub origin_device: [f32; 3],
}

impl SphereFit {
    /// Origin expressed in the requested SSS frame.
    pub fn origin_in(&self, frame: SssFrame) -> [f32; 3] {
        match frame {
            SssFrame::Head => self.origin_head,
            SssFrame::Device => self.origin_device,
        }
    }
}

/// Measurement info of one raw acquisition file, the part the sphere fit
/// consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInfo {
    pub path: String,
    pub headshape_points: Vec<[f32; 3]>,
}

/// Sphere-fit capability of the filtering backend. `ylim`/`zlim` restrict
/// which head-shape points enter the fit.
pub trait SphereFitter: Send + Sync {
    fn fit_sphere_to_headshape(
        &self,
        raw: &RawInfo,
        ylim: (f32, f32),
        zlim: (f32, f32),
    ) -> Result<SphereFit, String>;
}

/// Opens a raw acquisition file read-only and returns its measurement info.
pub trait RawLoader: Send + Sync {
    fn load_info(&self, path: &str) -> Result<RawInfo, String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::format_origin;

    #[test]
    fn defaults_match_the_maxfilter_manual() {
        let params = MaxFilterParams::default();
        assert_eq!(params.autobad, AutobadMode::On);
        assert_eq!(params.correlation_limit, 0.96);
        assert_eq!(params.buffer_length, 16);
        assert_eq!(params.frame, SssFrame::Head);
        assert_eq!(params.ylim, (-120.0, 120.0));
        assert_eq!(params.zlim, (-60.0, 120.0));
    }

    #[test]
    fn setters_clamp_to_bounds() {
        let mut params = MaxFilterParams::default();

        params.set_correlation_limit(1.5);
        assert_eq!(params.correlation_limit, 0.99);
        params.set_correlation_limit(0.1);
        assert_eq!(params.correlation_limit, 0.5);

        params.set_buffer_length(100);
        assert_eq!(params.buffer_length, 30);
        params.set_buffer_length(0);
        assert_eq!(params.buffer_length, 4);
    }

    #[test]
    fn range_ends_cannot_cross() {
        let mut params = MaxFilterParams::default();

        params.set_ylim_upper(-40.0);
        params.set_ylim_lower(0.0);
        assert_eq!(params.ylim, (-40.0, -40.0));

        params.set_zlim_lower(80.0);
        params.set_zlim_upper(-60.0);
        assert_eq!(params.zlim, (80.0, 80.0));
    }

    #[test]
    fn origin_follows_the_selected_frame() {
        let fit = SphereFit {
            residual: 0.0,
            origin_head: [9.0, 9.0, 9.0],
            origin_device: [1.0, 2.0, 3.0],
        };
        assert_eq!(format_origin(fit.origin_in(SssFrame::Device)), "1.0 2.0 3.0");
        assert_eq!(format_origin(fit.origin_in(SssFrame::Head)), "9.0 9.0 9.0");
    }

    #[test]
    fn comp_target_round_trips_through_strings() {
        assert_eq!(CompTarget::from("initial".to_string()), CompTarget::Initial);
        assert_eq!(String::from(CompTarget::Initial), "initial");

        let file = CompTarget::File("/raw/0001/rest_raw.fif".to_string());
        assert_eq!(
            CompTarget::from(String::from(file.clone())),
            file
        );
    }

    #[test]
    fn params_serialize_with_lowercase_modes() {
        let params = MaxFilterParams::default();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["autobad"], "on");
        assert_eq!(json["frame"], "head");
        assert_eq!(json["movecomp_target"], "initial");
    }
}
