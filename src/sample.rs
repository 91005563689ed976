//! In-memory stand-ins for the three injected capabilities: the record
//! database, the raw-file loader, and the sphere fitter.
//!
//! These back the unit tests and let the app run without site
//! infrastructure; a real deployment wires its own implementations of the
//! [`RecordQuery`], [`RawLoader`], and [`SphereFitter`] traits instead.

use crate::model::maxfilter::{RawInfo, RawLoader, SphereFit, SphereFitter};
use crate::model::{FileListing, Modality, RecordQuery, StudyList};
use std::collections::BTreeMap;
use std::f32::consts::{PI, TAU};

pub struct SampleDatabase {
    proj_code: String,
    subjects: Vec<String>,
    studies: BTreeMap<(String, Modality), StudyList>,
    series: BTreeMap<(String, String, Modality), Vec<(String, String)>>,
    files: BTreeMap<(String, String, Modality, u32), FileListing>,
}

impl SampleDatabase {
    pub fn new(proj_code: &str) -> Self {
        Self {
            proj_code: proj_code.to_string(),
            subjects: Vec::new(),
            studies: BTreeMap::new(),
            series: BTreeMap::new(),
            files: BTreeMap::new(),
        }
    }

    pub fn add_subject(&mut self, subj_id: &str) {
        self.subjects.push(subj_id.to_string());
    }

    pub fn set_studies(&mut self, subj_id: &str, modality: Modality, studies: StudyList) {
        self.studies.insert((subj_id.to_string(), modality), studies);
    }

    pub fn set_series(
        &mut self,
        subj_id: &str,
        study: &str,
        modality: Modality,
        pairs: &[(&str, &str)],
    ) {
        self.series.insert(
            (subj_id.to_string(), study.to_string(), modality),
            pairs
                .iter()
                .map(|(name, id)| (name.to_string(), id.to_string()))
                .collect(),
        );
    }

    pub fn set_files(
        &mut self,
        subj_id: &str,
        study: &str,
        modality: Modality,
        series: u32,
        listing: FileListing,
    ) {
        self.files.insert(
            (subj_id.to_string(), study.to_string(), modality, series),
            listing,
        );
    }

    /// A small project with enough irregularities to exercise the browser:
    /// a scalar study result, an out-of-order series map, and one series
    /// whose file listing is not a path list.
    pub fn seeded() -> Self {
        let mut db = Self::new("MINDLAB2020_MEG-Rest");

        db.add_subject("0001");
        db.add_subject("0002");
        db.add_subject("0030");

        db.set_studies(
            "0001",
            Modality::Meg,
            StudyList::Many(vec!["2020-01-01".to_string(), "2020-01-02".to_string()]),
        );
        db.set_studies(
            "0001",
            Modality::Mr,
            StudyList::Many(vec!["2020-01-03".to_string()]),
        );
        db.set_studies("0002", Modality::Meg, StudyList::One("2019-11-05".to_string()));

        db.set_series(
            "0001",
            "2020-01-02",
            Modality::Meg,
            &[("func", "3"), ("rest", "1")],
        );
        db.set_series("0001", "2020-01-01", Modality::Meg, &[("rest", "1")]);
        db.set_series(
            "0002",
            "2019-11-05",
            Modality::Meg,
            &[("noise", "2"), ("task", "4")],
        );

        db.set_files(
            "0001",
            "2020-01-02",
            Modality::Meg,
            1,
            FileListing::Files(vec!["/raw/0001/20200102/rest_raw.fif".to_string()]),
        );
        db.set_files(
            "0001",
            "2020-01-02",
            Modality::Meg,
            3,
            FileListing::Files(vec![
                "/raw/0001/20200102/func_raw-1.fif".to_string(),
                "/raw/0001/20200102/func_raw-2.fif".to_string(),
            ]),
        );
        db.set_files(
            "0001",
            "2020-01-01",
            Modality::Meg,
            1,
            FileListing::Opaque("archived to tape".to_string()),
        );
        db.set_files(
            "0002",
            "2019-11-05",
            Modality::Meg,
            2,
            FileListing::Files(vec!["/raw/0002/20191105/noise_raw.fif".to_string()]),
        );
        db.set_files(
            "0002",
            "2019-11-05",
            Modality::Meg,
            4,
            FileListing::Files(vec!["/raw/0002/20191105/task_raw.fif".to_string()]),
        );

        db
    }
}

impl RecordQuery for SampleDatabase {
    fn project_code(&self) -> &str {
        &self.proj_code
    }

    fn subjects(&self) -> Vec<String> {
        self.subjects.clone()
    }

    fn studies(&self, subj_id: &str, modality: Modality, _unique: bool) -> StudyList {
        self.studies
            .get(&(subj_id.to_string(), modality))
            .cloned()
            .unwrap_or(StudyList::Many(Vec::new()))
    }

    fn series(&self, subj_id: &str, study: &str, modality: Modality) -> Vec<(String, String)> {
        self.series
            .get(&(subj_id.to_string(), study.to_string(), modality))
            .cloned()
            .unwrap_or_default()
    }

    fn files(&self, subj_id: &str, study: &str, modality: Modality, series: u32) -> FileListing {
        self.files
            .get(&(subj_id.to_string(), study.to_string(), modality, series))
            .cloned()
            .unwrap_or(FileListing::Files(Vec::new()))
    }
}

/// Fabricates a deterministic upper-hemisphere point cloud from the file
/// path, roughly head-sized in millimetres, so the fit action works end to
/// end without real FIF files.
pub struct SampleLoader;

const HEADSHAPE_POINTS: u32 = 64;

impl RawLoader for SampleLoader {
    fn load_info(&self, path: &str) -> Result<RawInfo, String> {
        if path.is_empty() {
            return Err("empty raw file path".to_string());
        }
        log::info!("loading measurement info from {path}");

        let seed = path
            .bytes()
            .fold(0u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u32));

        let mut points = Vec::with_capacity(HEADSHAPE_POINTS as usize);
        for i in 0..HEADSHAPE_POINTS {
            let jitter =
                (seed.wrapping_add(i.wrapping_mul(2_654_435_761)) % 1000) as f32 / 1000.0;
            let theta = (i as f32 / HEADSHAPE_POINTS as f32) * TAU;
            let phi = jitter * PI / 2.0;
            let radius = 80.0 + (jitter - 0.5) * 4.0;
            points.push([
                radius * phi.cos() * theta.cos(),
                10.0 + radius * phi.cos() * theta.sin(),
                40.0 + radius * phi.sin(),
            ]);
        }

        Ok(RawInfo {
            path: path.to_string(),
            headshape_points: points,
        })
    }
}

/// Centroid sphere fit over the points inside the y/z limits: centroid as
/// origin, RMS spread of the point distances as residual. Placeholder
/// numerics, not the MaxFilter algorithm.
pub struct SampleFitter {
    /// Translation from the head frame to the device frame.
    device_offset: [f32; 3],
}

impl Default for SampleFitter {
    fn default() -> Self {
        Self {
            device_offset: [0.0, 0.0, -40.0],
        }
    }
}

impl SphereFitter for SampleFitter {
    fn fit_sphere_to_headshape(
        &self,
        raw: &RawInfo,
        ylim: (f32, f32),
        zlim: (f32, f32),
    ) -> Result<SphereFit, String> {
        let selected: Vec<[f32; 3]> = raw
            .headshape_points
            .iter()
            .copied()
            .filter(|p| p[1] >= ylim.0 && p[1] <= ylim.1 && p[2] >= zlim.0 && p[2] <= zlim.1)
            .collect();
        if selected.is_empty() {
            return Err(format!(
                "no head-shape points of {} inside the y/z limits",
                raw.path
            ));
        }

        let n = selected.len() as f32;
        let mut centroid = [0.0f32; 3];
        for point in &selected {
            centroid[0] += point[0] / n;
            centroid[1] += point[1] / n;
            centroid[2] += point[2] / n;
        }

        let distances: Vec<f32> = selected
            .iter()
            .map(|p| {
                let dx = p[0] - centroid[0];
                let dy = p[1] - centroid[1];
                let dz = p[2] - centroid[2];
                (dx * dx + dy * dy + dz * dz).sqrt()
            })
            .collect();
        let mean_radius = distances.iter().sum::<f32>() / n;
        let residual = (distances
            .iter()
            .map(|d| (d - mean_radius) * (d - mean_radius))
            .sum::<f32>()
            / n)
            .sqrt();

        Ok(SphereFit {
            residual,
            origin_head: centroid,
            origin_device: [
                centroid[0] + self.device_offset[0],
                centroid[1] + self.device_offset[1],
                centroid[2] + self.device_offset[2],
            ],
        })
    }
}
