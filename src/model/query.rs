use std::fmt;

/// Acquisition modality understood by the record database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modality {
    Meg,
    Mr,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Modality::Meg => "MEG",
            Modality::Mr => "MR",
        })
    }
}

/// Study listing as returned by the backend. A single result may come back
/// as a bare scalar; [`StudyList::into_vec`] is the one place that shape is
/// normalized, so everything downstream sees a plain list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyList {
    One(String),
    Many(Vec<String>),
}

impl StudyList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StudyList::One(study) => vec![study],
            StudyList::Many(studies) => studies,
        }
    }
}

/// File listing for a concrete series. Backends occasionally hand back
/// something that is not a list of paths; such results are kept opaque and
/// render as an empty files display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileListing {
    Files(Vec<String>),
    Opaque(String),
}

impl FileListing {
    pub fn paths(&self) -> Option<&[String]> {
        match self {
            FileListing::Files(paths) => Some(paths),
            FileListing::Opaque(_) => None,
        }
    }
}

/// Read access to the hierarchical acquisition record database.
///
/// Series are reported as `(display name, numeric id)` pairs; the id is a
/// decimal string on the wire and strictly positive for concrete series.
pub trait RecordQuery: Send + Sync {
    fn project_code(&self) -> &str;

    fn subjects(&self) -> Vec<String>;

    fn studies(&self, subj_id: &str, modality: Modality, unique: bool) -> StudyList;

    fn series(&self, subj_id: &str, study: &str, modality: Modality) -> Vec<(String, String)>;

    fn files(&self, subj_id: &str, study: &str, modality: Modality, series: u32) -> FileListing;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_study_normalizes_to_single_element_list() {
        let list = StudyList::One("2019-11-05".to_string());
        assert_eq!(list.into_vec(), vec!["2019-11-05".to_string()]);
    }

    #[test]
    fn opaque_listing_has_no_paths() {
        assert!(FileListing::Opaque("archived".to_string()).paths().is_none());

        let listing = FileListing::Files(vec!["a_raw.fif".to_string()]);
        assert_eq!(listing.paths(), Some(&["a_raw.fif".to_string()][..]));
    }
}
