use crate::error::SelectionError;
use std::fmt;

/// Reserved "no selection" value shown at the top of every dropdown.
pub const SENTINEL: &str = "---";

/// One entry of the series dropdown: a display name plus the numeric series
/// identifier used when querying files. Id 0 is the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesOption {
    pub name: String,
    pub id: u32,
}

impl SeriesOption {
    pub fn sentinel() -> Self {
        Self {
            name: SENTINEL.to_string(),
            id: 0,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == 0
    }
}

impl fmt::Display for SeriesOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The option set backing the series dropdown: the sentinel entry plus the
/// backend's series, ascending by numeric id. Rebuilt on every study change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesOptions {
    entries: Vec<SeriesOption>,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self::only_sentinel()
    }
}

impl SeriesOptions {
    pub fn only_sentinel() -> Self {
        Self {
            entries: vec![SeriesOption::sentinel()],
        }
    }

    /// Merge the sentinel into the backend's `(name, id)` pairs and sort
    /// ascending by numeric id. The sort is stable, so entries sharing an id
    /// keep the backend's order.
    pub fn from_backend(pairs: Vec<(String, String)>) -> Result<Self, SelectionError> {
        let mut entries = vec![SeriesOption::sentinel()];
        for (name, id) in pairs {
            let id = id
                .parse::<u32>()
                .map_err(|_| SelectionError::BadSeriesId(id))?;
            entries.push(SeriesOption { name, id });
        }
        entries.sort_by_key(|entry| entry.id);
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SeriesOption] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<SeriesOption> {
        self.entries.clone()
    }

    /// Inverse lookup of the display name for a numeric id.
    pub fn name_for(&self, id: u32) -> Result<&str, SelectionError> {
        self.entries()
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.name.as_str())
            .ok_or(SelectionError::UnknownSeriesId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(name, id)| (name.to_string(), id.to_string()))
            .collect()
    }

    #[test]
    fn options_are_sorted_ascending_by_numeric_id() {
        let options = SeriesOptions::from_backend(pairs(&[("func", "3"), ("rest", "1")])).unwrap();
        let rendered: Vec<(&str, u32)> = options
            .entries()
            .iter()
            .map(|entry| (entry.name.as_str(), entry.id))
            .collect();
        assert_eq!(rendered, vec![("---", 0), ("rest", 1), ("func", 3)]);
    }

    #[test]
    fn numeric_sort_is_not_lexicographic() {
        let options = SeriesOptions::from_backend(pairs(&[("late", "12"), ("early", "2")])).unwrap();
        let ids: Vec<u32> = options.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![0, 2, 12]);
    }

    #[test]
    fn equal_ids_keep_backend_order() {
        let options =
            SeriesOptions::from_backend(pairs(&[("first", "2"), ("second", "2")])).unwrap();
        let names: Vec<&str> = options
            .entries()
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["---", "first", "second"]);
    }

    #[test]
    fn empty_backend_result_leaves_only_the_sentinel() {
        let options = SeriesOptions::from_backend(Vec::new()).unwrap();
        assert_eq!(options.entries(), &[SeriesOption::sentinel()]);
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let result = SeriesOptions::from_backend(pairs(&[("broken", "x7")]));
        assert_eq!(result, Err(SelectionError::BadSeriesId("x7".to_string())));
    }

    #[test]
    fn name_lookup_by_id() {
        let options = SeriesOptions::from_backend(pairs(&[("func", "3"), ("rest", "1")])).unwrap();
        assert_eq!(options.name_for(3), Ok("func"));
        assert_eq!(options.name_for(0), Ok(SENTINEL));
        assert_eq!(options.name_for(7), Err(SelectionError::UnknownSeriesId(7)));
    }
}
