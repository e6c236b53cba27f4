use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::Lane;

/// A single cell carried through from the source CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Missing,
}

impl CellValue {
    /// Text content, empty for missing cells. Used when projecting payload
    /// columns back out to CSV.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            CellValue::Text(value) => value,
            CellValue::Missing => "",
        }
    }
}

/// One prepared survey row.
///
/// The matching keys (`chainage`, `lane`, `timestamp`) are typed and
/// validated by the preparation stage; everything else from the source file
/// rides along in `payload`, opaque to the matcher.
#[derive(Debug, Clone)]
pub struct SurveyRecord {
    /// Linear-referencing position along the road, in meters.
    pub chainage: f64,
    pub lane: Lane,
    pub timestamp: NaiveDateTime,
    pub payload: BTreeMap<String, CellValue>,
}

/// An ordered, prepared dataset. Record ids are positional: the record at
/// index `i` has id `i`, assigned once at preparation time.
#[derive(Debug, Clone)]
pub struct SurveyDataset {
    /// Dataset label used in logs and errors (e.g. "MSD").
    pub name: String,
    /// Source column order, preserved for output projection.
    pub columns: Vec<String>,
    pub records: Vec<SurveyRecord>,
}

impl SurveyDataset {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: SurveyRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
