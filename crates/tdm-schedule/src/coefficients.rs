//! Tour time-of-day coefficient table and its CSV loader.
//!
//! # CSV format
//!
//! A header row, then one row per tour purpose.  The first column names the
//! purpose (`work`, `school`, `shop`, `recreate`, `other`, `workbased`, or
//! the single-letter codes); every other column is a coefficient:
//!
//! ```csv
//! purpose,departure_0,...,duration_0,...,female_departure,female_duration,...
//! work,0.0,0.4,...
//! ```
//!
//! Column order is given by [`TermLayout`](crate::TermLayout).  Rows must all
//! have the same width and every tour purpose must appear exactly once.  The
//! table is read once and shared behind an `Arc` for the rest of the run.

use std::io::Read;
use std::path::Path;

use tdm_core::ActivityPurpose;

use crate::{ScheduleError, ScheduleResult};

/// Coefficients indexed by `[purpose][column]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientTable {
    width: usize,
    rows:  Vec<Vec<f64>>,
}

impl CoefficientTable {
    /// Build a table from `(purpose, row)` pairs.
    ///
    /// # Errors
    ///
    /// - `Parse` if a pair names `Home` or the rows are empty.
    /// - `DuplicatePurpose` / `MissingPurpose` unless each tour purpose
    ///   appears exactly once.
    /// - `CoefficientShape` if the rows differ in width.
    pub fn from_rows(
        rows: impl IntoIterator<Item = (ActivityPurpose, Vec<f64>)>,
    ) -> ScheduleResult<Self> {
        let mut slots: Vec<Option<Vec<f64>>> = vec![None; ActivityPurpose::TOUR_PURPOSES.len()];
        let mut width = None;

        for (purpose, row) in rows {
            if purpose == ActivityPurpose::Home {
                return Err(ScheduleError::Parse("home has no coefficient row".into()));
            }
            let expected = *width.get_or_insert(row.len());
            if row.len() != expected {
                return Err(ScheduleError::CoefficientShape { purpose, expected, got: row.len() });
            }
            let slot = &mut slots[purpose.index()];
            if slot.is_some() {
                return Err(ScheduleError::DuplicatePurpose(purpose));
            }
            *slot = Some(row);
        }

        let width = width.ok_or_else(|| ScheduleError::Parse("coefficient table is empty".into()))?;
        let rows = slots
            .into_iter()
            .zip(ActivityPurpose::TOUR_PURPOSES)
            .map(|(row, purpose)| row.ok_or(ScheduleError::MissingPurpose(purpose)))
            .collect::<ScheduleResult<Vec<_>>>()?;
        Ok(Self { width, rows })
    }

    /// The same row for every tour purpose.
    pub fn uniform(row: Vec<f64>) -> Self {
        let width = row.len();
        let rows = vec![row; ActivityPurpose::TOUR_PURPOSES.len()];
        Self { width, rows }
    }

    /// Columns per purpose row.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// # Panics
    ///
    /// Panics if `purpose` is `Home`.
    #[inline]
    pub fn row(&self, purpose: ActivityPurpose) -> &[f64] {
        &self.rows[purpose.index()]
    }

    /// `0.0` for `Home` or an out-of-range column.
    pub fn get(&self, purpose: ActivityPurpose, column: usize) -> f64 {
        self.rows
            .get(purpose.index())
            .and_then(|row| row.get(column))
            .copied()
            .unwrap_or(0.0)
    }

    /// Overwrite one coefficient.  Intended for building tables in code.
    pub fn set(&mut self, purpose: ActivityPurpose, column: usize, value: f64) -> ScheduleResult<()> {
        let width = self.width;
        let cell = self
            .rows
            .get_mut(purpose.index())
            .and_then(|row| row.get_mut(column))
            .ok_or(ScheduleError::CoefficientShape { purpose, expected: width, got: column + 1 })?;
        *cell = value;
        Ok(())
    }

    /// Check the table against an expected row width.
    pub fn validate_width(&self, expected: usize) -> ScheduleResult<()> {
        if self.width == expected {
            return Ok(());
        }
        Err(ScheduleError::CoefficientShape {
            purpose: ActivityPurpose::TOUR_PURPOSES[0],
            expected,
            got: self.width,
        })
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load a coefficient table from a CSV file.
pub fn load_coefficients_csv(path: &Path) -> ScheduleResult<CoefficientTable> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_coefficients_reader(file)
}

/// Like [`load_coefficients_csv`] but accepts any `Read` source.
pub fn load_coefficients_reader<R: Read>(reader: R) -> ScheduleResult<CoefficientTable> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::with_capacity(ActivityPurpose::TOUR_PURPOSES.len());

    for (line, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let mut fields = record.iter();
        let name = fields
            .next()
            .ok_or_else(|| ScheduleError::Parse(format!("row {}: empty record", line + 1)))?;
        let purpose: ActivityPurpose = name
            .parse()
            .map_err(|e| ScheduleError::Parse(format!("row {}: {e}", line + 1)))?;
        let values = fields
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f64>().map_err(|e| {
                    ScheduleError::Parse(format!("row {} column {}: {field:?}: {e}", line + 1, col + 1))
                })
            })
            .collect::<ScheduleResult<Vec<f64>>>()?;
        rows.push((purpose, values));
    }

    CoefficientTable::from_rows(rows)
}
