//! The day-pattern decoder.
//!
//! # Decoding
//!
//! One left-to-right scan counts every purpose letter.  Each `h` after the
//! first closes a tour; the closed tour's interior is classified with the
//! same primary-destination rule the tour builder uses, which increments
//! the per-purpose tour counter, the stop counters, and one combination
//! counter per unordered pair of distinct interior purposes.
//!
//! `"h"` is a valid stay-at-home day: zero tours, all counts zero.

use std::fmt;

use tdm_core::ActivityPurpose;

use crate::builder::primary_index;
use crate::{PatternError, PatternResult};

const PURPOSES: usize = ActivityPurpose::ALL.len();

/// A parsed day-pattern code plus its summary statistics.
///
/// Immutable once parsed; `clone()` is the deep copy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    /// Lowercased code.
    code: String,
    /// Byte offsets of every `h`.
    homes: Vec<usize>,
    activity_counts: [usize; PURPOSES],
    tour_counts: [usize; PURPOSES],
    intermediate_stops: usize,
    tours_with_stops: usize,
    /// Symmetric; `[a][b]` counts tours whose interior contains both.
    combinations: [[usize; PURPOSES]; PURPOSES],
}

impl Pattern {
    /// Parse and summarise a day-pattern code.
    ///
    /// # Errors
    ///
    /// `Empty`, `InvalidCharacter`, or `MissingHomeAnchor` when the code is
    /// not a home-anchored string over the pattern alphabet.
    pub fn parse(code: &str) -> PatternResult<Self> {
        let code = code.trim().to_ascii_lowercase();
        if code.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut pattern = Pattern {
            code: String::new(),
            homes: Vec::new(),
            activity_counts: [0; PURPOSES],
            tour_counts: [0; PURPOSES],
            intermediate_stops: 0,
            tours_with_stops: 0,
            combinations: [[0; PURPOSES]; PURPOSES],
        };

        let mut interior: Vec<ActivityPurpose> = Vec::with_capacity(4);
        for (position, c) in code.char_indices() {
            let purpose = ActivityPurpose::from_code(c).ok_or_else(|| {
                PatternError::InvalidCharacter { code: code.clone(), character: c, position }
            })?;
            pattern.activity_counts[purpose.index()] += 1;

            match purpose {
                ActivityPurpose::Home => {
                    if !pattern.homes.is_empty() {
                        pattern.close_tour(&interior);
                    }
                    pattern.homes.push(position);
                    interior.clear();
                }
                ActivityPurpose::WorkBased => {}
                _ => interior.push(purpose),
            }
        }

        if !code.starts_with('h') || !code.ends_with('h') {
            return Err(PatternError::MissingHomeAnchor(code));
        }
        pattern.code = code;
        Ok(pattern)
    }

    fn close_tour(&mut self, interior: &[ActivityPurpose]) {
        if let Some(primary) = primary_index(interior) {
            self.tour_counts[interior[primary].index()] += 1;
            let stops = interior.len() - 1;
            self.intermediate_stops += stops;
            if stops > 0 {
                self.tours_with_stops += 1;
            }
        }

        let mut seen: Vec<ActivityPurpose> = interior.to_vec();
        seen.sort_unstable();
        seen.dedup();
        for (i, &a) in seen.iter().enumerate() {
            for &b in &seen[i + 1..] {
                self.combinations[a.index()][b.index()] += 1;
                self.combinations[b.index()][a.index()] += 1;
            }
        }
    }

    // ── Code and tour substrings ──────────────────────────────────────────

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Number of home-based tours: home occurrences minus one.
    pub fn tour_count(&self) -> usize {
        self.homes.len().saturating_sub(1)
    }

    /// Substring of tour `n` (1-based), both home anchors included.
    ///
    /// # Errors
    ///
    /// `TourOutOfRange` if `n` is 0 or greater than [`tour_count`](Self::tour_count);
    /// in particular for any request against a pattern with fewer than two
    /// homes.
    pub fn tour_string(&self, n: usize) -> PatternResult<&str> {
        if n == 0 || n > self.tour_count() {
            return Err(PatternError::TourOutOfRange {
                code:      self.code.clone(),
                requested: n,
                available: self.tour_count(),
            });
        }
        Ok(&self.code[self.homes[n - 1]..=self.homes[n]])
    }

    /// All tour substrings in chronological order.
    pub fn tour_strings(&self) -> Vec<&str> {
        self.homes
            .windows(2)
            .map(|w| &self.code[w[0]..=w[1]])
            .collect()
    }

    // ── Counts ────────────────────────────────────────────────────────────

    /// Occurrences of `purpose` anywhere in the code.
    pub fn activities(&self, purpose: ActivityPurpose) -> usize {
        self.activity_counts[purpose.index()]
    }

    pub fn home_activities(&self) -> usize {
        self.activities(ActivityPurpose::Home)
    }

    /// Home-based tours whose primary destination has `purpose`.
    pub fn tours_for(&self, purpose: ActivityPurpose) -> usize {
        self.tour_counts[purpose.index()]
    }

    pub fn intermediate_stops(&self) -> usize {
        self.intermediate_stops
    }

    pub fn tours_with_stops(&self) -> usize {
        self.tours_with_stops
    }

    /// Work-based sub-tours (one per `b`).
    pub fn work_based_tours(&self) -> usize {
        self.activities(ActivityPurpose::WorkBased)
    }

    /// Tours on which both `a` and `b` appear as out-of-home activities.
    /// Zero when `a == b`.
    pub fn tours_combining(&self, a: ActivityPurpose, b: ActivityPurpose) -> usize {
        self.combinations[a.index()][b.index()]
    }

    /// Primary purpose of each home-based tour in order; tours too short or
    /// too long to classify are skipped.
    pub fn tour_purposes(&self) -> Vec<ActivityPurpose> {
        self.tour_strings()
            .into_iter()
            .filter_map(|s| {
                let interior: Vec<ActivityPurpose> = s
                    .chars()
                    .filter_map(ActivityPurpose::from_code)
                    .filter(|p| !matches!(p, ActivityPurpose::Home | ActivityPurpose::WorkBased))
                    .collect();
                primary_index(&interior).map(|i| interior[i])
            })
            .collect()
    }

    // ── Indicators ────────────────────────────────────────────────────────

    pub fn is_stay_at_home(&self) -> bool {
        self.tour_count() == 0
    }

    pub fn has_purpose(&self, purpose: ActivityPurpose) -> bool {
        self.activities(purpose) > 0
    }

    /// Out-of-home activities, excluding work-based markers.
    fn out_of_home_activities(&self) -> usize {
        ActivityPurpose::ALL
            .into_iter()
            .filter(|p| !matches!(p, ActivityPurpose::Home | ActivityPurpose::WorkBased))
            .map(|p| self.activities(p))
            .sum()
    }

    /// Work is the only out-of-home purpose (work-based sub-tours allowed).
    pub fn is_work_only(&self) -> bool {
        let work = self.activities(ActivityPurpose::Work);
        work > 0 && work == self.out_of_home_activities()
    }

    /// School is the only out-of-home purpose.
    pub fn is_school_only(&self) -> bool {
        let school = self.activities(ActivityPurpose::School);
        school > 0 && school == self.out_of_home_activities() && !self.has_work_based_tour()
    }

    pub fn has_two_plus_tours(&self) -> bool {
        self.tour_count() >= 2
    }

    pub fn has_work_based_tour(&self) -> bool {
        self.work_based_tours() > 0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
