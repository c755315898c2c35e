//! Activity purposes and structural activity roles.
//!
//! Purposes are declared in priority order: a lower [`ActivityPurpose::rank`]
//! means a stronger claim on being a tour's primary destination.  Work ranks
//! above school, school above shop, and so on down to home.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

// ── ActivityPurpose ───────────────────────────────────────────────────────────

/// Why a person is at an activity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivityPurpose {
    Work,
    School,
    Shop,
    Recreate,
    Other,
    /// Activity away from a work location on a work-anchored sub-tour.
    WorkBased,
    Home,
}

impl ActivityPurpose {
    /// All purposes in priority order.
    pub const ALL: [ActivityPurpose; 7] = [
        ActivityPurpose::Work,
        ActivityPurpose::School,
        ActivityPurpose::Shop,
        ActivityPurpose::Recreate,
        ActivityPurpose::Other,
        ActivityPurpose::WorkBased,
        ActivityPurpose::Home,
    ];

    /// Purposes that can be the primary destination of a tour and therefore
    /// own a row in the scheduling coefficient table.
    pub const TOUR_PURPOSES: [ActivityPurpose; 6] = [
        ActivityPurpose::Work,
        ActivityPurpose::School,
        ActivityPurpose::Shop,
        ActivityPurpose::Recreate,
        ActivityPurpose::Other,
        ActivityPurpose::WorkBased,
    ];

    /// Priority rank; lower is higher priority.
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Dense index into per-purpose arrays (same as [`rank`](Self::rank)).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Decode a day-pattern letter (case-insensitive).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'w' => Some(ActivityPurpose::Work),
            'c' => Some(ActivityPurpose::School),
            's' => Some(ActivityPurpose::Shop),
            'r' => Some(ActivityPurpose::Recreate),
            'o' => Some(ActivityPurpose::Other),
            'b' => Some(ActivityPurpose::WorkBased),
            'h' => Some(ActivityPurpose::Home),
            _ => None,
        }
    }

    /// The lowercase day-pattern letter for this purpose.
    pub fn code(self) -> char {
        match self {
            ActivityPurpose::Work      => 'w',
            ActivityPurpose::School    => 'c',
            ActivityPurpose::Shop      => 's',
            ActivityPurpose::Recreate  => 'r',
            ActivityPurpose::Other     => 'o',
            ActivityPurpose::WorkBased => 'b',
            ActivityPurpose::Home      => 'h',
        }
    }

    /// Work and school tours are scheduled ahead of discretionary ones.
    #[inline]
    pub fn is_mandatory(self) -> bool {
        matches!(self, ActivityPurpose::Work | ActivityPurpose::School)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityPurpose::Work      => "work",
            ActivityPurpose::School    => "school",
            ActivityPurpose::Shop      => "shop",
            ActivityPurpose::Recreate  => "recreate",
            ActivityPurpose::Other     => "other",
            ActivityPurpose::WorkBased => "workbased",
            ActivityPurpose::Home      => "home",
        }
    }
}

impl fmt::Display for ActivityPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityPurpose {
    type Err = CoreError;

    /// Accepts the long name (`"work"`, `"workbased"`, …) or the single
    /// pattern letter, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_code(c).ok_or_else(|| CoreError::UnknownPurpose(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::UnknownPurpose(s.to_string()))
    }
}

// ── ActivityType ──────────────────────────────────────────────────────────────

/// The structural role of an activity within its tour.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivityType {
    /// Tour anchor at departure (home, or work for sub-tours).
    Begin,
    /// Optional stop on the way out.
    IntermediateStop1,
    PrimaryDestination,
    /// Optional stop on the way back.
    IntermediateStop2,
    /// Tour anchor at return.
    End,
}

impl ActivityType {
    pub fn is_intermediate_stop(self) -> bool {
        matches!(self, ActivityType::IntermediateStop1 | ActivityType::IntermediateStop2)
    }
}
