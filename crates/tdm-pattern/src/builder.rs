//! Tour construction from tour substrings.
//!
//! # Primary-destination rule
//!
//! | Interior | Primary | Stops                                              |
//! |----------|---------|----------------------------------------------------|
//! | `X`      | X       | none                                               |
//! | `X Y`    | see below | the other one                                    |
//! | `X Y Z`  | Y       | X outbound, Z inbound                              |
//!
//! For two activities the higher-priority purpose (lower rank) is primary:
//! if X ranks strictly below Y, X becomes the outbound stop; otherwise Y is
//! the inbound stop.  Two calibrated exceptions override the rank rule and
//! are kept verbatim rather than folded into a general rule:
//!
//! - school then work: school stays primary, work is the inbound stop;
//! - work then school: school is the inbound stop.
//!
//! Work-based markers (`b`) are not activities of the parent tour.  Each one
//! becomes a separate work → other → work sub-tour anchored on the parent's
//! work activity.

use tdm_core::{ActivityPurpose, ActivityType};

use crate::{Activity, Pattern, PatternError, PatternResult, Tour, TourKind};

/// Index of the primary destination within a tour's interior purposes
/// (work-based markers already removed), or `None` for an empty or
/// over-long interior.
pub fn primary_index(interior: &[ActivityPurpose]) -> Option<usize> {
    use ActivityPurpose::{School, Work};

    match interior {
        [_] => Some(0),
        // Special case: school keeps the primary slot ahead of a later work stop.
        [School, Work] => Some(0),
        // Special case: a school activity after work is always the inbound stop.
        [Work, School] => Some(0),
        [x, y] if x.rank() > y.rank() => Some(1),
        [_, _] => Some(0),
        [_, _, _] => Some(1),
        _ => None,
    }
}

/// Split a tour string into its interior purposes and work-based marker count.
fn interior_of(tour_string: &str) -> PatternResult<(Vec<ActivityPurpose>, usize)> {
    let chars: Vec<char> = tour_string.chars().collect();
    if chars.len() < 3 {
        return Err(PatternError::TourTooShort(tour_string.to_string()));
    }

    let is_home = |c: char| ActivityPurpose::from_code(c) == Some(ActivityPurpose::Home);
    if !is_home(chars[0]) || !is_home(chars[chars.len() - 1]) {
        return Err(PatternError::MissingHomeAnchor(tour_string.to_string()));
    }

    let mut interior = Vec::with_capacity(chars.len() - 2);
    let mut work_based = 0;
    for (position, &c) in chars[1..chars.len() - 1].iter().enumerate() {
        match ActivityPurpose::from_code(c) {
            Some(ActivityPurpose::Home) => {
                return Err(PatternError::UnexpectedHome(tour_string.to_string()));
            }
            Some(ActivityPurpose::WorkBased) => work_based += 1,
            Some(purpose) => interior.push(purpose),
            None => {
                return Err(PatternError::InvalidCharacter {
                    code:      tour_string.to_string(),
                    character: c,
                    position:  position + 1,
                });
            }
        }
    }
    Ok((interior, work_based))
}

/// Build a home-based tour from one tour substring.
///
/// # Errors
///
/// - `TourTooShort` for fewer than 3 characters or no out-of-home activity;
/// - `TourTooLong` for more than three out-of-home activities;
/// - `MissingHomeAnchor`, `UnexpectedHome`, `InvalidCharacter` for malformed
///   strings;
/// - `WorkBasedWithoutWork` when a `b` marker has no work activity to hang on.
pub fn build_tour(tour_string: &str, order: usize) -> PatternResult<Tour> {
    let (interior, work_based) = interior_of(tour_string)?;

    if work_based > 0 && !interior.contains(&ActivityPurpose::Work) {
        return Err(PatternError::WorkBasedWithoutWork(tour_string.to_string()));
    }
    if interior.is_empty() {
        return Err(PatternError::TourTooShort(tour_string.to_string()));
    }
    let primary = primary_index(&interior)
        .ok_or_else(|| PatternError::TourTooLong(tour_string.to_string()))?;

    let mut intermediate_stop1 = None;
    let mut intermediate_stop2 = None;
    for (i, &purpose) in interior.iter().enumerate() {
        if i < primary {
            intermediate_stop1 = Some(Activity::new(purpose, ActivityType::IntermediateStop1));
        } else if i > primary {
            intermediate_stop2 = Some(Activity::new(purpose, ActivityType::IntermediateStop2));
        }
    }

    Ok(Tour {
        tour_string: tour_string.to_ascii_lowercase(),
        kind: TourKind::HomeBased,
        order,
        priority: order,
        parent: None,
        begin: Activity::new(ActivityPurpose::Home, ActivityType::Begin),
        intermediate_stop1,
        primary_destination: Activity::new(interior[primary], ActivityType::PrimaryDestination),
        intermediate_stop2,
        end: Activity::new(ActivityPurpose::Home, ActivityType::End),
        duration_minutes: 0,
        degraded: false,
    })
}

/// Build the fixed work → other → work sub-tour nested in `parent`.
///
/// Both anchors copy the location of the parent's work activity at build
/// time.
///
/// # Errors
///
/// `WorkBasedWithoutWork` if `parent` has no work activity.
pub fn build_work_based_tour(parent: &Tour, parent_index: usize, order: usize) -> PatternResult<Tour> {
    let work = parent
        .work_activity()
        .ok_or_else(|| PatternError::WorkBasedWithoutWork(parent.tour_string.clone()))?;

    let mut begin = Activity::new(ActivityPurpose::Work, ActivityType::Begin);
    begin.location = work.location;
    let mut end = Activity::new(ActivityPurpose::Work, ActivityType::End);
    end.location = work.location;

    Ok(Tour {
        tour_string: "wow".to_string(),
        kind: TourKind::WorkBased,
        order,
        priority: order,
        parent: Some(parent_index),
        begin,
        intermediate_stop1: None,
        primary_destination: Activity::new(ActivityPurpose::Other, ActivityType::PrimaryDestination),
        intermediate_stop2: None,
        end,
        duration_minutes: 0,
        degraded: false,
    })
}

/// Build every tour of a pattern.
///
/// Home-based tours come first, in chronological order (`order` = index).
/// Work-based sub-tours follow, grouped by parent; each sub-tour's `order`
/// counts from zero within its parent.  Priorities default to the list
/// index and are expected to be reassigned by the caller.
pub fn build_tours(pattern: &Pattern) -> PatternResult<Vec<Tour>> {
    let mut tours = pattern
        .tour_strings()
        .into_iter()
        .enumerate()
        .map(|(order, s)| build_tour(s, order))
        .collect::<PatternResult<Vec<Tour>>>()?;

    let home_based = tours.len();
    for parent_index in 0..home_based {
        for order in 0..tours[parent_index].work_based_markers() {
            let mut sub = build_work_based_tour(&tours[parent_index], parent_index, order)?;
            sub.priority = tours.len();
            tours.push(sub);
        }
    }
    Ok(tours)
}
