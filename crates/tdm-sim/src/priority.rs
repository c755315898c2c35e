//! Default scheduling priorities.

use tdm_pattern::Tour;

/// Number tours `0, 1, 2, …` in the order they should be scheduled:
/// home-based mandatory (work, school) tours by chronological order, then the
/// remaining home-based tours by chronological order, then work-based
/// sub-tours grouped by parent.
pub fn assign_default_priorities(tours: &mut [Tour]) {
    let mut ranked: Vec<usize> = (0..tours.len()).collect();
    ranked.sort_by_key(|&i| {
        let tour = &tours[i];
        let group = match (tour.parent, tour.primary_purpose().is_mandatory()) {
            (None, true) => 0,
            (None, false) => 1,
            (Some(_), _) => 2,
        };
        (group, tour.parent, tour.order, i)
    });
    for (priority, index) in ranked.into_iter().enumerate() {
        tours[index].priority = priority;
    }
}
