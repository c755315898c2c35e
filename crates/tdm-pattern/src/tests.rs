//! Unit tests for tdm-pattern.

use tdm_core::{ActivityPurpose, ActivityType, ClockTime, ZoneId};

use crate::{build_tour, build_tours, Pattern, PatternError, TourKind};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t(hour: u8) -> ClockTime {
    ClockTime::from_hm(hour, 0).unwrap()
}

/// Purposes of (stop 1, primary, stop 2) for a tour string.
fn roles(tour_string: &str) -> (Option<ActivityPurpose>, ActivityPurpose, Option<ActivityPurpose>) {
    let tour = build_tour(tour_string, 0).unwrap();
    (
        tour.intermediate_stop1.as_ref().map(|a| a.purpose),
        tour.primary_purpose(),
        tour.intermediate_stop2.as_ref().map(|a| a.purpose),
    )
}

// ── Pattern decoding ──────────────────────────────────────────────────────────

#[cfg(test)]
mod pattern {
    use super::*;

    #[test]
    fn single_work_tour() {
        let p = Pattern::parse("hwh").unwrap();
        assert_eq!(p.tour_count(), 1);
        assert_eq!(p.tour_strings(), vec!["hwh"]);
        assert_eq!(p.home_activities(), 2);
        assert_eq!(p.tours_for(ActivityPurpose::Work), 1);
        assert_eq!(p.intermediate_stops(), 0);
        assert!(p.is_work_only());
        assert!(!p.has_two_plus_tours());
    }

    #[test]
    fn stay_at_home_has_zero_tours() {
        let p = Pattern::parse("h").unwrap();
        assert!(p.is_stay_at_home());
        assert_eq!(p.tour_count(), 0);
        assert!(p.tour_strings().is_empty());
        for purpose in ActivityPurpose::TOUR_PURPOSES {
            assert_eq!(p.activities(purpose), 0);
            assert_eq!(p.tours_for(purpose), 0);
        }
        assert!(!p.is_work_only());
    }

    #[test]
    fn tour_request_without_tours_is_fatal() {
        let p = Pattern::parse("h").unwrap();
        assert_eq!(
            p.tour_string(1),
            Err(PatternError::TourOutOfRange { code: "h".into(), requested: 1, available: 0 })
        );
        let p = Pattern::parse("hwh").unwrap();
        assert!(p.tour_string(0).is_err());
        assert!(p.tour_string(2).is_err());
    }

    #[test]
    fn tour_count_is_homes_minus_one_and_reconstructs() {
        for code in ["hwh", "hwhsh", "hcwhorh", "hswchrh", "hwbhsh", "hhwh"] {
            let p = Pattern::parse(code).unwrap();
            assert_eq!(p.tour_count(), p.home_activities() - 1, "{code}");

            let strings = p.tour_strings();
            let mut rebuilt = strings[0].to_string();
            for s in &strings[1..] {
                rebuilt.push_str(&s[1..]);
            }
            assert_eq!(rebuilt, code);

            for (n, s) in strings.iter().enumerate() {
                assert_eq!(p.tour_string(n + 1).unwrap(), *s);
            }
        }
    }

    #[test]
    fn case_insensitive() {
        let p = Pattern::parse("HwSh").unwrap();
        assert_eq!(p.code(), "hwsh");
        assert_eq!(p.activities(ActivityPurpose::Shop), 1);
    }

    #[test]
    fn counts_and_combinations() {
        let p = Pattern::parse("hswhshcoh").unwrap();
        assert_eq!(p.tour_count(), 3);
        assert_eq!(p.activities(ActivityPurpose::Shop), 2);
        assert_eq!(p.tours_for(ActivityPurpose::Work), 1);
        assert_eq!(p.tours_for(ActivityPurpose::Shop), 1);
        assert_eq!(p.tours_for(ActivityPurpose::School), 1);
        assert_eq!(p.intermediate_stops(), 2);
        assert_eq!(p.tours_with_stops(), 2);
        assert_eq!(p.tours_combining(ActivityPurpose::Work, ActivityPurpose::Shop), 1);
        assert_eq!(p.tours_combining(ActivityPurpose::Shop, ActivityPurpose::Work), 1);
        assert_eq!(p.tours_combining(ActivityPurpose::School, ActivityPurpose::Other), 1);
        assert_eq!(p.tours_combining(ActivityPurpose::Work, ActivityPurpose::Other), 0);
        assert_eq!(p.tours_combining(ActivityPurpose::Shop, ActivityPurpose::Shop), 0);
        assert_eq!(
            p.tour_purposes(),
            vec![ActivityPurpose::Work, ActivityPurpose::Shop, ActivityPurpose::School]
        );
        assert!(!p.is_work_only());
        assert!(p.has_two_plus_tours());
    }

    #[test]
    fn work_based_markers_counted_separately() {
        let p = Pattern::parse("hwbh").unwrap();
        assert_eq!(p.work_based_tours(), 1);
        assert_eq!(p.tours_for(ActivityPurpose::Work), 1);
        assert_eq!(p.intermediate_stops(), 0);
        assert!(p.is_work_only());
        assert!(p.has_work_based_tour());
    }

    #[test]
    fn invalid_codes() {
        assert_eq!(Pattern::parse(""), Err(PatternError::Empty));
        assert!(matches!(
            Pattern::parse("hxh"),
            Err(PatternError::InvalidCharacter { character: 'x', position: 1, .. })
        ));
        assert_eq!(Pattern::parse("wh"), Err(PatternError::MissingHomeAnchor("wh".into())));
        assert_eq!(Pattern::parse("hw"), Err(PatternError::MissingHomeAnchor("hw".into())));
    }

    #[test]
    fn long_codes_count_without_overflow() {
        let code = format!("h{}", "wh".repeat(70_000));
        let p = Pattern::parse(&code).unwrap();
        assert_eq!(p.activities(ActivityPurpose::Work), 70_000);
        assert_eq!(p.tours_for(ActivityPurpose::Work), 70_000);
        assert_eq!(p.home_activities(), 70_001);
        assert_eq!(p.tour_count(), p.home_activities() - 1);
    }

    #[test]
    fn clone_is_independent_equal_copy() {
        let p = Pattern::parse("hwhsh").unwrap();
        let q = p.clone();
        assert_eq!(p, q);
        assert_eq!(q.to_string(), "hwhsh");
    }
}

// ── Tour builder ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use ActivityPurpose::*;

    #[test]
    fn three_characters_single_primary() {
        let tour = build_tour("hwh", 0).unwrap();
        assert_eq!(tour.primary_purpose(), Work);
        assert_eq!(tour.stop_count(), 0);
        assert_eq!(tour.begin.purpose, Home);
        assert_eq!(tour.begin.activity_type, ActivityType::Begin);
        assert_eq!(tour.end.activity_type, ActivityType::End);
        assert_eq!(tour.primary_destination.activity_type, ActivityType::PrimaryDestination);
        assert_eq!(tour.kind, TourKind::HomeBased);
    }

    #[test]
    fn four_characters_lower_priority_first_is_outbound_stop() {
        assert_eq!(roles("hswh"), (Some(Shop), Work, None));
        assert_eq!(roles("hosh"), (Some(Other), Shop, None));
    }

    #[test]
    fn four_characters_higher_priority_first_keeps_primary() {
        assert_eq!(roles("hwsh"), (None, Work, Some(Shop)));
        assert_eq!(roles("hroh"), (None, Recreate, Some(Other)));
    }

    #[test]
    fn four_characters_equal_rank_first_is_primary() {
        assert_eq!(roles("hssh"), (None, Shop, Some(Shop)));
    }

    #[test]
    fn school_then_work_keeps_school_primary() {
        assert_eq!(roles("hcwh"), (None, School, Some(Work)));
        let p = Pattern::parse("hcwh").unwrap();
        assert_eq!(p.tours_for(School), 1);
        assert_eq!(p.tours_for(Work), 0);
    }

    #[test]
    fn work_then_school_makes_school_inbound_stop() {
        assert_eq!(roles("hwch"), (None, Work, Some(School)));
    }

    #[test]
    fn four_character_rule_is_deterministic() {
        for s in ["hswh", "hwsh", "hcwh", "hwch", "hroh"] {
            assert_eq!(roles(s), roles(s));
        }
    }

    #[test]
    fn five_characters_middle_is_primary() {
        assert_eq!(roles("hswoh"), (Some(Shop), Work, Some(Other)));
        // Middle wins even when an end activity has higher priority.
        assert_eq!(roles("hwsoh"), (Some(Work), Shop, Some(Other)));
    }

    #[test]
    fn structural_errors() {
        assert_eq!(build_tour("hh", 0), Err(PatternError::TourTooShort("hh".into())));
        assert_eq!(build_tour("h", 0), Err(PatternError::TourTooShort("h".into())));
        assert_eq!(build_tour("hswosh", 0), Err(PatternError::TourTooLong("hswosh".into())));
        assert_eq!(build_tour("wsh", 0), Err(PatternError::MissingHomeAnchor("wsh".into())));
        assert_eq!(build_tour("hwhsh", 0), Err(PatternError::UnexpectedHome("hwhsh".into())));
        assert_eq!(build_tour("hsbh", 0), Err(PatternError::WorkBasedWithoutWork("hsbh".into())));
    }

    #[test]
    fn build_tours_appends_work_based_sub_tours() {
        let p = Pattern::parse("hwbhsh").unwrap();
        let tours = build_tours(&p).unwrap();
        assert_eq!(tours.len(), 3);

        assert_eq!(tours[0].tour_string, "hwbh");
        assert_eq!(tours[0].primary_purpose(), Work);
        assert_eq!(tours[0].stop_count(), 0);
        assert_eq!(tours[1].order, 1);

        let sub = &tours[2];
        assert!(sub.is_work_based());
        assert_eq!(sub.parent, Some(0));
        assert_eq!(sub.order, 0);
        assert_eq!(sub.begin.purpose, Work);
        assert_eq!(sub.primary_purpose(), Other);
        assert_eq!(sub.end.purpose, Work);
        assert_eq!(sub.scheduling_purpose(), WorkBased);
    }

    #[test]
    fn work_based_anchors_copy_parent_work_location() {
        let mut parent = build_tour("hswbh", 0).unwrap();
        parent.primary_destination.location = ZoneId(42);
        let sub = crate::build_work_based_tour(&parent, 0, 0).unwrap();
        assert_eq!(sub.begin.location, ZoneId(42));
        assert_eq!(sub.end.location, ZoneId(42));
    }

    #[test]
    fn malformed_tour_aborts_whole_pattern() {
        let p = Pattern::parse("hwhhsh").unwrap();
        assert_eq!(build_tours(&p), Err(PatternError::TourTooShort("hh".into())));
    }

    #[test]
    fn activities_in_travel_order() {
        let tour = build_tour("hswoh", 0).unwrap();
        let kinds: Vec<ActivityType> = tour.activities().map(|a| a.activity_type).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityType::Begin,
                ActivityType::IntermediateStop1,
                ActivityType::PrimaryDestination,
                ActivityType::IntermediateStop2,
                ActivityType::End,
            ]
        );
        assert!(tour.contains_purpose(Other));
        assert!(!tour.contains_purpose(School));
    }
}

// ── Activity and tour times ───────────────────────────────────────────────────

#[cfg(test)]
mod times {
    use super::*;

    #[test]
    fn stamp_window_sets_anchor_and_primary_times() {
        let mut tour = build_tour("hwh", 0).unwrap();
        tour.stamp_window(t(8), t(17)).unwrap();
        assert_eq!(tour.begin.end_time, Some(t(8)));
        assert_eq!(tour.begin.start_time, None);
        assert_eq!(tour.begin.duration_minutes, 0);
        assert_eq!(tour.primary_destination.start_time, Some(t(8)));
        assert_eq!(tour.primary_destination.end_time, Some(t(17)));
        assert_eq!(tour.primary_destination.duration_minutes, 540);
        assert_eq!(tour.end.start_time, Some(t(17)));
        assert_eq!(tour.duration_minutes, 540);
        assert_eq!(tour.window(), Some((t(8), t(17))));
    }

    #[test]
    fn reversed_window_rejected() {
        let mut tour = build_tour("hwh", 0).unwrap();
        assert_eq!(
            tour.stamp_window(t(17), t(8)),
            Err(PatternError::TimeOrder { start: t(17), end: t(8) })
        );
        assert_eq!(tour.window(), None);
    }

    #[test]
    fn set_end_time_keeps_order_invariant() {
        let mut tour = build_tour("hwh", 0).unwrap();
        tour.stamp_window(t(8), t(17)).unwrap();
        tour.end.set_end_time(t(23)).unwrap();
        assert_eq!(tour.end.end_time, Some(t(23)));
        assert_eq!(tour.end.duration_minutes, 360);
        assert!(tour.end.set_end_time(t(9)).is_err());
    }
}
