//! Unit tests for tdm-schedule.

use std::io::Cursor;
use std::sync::Arc;

use tdm_core::{
    ActivityPurpose, ClockTime, Employment, HouseholdAttributes, HouseholdId, ModelConfig,
    PersonAttributes, PersonId, PersonRng, StudentStatus, ZoneId,
};
use tdm_pattern::{build_tours, Pattern, Tour};

use crate::terms::{term_index, TermContext, TermLayout, WeightBasis, INTERACTION_TERMS};
use crate::{
    load_coefficients_csv, load_coefficients_reader, CoefficientTable, PersonContext,
    ScheduleError, Scheduler, TimeWindow, TourSchedulingModel, WindowConstraint,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn w(start: usize, end: usize) -> TimeWindow {
    TimeWindow::new(start, end).unwrap()
}

fn t(hour: u8) -> ClockTime {
    ClockTime::from_hm(hour, 0).unwrap()
}

/// Five hourly periods, 06:00..=10:00.
fn small_config() -> ModelConfig {
    ModelConfig { first_hour: 6, last_hour: 10, school_return_cutoff_hour: 8, ..ModelConfig::default() }
}

fn zero_table(config: &ModelConfig) -> CoefficientTable {
    let width = TermLayout::new(config.periods()).term_count();
    CoefficientTable::uniform(vec![0.0; width])
}

fn model_with(config: &ModelConfig, table: CoefficientTable) -> TourSchedulingModel {
    TourSchedulingModel::new(config, Arc::new(table)).unwrap()
}

fn zero_model() -> TourSchedulingModel {
    let config = small_config();
    model_with(&config, zero_table(&config))
}

fn worker() -> PersonAttributes {
    PersonAttributes {
        id:         PersonId(7),
        household:  HouseholdId(3),
        member:     1,
        age:        40,
        female:     true,
        employment: Employment::FullTime,
        student:    StudentStatus::NotStudent,
    }
}

fn household() -> HouseholdAttributes {
    HouseholdAttributes {
        id:        HouseholdId(3),
        income:    45_000,
        autos:     1,
        size:      2,
        workers:   1,
        children:  0,
        home_zone: ZoneId(11),
    }
}

fn tours_for(code: &str) -> (Pattern, Vec<Tour>) {
    let pattern = Pattern::parse(code).unwrap();
    let tours = build_tours(&pattern).unwrap();
    (pattern, tours)
}

fn available_windows(
    model: &TourSchedulingModel,
    pattern: &Pattern,
    tours: &[Tour],
    index: usize,
    scheduler: &Scheduler,
) -> Vec<TimeWindow> {
    let (person, hh) = (worker(), household());
    let ctx = PersonContext { person: &person, household: &hh, pattern };
    model
        .choice_set(&ctx, tours, index, scheduler)
        .unwrap()
        .alternatives()
        .iter()
        .filter(|a| a.available)
        .map(|a| a.label)
        .collect()
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn touching_windows_do_not_conflict() {
        let mut s = Scheduler::new(8);
        s.commit(0, w(2, 4), None).unwrap();
        s.commit(1, w(4, 6), None).unwrap();
        assert!(matches!(
            s.commit(2, w(3, 5), None),
            Err(ScheduleError::WindowConflict { tour: 2, .. })
        ));
        assert_eq!(s.committed().len(), 2);
        assert_eq!(s.window_of(1), Some(w(4, 6)));
    }

    #[test]
    fn commit_rejects_out_of_day_and_duplicates() {
        let mut s = Scheduler::new(5);
        assert!(matches!(s.commit(0, w(3, 5), None), Err(ScheduleError::OutOfDay { periods: 5, .. })));
        s.commit(0, w(0, 1), None).unwrap();
        assert!(matches!(s.commit(0, w(3, 4), None), Err(ScheduleError::AlreadyCommitted(0))));
    }

    #[test]
    fn nested_windows_stay_inside_parent_and_ignore_home_timeline() {
        let mut s = Scheduler::new(10);
        s.commit(0, w(1, 5), None).unwrap();
        s.commit(1, w(2, 3), Some(0)).unwrap();
        // Outside the parent.
        assert!(matches!(s.commit(2, w(0, 2), Some(0)), Err(ScheduleError::WindowConflict { .. })));
        // Overlaps a sibling.
        assert!(s.commit(2, w(2, 4), Some(0)).is_err());
        // Touches the sibling.
        s.commit(2, w(3, 4), Some(0)).unwrap();
        // Home-based tours are not checked against sub-tours.
        s.commit(3, w(5, 8), None).unwrap();
    }

    #[test]
    fn availability_respects_constraint_bounds() {
        let mut s = Scheduler::new(8);
        s.commit(0, w(2, 5), None).unwrap();
        let c = WindowConstraint { earliest_start: 5, latest_end: 6, nested_in: None };
        assert!(s.is_available(w(5, 6), &c));
        assert!(!s.is_available(w(5, 7), &c));
        assert!(!s.is_available(w(4, 6), &c));
        assert!(!s.is_available(w(6, 8), &WindowConstraint::full_day(8)));
    }

    #[test]
    fn available_range_skips_blocked_periods() {
        let mut s = Scheduler::new(8);
        s.commit(0, w(2, 5), None).unwrap();
        let c = WindowConstraint { earliest_start: 3, latest_end: 7, nested_in: None };
        assert_eq!(s.available_range(&c), Some(w(5, 7)));

        let boxed_in = WindowConstraint { earliest_start: 3, latest_end: 4, nested_in: None };
        assert_eq!(s.available_range(&boxed_in), None);
    }

    #[test]
    fn available_range_for_sub_tour_is_parent_window() {
        let mut s = Scheduler::new(10);
        let c = WindowConstraint { nested_in: Some(0), ..WindowConstraint::full_day(10) };
        assert_eq!(s.available_range(&c), None);
        s.commit(0, w(3, 6), None).unwrap();
        assert_eq!(s.available_range(&c), Some(w(3, 6)));
    }

    #[test]
    fn release_drops_nested_commitments() {
        let mut s = Scheduler::new(10);
        s.commit(0, w(1, 5), None).unwrap();
        s.commit(1, w(2, 3), Some(0)).unwrap();
        s.commit(2, w(6, 7), None).unwrap();
        assert_eq!(s.release(0), Some(w(1, 5)));
        assert!(!s.is_committed(1));
        assert!(s.is_committed(2));
        assert_eq!(s.release(0), None);
    }

    #[test]
    fn window_geometry() {
        assert_eq!(TimeWindow::new(3, 2), None);
        assert_eq!(w(2, 5).duration(), 3);
        assert!(w(1, 5).contains(&w(2, 2)));
        assert!(!w(1, 5).contains(&w(4, 6)));
        assert!(w(2, 4).overlaps(&w(3, 3)));
        assert!(!w(2, 4).overlaps(&w(4, 4)));
    }
}

// ── Coefficients ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod coefficients {
    use super::*;

    const CSV: &str = "\
purpose, a, b, c
work, 1.0, 2.0, 3.0
school, 0.5, 0.0, -1.0
shop, 0, 0, 0
recreate, 0, 0, 0
o, 0, 0, 0.25
workbased, 9, 8, 7
";

    #[test]
    fn reader_loads_every_purpose() {
        let table = load_coefficients_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(table.row(ActivityPurpose::Work), &[1.0, 2.0, 3.0]);
        assert_eq!(table.get(ActivityPurpose::School, 2), -1.0);
        assert_eq!(table.get(ActivityPurpose::Other, 2), 0.25);
        assert_eq!(table.get(ActivityPurpose::WorkBased, 0), 9.0);
        assert_eq!(table.get(ActivityPurpose::Home, 0), 0.0);
        assert_eq!(table.get(ActivityPurpose::Work, 99), 0.0);
    }

    #[test]
    fn missing_purpose_is_rejected() {
        let csv = CSV.lines().filter(|l| !l.starts_with("workbased")).collect::<Vec<_>>().join("\n");
        assert!(matches!(
            load_coefficients_reader(Cursor::new(csv)),
            Err(ScheduleError::MissingPurpose(ActivityPurpose::WorkBased))
        ));
    }

    #[test]
    fn duplicate_purpose_is_rejected() {
        let csv = format!("{CSV}w, 0, 0, 0\n");
        assert!(matches!(
            load_coefficients_reader(Cursor::new(csv)),
            Err(ScheduleError::DuplicatePurpose(ActivityPurpose::Work))
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![
            (ActivityPurpose::Work, vec![0.0; 3]),
            (ActivityPurpose::School, vec![0.0; 2]),
        ];
        assert!(matches!(
            CoefficientTable::from_rows(rows),
            Err(ScheduleError::CoefficientShape { purpose: ActivityPurpose::School, expected: 3, got: 2 })
        ));
    }

    #[test]
    fn bad_values_are_parse_errors() {
        let csv = CSV.replace("0.5", "half");
        assert!(matches!(load_coefficients_reader(Cursor::new(csv)), Err(ScheduleError::Parse(_))));
        let csv = CSV.replace("recreate", "home");
        assert!(matches!(load_coefficients_reader(Cursor::new(csv)), Err(ScheduleError::Parse(_))));
        let csv = CSV.replace("recreate", "sleep");
        assert!(matches!(load_coefficients_reader(Cursor::new(csv)), Err(ScheduleError::Parse(_))));
    }

    #[test]
    fn file_loader_reads_from_disk() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let table = load_coefficients_csv(file.path()).unwrap();
        assert_eq!(table, load_coefficients_reader(Cursor::new(CSV)).unwrap());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_coefficients_csv(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(ScheduleError::Io(_))));
    }

    #[test]
    fn model_rejects_table_of_wrong_width() {
        let table = CoefficientTable::uniform(vec![0.0; 3]);
        let result = TourSchedulingModel::new(&small_config(), Arc::new(table));
        assert!(matches!(result, Err(ScheduleError::CoefficientShape { expected: 90, got: 3, .. })));
    }
}

// ── Terms ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod terms {
    use super::*;

    #[test]
    fn layout_columns() {
        let layout = TermLayout::new(5);
        assert_eq!(layout.departure_column(2), 2);
        assert_eq!(layout.duration_column(0), 5);
        assert_eq!(layout.interaction_column(0, WeightBasis::Departure), 10);
        assert_eq!(layout.interaction_column(0, WeightBasis::Duration), 11);
        assert_eq!(layout.term_count(), 10 + 2 * INTERACTION_TERMS.len());
        let names = layout.column_names();
        assert_eq!(names.len(), layout.term_count());
        assert_eq!(names[0], "departure_0");
        assert_eq!(names[5], "duration_0");
        assert_eq!(names[10], "female_departure");
    }

    #[test]
    fn term_names_are_unique() {
        for (i, term) in INTERACTION_TERMS.iter().enumerate() {
            assert_eq!(term_index(term.name), Some(i), "duplicate term {}", term.name);
        }
    }

    #[test]
    fn position_terms_follow_home_based_order() {
        let (pattern, tours) = tours_for("hwhshoh");
        let (person, hh) = (worker(), household());
        let active = |index: usize| -> Vec<&'static str> {
            let ctx = TermContext { person: &person, household: &hh, pattern: &pattern, tours: &tours, index };
            INTERACTION_TERMS.iter().filter(|t| (t.applies)(&ctx)).map(|t| t.name).collect()
        };
        let second = active(1);
        assert!(second.contains(&"second_of_three"));
        assert!(!second.contains(&"first_of_three"));
        assert!(!second.contains(&"second_of_two"));
        assert!(second.contains(&"day_has_other_work_tour"));
        assert!(second.contains(&"female"));
        assert!(second.contains(&"full_time_worker"));
        assert!(active(2).contains(&"third_of_three"));
    }

    #[test]
    fn sub_tours_have_no_position() {
        let (pattern, tours) = tours_for("hwbhsh");
        let (person, hh) = (worker(), household());
        let ctx = TermContext { person: &person, household: &hh, pattern: &pattern, tours: &tours, index: 2 };
        assert_eq!(ctx.position(), None);
        let parent = TermContext { index: 0, ..ctx };
        assert_eq!(parent.position(), Some(1));
        assert!((INTERACTION_TERMS[term_index("has_work_based_sub_tour").unwrap()].applies)(&parent));
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use super::*;

    #[test]
    fn alternatives_are_triangular() {
        let model = zero_model();
        let alts = model.alternatives();
        assert_eq!(alts.len(), 15);
        assert_eq!(alts[0], w(0, 0));
        assert_eq!(alts[1], w(0, 1));
        assert_eq!(alts[5], w(1, 1));
        assert_eq!(alts[14], w(4, 4));
        assert!(alts.iter().all(|a| a.start <= a.end && a.end < 5));
    }

    #[test]
    fn scheduling_order_uses_priority_then_parents_first() {
        let (_, mut tours) = tours_for("hshwbh");
        tours[0].priority = 1;
        tours[1].priority = 0;
        let order = TourSchedulingModel::scheduling_order(&tours).unwrap();
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn scheduling_order_rejects_orphans() {
        let (_, mut tours) = tours_for("hwbh");
        tours[1].parent = Some(9);
        assert!(matches!(
            TourSchedulingModel::scheduling_order(&tours),
            Err(ScheduleError::InvalidParent { tour: 1, parent: 9 })
        ));
    }

    #[test]
    fn zero_coefficients_schedule_first_window_and_stretch_last_tour() {
        let model = zero_model();
        let (pattern, mut tours) = tours_for("hwh");
        let (person, hh) = (worker(), household());
        let ctx = PersonContext { person: &person, household: &hh, pattern: &pattern };
        let mut scheduler = model.new_scheduler();

        let window = model.schedule_tour(&ctx, &mut tours, 0, &mut scheduler, 0.0).unwrap();
        assert_eq!(window, w(0, 0));
        let tour = &tours[0];
        assert_eq!(tour.begin.end_time, Some(t(6)));
        assert_eq!(tour.end.start_time, Some(t(6)));
        assert_eq!(tour.end.end_time, Some(t(10)));
        assert_eq!(tour.duration_minutes, 0);
        assert_eq!(scheduler.window_of(0), Some(w(0, 0)));
    }

    #[test]
    fn dominant_constants_pick_their_window() {
        let config = small_config();
        let layout = TermLayout::new(config.periods());
        let mut table = zero_table(&config);
        table.set(ActivityPurpose::Work, layout.departure_column(1), 50.0).unwrap();
        table.set(ActivityPurpose::Work, layout.duration_column(2), 50.0).unwrap();
        let model = model_with(&config, table);

        let (pattern, mut tours) = tours_for("hwh");
        let (person, hh) = (worker(), household());
        let ctx = PersonContext { person: &person, household: &hh, pattern: &pattern };
        let mut scheduler = model.new_scheduler();
        let window = model.schedule_tour(&ctx, &mut tours, 0, &mut scheduler, 0.5).unwrap();
        assert_eq!(window, w(1, 3));
        assert_eq!(tours[0].primary_destination.start_time, Some(t(7)));
        assert_eq!(tours[0].primary_destination.end_time, Some(t(9)));
        assert_eq!(tours[0].duration_minutes, 120);
    }

    #[test]
    fn interaction_terms_weight_departure_and_duration() {
        let config = small_config();
        let layout = TermLayout::new(config.periods());
        let female = term_index("female").unwrap();
        let mut table = zero_table(&config);
        table.set(ActivityPurpose::Work, layout.interaction_column(female, WeightBasis::Departure), 0.5).unwrap();
        table.set(ActivityPurpose::Work, layout.interaction_column(female, WeightBasis::Duration), -0.25).unwrap();
        table.set(ActivityPurpose::Work, layout.departure_column(2), 1.0).unwrap();
        let model = model_with(&config, table);

        let (pattern, tours) = tours_for("hwh");
        let hh = household();
        let woman = worker();
        let man = PersonAttributes { female: false, ..worker() };
        let u = |person: &PersonAttributes| {
            let ctx = PersonContext { person, household: &hh, pattern: &pattern };
            model.utility(&ctx, &tours, 0, w(2, 4))
        };
        assert!((u(&woman) - (1.0 + 0.5 * 2.0 - 0.25 * 2.0)).abs() < 1e-12);
        assert!((u(&man) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stops_forbid_zero_duration() {
        let model = zero_model();
        let (pattern, tours) = tours_for("hswh");
        let windows = available_windows(&model, &pattern, &tours, 0, &model.new_scheduler());
        assert_eq!(windows.len(), 10);
        assert!(windows.iter().all(|w| w.duration() > 0));
    }

    #[test]
    fn work_based_sub_tours_forbid_zero_duration_on_parent() {
        let model = zero_model();
        let (pattern, tours) = tours_for("hwbh");
        let windows = available_windows(&model, &pattern, &tours, 0, &model.new_scheduler());
        assert!(windows.iter().all(|w| w.duration() > 0));
    }

    #[test]
    fn tour_before_school_returns_by_cutoff() {
        let model = zero_model();
        let (pattern, tours) = tours_for("hshch");
        let scheduler = model.new_scheduler();
        let before = available_windows(&model, &pattern, &tours, 0, &scheduler);
        assert_eq!(before.len(), 6);
        assert!(before.iter().all(|w| w.end <= 2));
        // The school tour itself is unconstrained.
        assert_eq!(available_windows(&model, &pattern, &tours, 1, &scheduler).len(), 15);
    }

    #[test]
    fn cutoff_at_end_of_day_is_no_constraint() {
        let config = ModelConfig { school_return_cutoff_hour: 10, ..small_config() };
        let model = model_with(&config, zero_table(&config));
        let (pattern, tours) = tours_for("hshch");
        assert_eq!(model.return_cutoff(&tours, 0), None);
        assert_eq!(available_windows(&model, &pattern, &tours, 0, &model.new_scheduler()).len(), 15);
    }

    #[test]
    fn committed_neighbours_bound_the_window() {
        let model = zero_model();
        let (pattern, mut tours) = tours_for("hwhsh");
        let mut scheduler = model.new_scheduler();
        model.commit(&mut tours, 1, w(3, 4), &mut scheduler).unwrap();

        let c = model.window_constraint(&worker(), &tours, 0, &scheduler).unwrap();
        assert_eq!((c.earliest_start, c.latest_end, c.nested_in), (0, 3, None));
        let windows = available_windows(&model, &pattern, &tours, 0, &scheduler);
        assert_eq!(windows.len(), 10);
        assert!(windows.iter().all(|w| w.end <= 3));

        let (_, mut tours) = tours_for("hwhsh");
        let mut scheduler = model.new_scheduler();
        model.commit(&mut tours, 0, w(1, 2), &mut scheduler).unwrap();
        let c = model.window_constraint(&worker(), &tours, 1, &scheduler).unwrap();
        assert_eq!((c.earliest_start, c.latest_end), (2, 4));
    }

    #[test]
    fn sub_tour_lands_inside_parent() {
        let model = zero_model();
        let (pattern, mut tours) = tours_for("hwbh");
        let (person, hh) = (worker(), household());
        let ctx = PersonContext { person: &person, household: &hh, pattern: &pattern };
        let mut scheduler = model.new_scheduler();

        let err = model.schedule_tour(&ctx, &mut tours, 1, &mut scheduler, 0.3).unwrap_err();
        assert!(matches!(err, ScheduleError::ParentNotScheduled(_)));
        assert!(err.is_recoverable());

        model.commit(&mut tours, 0, w(1, 3), &mut scheduler).unwrap();
        for draw in [0.0, 0.4, 0.99] {
            let mut s = scheduler.clone();
            let mut ts = tours.clone();
            let window = model.schedule_tour(&ctx, &mut ts, 1, &mut s, draw).unwrap();
            assert!(w(1, 3).contains(&window));
            // The sub-tour never takes over the end-of-day stamp.
            assert_eq!(ts[1].end.end_time, ts[1].end.start_time);
        }
    }

    #[test]
    fn boxed_in_tour_is_recoverable_failure() {
        let model = zero_model();
        let (pattern, mut tours) = tours_for("hwhsoh");
        let (person, hh) = (worker(), household());
        let ctx = PersonContext { person: &person, household: &hh, pattern: &pattern };
        let mut scheduler = model.new_scheduler();
        model.commit(&mut tours, 0, w(0, 4), &mut scheduler).unwrap();

        let err = model.schedule_tour(&ctx, &mut tours, 1, &mut scheduler, 0.5).unwrap_err();
        assert!(err.is_recoverable());
        let context = err.tour_context().unwrap();
        assert_eq!(context.person, PersonId(7));
        assert_eq!(context.order, 1);
        assert_eq!(context.purpose, ActivityPurpose::Shop);
        assert!(matches!(err, ScheduleError::NoFeasibleWindow(_)));
    }

    #[test]
    fn infinite_utilities_are_degenerate() {
        let config = small_config();
        let mut table = zero_table(&config);
        table.set(ActivityPurpose::Work, 0, f64::INFINITY).unwrap();
        let model = model_with(&config, table);
        let (pattern, mut tours) = tours_for("hwh");
        let (person, hh) = (worker(), household());
        let ctx = PersonContext { person: &person, household: &hh, pattern: &pattern };
        let err = model.schedule_tour(&ctx, &mut tours, 0, &mut model.new_scheduler(), 0.5).unwrap_err();
        assert!(matches!(err, ScheduleError::DegenerateProbabilities { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn full_day_is_deterministic_and_non_overlapping() {
        let model = zero_model();
        let run = || {
            let (pattern, mut tours) = tours_for("hwbhsh");
            let (person, hh) = (worker(), household());
            let ctx = PersonContext { person: &person, household: &hh, pattern: &pattern };
            let mut scheduler = model.new_scheduler();
            let mut rng = PersonRng::for_person(42, &person);
            model.schedule_tours(&ctx, &mut tours, &mut scheduler, &mut rng).unwrap();
            (tours, scheduler)
        };
        let (a, sa) = run();
        let (b, _) = run();
        assert_eq!(a, b);

        let w0 = sa.window_of(0).unwrap();
        let w1 = sa.window_of(1).unwrap();
        let w2 = sa.window_of(2).unwrap();
        assert!(w0.end <= w1.start);
        assert!(w0.contains(&w2));
        assert_eq!(a[1].end.end_time, Some(t(10)));
    }

    #[test]
    fn fallback_stamps_parent_or_full_day() {
        let model = zero_model();
        let (_, mut tours) = tours_for("hwbh");
        let mut scheduler = model.new_scheduler();

        let window = model.stamp_fallback(&mut tours, 1, &scheduler).unwrap();
        assert_eq!(window, w(0, 4));
        assert!(tours[1].degraded);

        model.commit(&mut tours, 0, w(1, 3), &mut scheduler).unwrap();
        assert_eq!(model.stamp_fallback(&mut tours, 1, &scheduler).unwrap(), w(1, 3));
        assert_eq!(tours[1].window(), Some((t(7), t(9))));
        assert!(!scheduler.is_committed(1));
    }
}
