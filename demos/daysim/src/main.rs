//! daysim: schedule one synthetic day for a handful of households.
//!
//! Usage:
//!
//! ```text
//! daysim [config.json] [coefficients.csv]
//! ```
//!
//! Without arguments the default `ModelConfig` is used and a small
//! illustrative coefficient table is generated in memory (morning departures
//! for mandatory tours, shorter midday discretionary tours).  Set `RUST_LOG`
//! to `tdm_schedule=debug` to see every chosen window.

use std::fmt::Write as _;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use tdm_core::{
    ActivityPurpose, Employment, HouseholdAttributes, HouseholdId, ModelConfig, PersonAttributes,
    PersonId, StudentStatus, ZoneId,
};
use tdm_pattern::Tour;
use tdm_schedule::{load_coefficients_csv, load_coefficients_reader, CoefficientTable, TermLayout};
use tdm_sim::{
    DaySimulatorBuilder, LoggingConfig, PersonDay, PersonDayInput, RunSummary, SimError, SimObserver,
};

// ── Synthetic population ──────────────────────────────────────────────────────

fn households() -> Vec<HouseholdAttributes> {
    vec![
        HouseholdAttributes {
            id: HouseholdId(1), income: 85_000, autos: 2, size: 4, workers: 2, children: 2,
            home_zone: ZoneId(12),
        },
        HouseholdAttributes {
            id: HouseholdId(2), income: 22_000, autos: 0, size: 1, workers: 1, children: 0,
            home_zone: ZoneId(40),
        },
        HouseholdAttributes {
            id: HouseholdId(3), income: 41_000, autos: 1, size: 2, workers: 0, children: 0,
            home_zone: ZoneId(7),
        },
    ]
}

fn person(
    id: u32,
    household: u32,
    member: u8,
    age: u8,
    female: bool,
    employment: Employment,
    student: StudentStatus,
) -> PersonAttributes {
    PersonAttributes {
        id: PersonId(id),
        household: HouseholdId(household),
        member,
        age,
        female,
        employment,
        student,
    }
}

fn inputs() -> Vec<PersonDayInput> {
    use Employment::*;
    use StudentStatus::*;
    vec![
        PersonDayInput::new(person(1, 1, 1, 42, false, FullTime, NotStudent), "hwbhsh"),
        PersonDayInput::new(person(2, 1, 2, 39, true, PartTime, NotStudent), "hswhoh"),
        PersonDayInput::new(person(3, 1, 3, 10, true, NotEmployed, GradeSchool), "hcorh"),
        PersonDayInput::new(person(4, 1, 4, 4, false, NotEmployed, NotStudent), "h"),
        PersonDayInput::new(person(5, 2, 1, 23, true, FullTime, College), "hcwh"),
        PersonDayInput::new(person(6, 3, 1, 71, false, NotEmployed, NotStudent), "hshrhoh"),
        PersonDayInput::new(person(7, 3, 2, 68, true, NotEmployed, NotStudent), "hshch"),
        // Malformed: reported and skipped.
        PersonDayInput::new(person(8, 3, 3, 30, true, FullTime, NotStudent), "hwhbh"),
    ]
}

// ── Coefficients ──────────────────────────────────────────────────────────────

/// Departure and duration constants favouring `(departure, hours)` per purpose.
const PREFERENCES: [(ActivityPurpose, usize, usize); 6] = [
    (ActivityPurpose::Work, 3, 9),
    (ActivityPurpose::School, 3, 7),
    (ActivityPurpose::Shop, 6, 1),
    (ActivityPurpose::Recreate, 12, 2),
    (ActivityPurpose::Other, 8, 1),
    (ActivityPurpose::WorkBased, 7, 1),
];

/// Render an illustrative coefficient table as CSV, in the same layout a
/// calibrated file would use.
fn sample_coefficients_csv(config: &ModelConfig) -> String {
    let layout = TermLayout::new(config.periods());
    let mut csv = String::from("purpose");
    for name in layout.column_names() {
        let _ = write!(csv, ",{name}");
    }
    csv.push('\n');

    for (purpose, departure, hours) in PREFERENCES {
        let mut row = vec![0.0_f64; layout.term_count()];
        for p in 0..layout.periods() {
            row[layout.departure_column(p)] = -0.15 * (p as f64 - departure as f64).powi(2);
            row[layout.duration_column(p)] = -0.1 * (p as f64 - hours as f64).powi(2);
        }
        let _ = write!(csv, "{purpose}");
        for value in row {
            let _ = write!(csv, ",{value}");
        }
        csv.push('\n');
    }
    csv
}

// ── Observer ──────────────────────────────────────────────────────────────────

struct PrintObserver;

fn describe(tour: &Tour) -> String {
    let window = match tour.window() {
        Some((leave, back)) => format!("{leave}-{back}"),
        None => "unscheduled".to_string(),
    };
    let flag = if tour.degraded { " (fallback)" } else { "" };
    format!("{:<6} {:<10} {window}{flag}", tour.tour_string, tour.scheduling_purpose().as_str())
}

impl SimObserver for PrintObserver {
    fn on_person_scheduled(&mut self, day: &PersonDay) {
        println!("{} [{}]", day.person, day.pattern);
        if day.tours.is_empty() {
            println!("    stays home");
        }
        for tour in &day.tours {
            println!("    {}", describe(tour));
        }
    }

    fn on_person_failed(&mut self, person: &PersonAttributes, error: &SimError) {
        println!("{} FAILED: {error}", person.id);
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        println!();
        println!(
            "Scheduled {}/{} persons, {} tours ({} degraded), {} failed",
            summary.scheduled, summary.persons, summary.tours, summary.degraded_tours, summary.failed,
        );
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    LoggingConfig::new().with_level(tracing::Level::WARN).init()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config: ModelConfig = match args.first() {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => ModelConfig { seed: 42, ..ModelConfig::default() },
    };
    config.validate()?;

    let table: CoefficientTable = match args.get(1) {
        Some(path) => load_coefficients_csv(Path::new(path))
            .with_context(|| format!("loading coefficients from {path}"))?,
        None => load_coefficients_reader(Cursor::new(sample_coefficients_csv(&config)))?,
    };

    println!("=== daysim ===");
    println!(
        "Day {:02}:00-{:02}:00  |  {} periods  |  Seed: {}  |  Fallback: {:?}",
        config.first_hour,
        config.last_hour,
        config.periods(),
        config.seed,
        config.fallback,
    );
    println!();

    let sim = DaySimulatorBuilder::new(config, Arc::new(table))
        .households(households())
        .build()?;

    let inputs = inputs();
    let t0 = Instant::now();
    let results = sim.run(&inputs, &mut PrintObserver);
    println!("Completed in {:.3} ms", t0.elapsed().as_secs_f64() * 1e3);

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed == inputs.len() {
        anyhow::bail!("every person failed");
    }
    Ok(())
}
