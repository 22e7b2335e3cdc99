//! MapBuilder Headless Wizard Harness
//!
//! Drives the pure wizard logic the way a front-end would, without one.
//! Runs entirely in-process: no renderer, no backend, no network.
//!
//! Usage:
//!   cargo run -p mapbuilder-simtest
//!   cargo run -p mapbuilder-simtest -- --verbose --seed 7 --rounds 500
//!   cargo run -p mapbuilder-simtest -- --config wizard.json

use std::collections::HashSet;
use std::path::PathBuf;

use mapbuilder_logic::config::{validate_config, WizardConfig};
use mapbuilder_logic::error::{GenerationFailure, WizardError};
use mapbuilder_logic::generation::{GenerationRequest, ImageRef};
use mapbuilder_logic::grid::{build_grid, render_ascii};
use mapbuilder_logic::placement::PlacementOutcome;
use mapbuilder_logic::plot::{Dimension, MAX_ROOM_COUNT, ROOM_SLIDER_MIN};
use mapbuilder_logic::presentation::{design_summary, footer_controls};
use mapbuilder_logic::session::{Delayed, MapBuilderSession};
use mapbuilder_logic::wizard::{ActionOutcome, Completion, Step, Wizard, WizardAction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// ── Scripted scenarios ──────────────────────────────────────────────────
const SCENARIOS_JSON: &str = include_str!("../data/scenarios.json");

/// Simulated seconds per tick while waiting on the backend.
const TICK_SECS: f32 = 0.25;

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    actions: Vec<WizardAction>,
    expect: Expectation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Expectation {
    step: Option<Step>,
    placed: Option<usize>,
    rooms: Option<usize>,
    width: Option<u32>,
    height: Option<u32>,
    room_count: Option<usize>,
    image: Option<String>,
    error_contains: Option<String>,
}

// ── Command line ────────────────────────────────────────────────────────

struct HarnessArgs {
    verbose: bool,
    config_path: Option<PathBuf>,
    seed: u64,
    rounds: u32,
}

impl HarnessArgs {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut parsed = Self {
            verbose: false,
            config_path: None,
            seed: 42,
            rounds: 200,
        };
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--verbose" | "-v" => {
                    parsed.verbose = true;
                    i += 1;
                }
                "--config" | "-c" if i + 1 < args.len() => {
                    parsed.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                }
                "--seed" if i + 1 < args.len() => {
                    parsed.seed = args[i + 1].parse().unwrap_or(parsed.seed);
                    i += 2;
                }
                "--rounds" if i + 1 < args.len() => {
                    parsed.rounds = args[i + 1].parse().unwrap_or(parsed.rounds);
                    i += 2;
                }
                _ => i += 1,
            }
        }
        parsed
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args = HarnessArgs::from_args();
    println!("=== MapBuilder Wizard Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_config(&args, &mut results) {
        Some(c) => c,
        None => {
            report(&results, args.verbose);
            std::process::exit(1);
        }
    };

    // 2. Scripted scenarios
    results.extend(validate_scenarios(&config, args.verbose));

    // 3. Room seeding sweep
    results.extend(validate_room_seeding(&config));

    // 4. Slider clamping
    results.extend(validate_slider_clamping(&config));

    // 5. Randomized placement sweep
    results.extend(validate_random_placement(
        &config,
        args.seed,
        args.rounds,
        args.verbose,
    ));

    // 6. Generation lifecycle (failure, timeout, stale)
    results.extend(validate_generation_lifecycle(&config));

    if report(&results, args.verbose) > 0 {
        std::process::exit(1);
    }
}

/// Print the summary; returns the number of failures.
fn report(results: &[TestResult], verbose: bool) -> usize {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );
    failed
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn load_config(args: &HarnessArgs, results: &mut Vec<TestResult>) -> Option<WizardConfig> {
    println!("--- Configuration ---");
    let config = match &args.config_path {
        Some(path) => match WizardConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                results.push(TestResult {
                    name: "config_load".into(),
                    passed: false,
                    detail: format!("{}: {}", path.display(), e),
                });
                return None;
            }
        },
        None => WizardConfig::default(),
    };

    let issues = validate_config(&config);
    results.push(TestResult {
        name: "config_valid".into(),
        passed: issues.is_empty(),
        detail: if issues.is_empty() {
            format!(
                "{} room names, delay {}s, timeout {}s",
                config.room_names.len(),
                config.generation_delay_secs,
                config.generation_timeout_secs
            )
        } else {
            issues
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    if issues.is_empty() {
        Some(config)
    } else {
        None
    }
}

// ── 2. Scripted scenarios ───────────────────────────────────────────────

fn validate_scenarios(config: &WizardConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Scenarios ---");
    let mut results = Vec::new();

    let scenarios: Vec<Scenario> = match serde_json::from_str(SCENARIOS_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "scenarios_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    for scenario in scenarios {
        let mut session = MapBuilderSession::new(config.clone());
        let mut rejected = Vec::new();
        for action in scenario.actions {
            match session.apply(action) {
                Ok(ActionOutcome::Requested(_)) => {
                    session.run_until_settled(TICK_SECS);
                }
                Ok(_) => {}
                Err(e) => rejected.push(e.to_string()),
            }
        }

        let mismatches = check_expectation(session.wizard(), &scenario.expect);
        if verbose {
            println!(
                "  {} ({} rejected actions)",
                scenario.name,
                rejected.len()
            );
            if session.wizard().step() == Step::Design {
                print!("{}", grid_dump(session.wizard()));
            }
            if let Some(summary) = design_summary(session.wizard()) {
                for line in summary.lines() {
                    println!("    {}", line);
                }
            }
        }
        results.push(TestResult {
            name: format!("scenario_{}", scenario.name),
            passed: mismatches.is_empty(),
            detail: if mismatches.is_empty() {
                format!("ended in {} step", session.wizard().step())
            } else {
                mismatches.join("; ")
            },
        });
    }

    results
}

fn check_expectation(wizard: &Wizard, expect: &Expectation) -> Vec<String> {
    let state = wizard.state();
    let mut mismatches = Vec::new();

    if let Some(step) = expect.step {
        if state.step != step {
            mismatches.push(format!("step {} != {}", state.step, step));
        }
    }
    if let Some(placed) = expect.placed {
        if state.rooms.placed_count() != placed {
            mismatches.push(format!(
                "placed {} != {}",
                state.rooms.placed_count(),
                placed
            ));
        }
    }
    if let Some(rooms) = expect.rooms {
        if state.rooms.len() != rooms {
            mismatches.push(format!("rooms {} != {}", state.rooms.len(), rooms));
        }
    }
    if let Some(width) = expect.width {
        if state.plot.width != width {
            mismatches.push(format!("width {} != {}", state.plot.width, width));
        }
    }
    if let Some(height) = expect.height {
        if state.plot.height != height {
            mismatches.push(format!("height {} != {}", state.plot.height, height));
        }
    }
    if let Some(count) = expect.room_count {
        if state.room_count.get() != count {
            mismatches.push(format!(
                "room count {} != {}",
                state.room_count.get(),
                count
            ));
        }
    }
    if let Some(image) = &expect.image {
        let actual = state.generated_image.as_ref().map(ImageRef::as_str);
        if actual != Some(image.as_str()) {
            mismatches.push(format!("image {:?} != {:?}", actual, image));
        }
    }
    if let Some(fragment) = &expect.error_contains {
        let error = state.error.as_deref().unwrap_or("");
        if !error.contains(fragment.as_str()) {
            mismatches.push(format!("error {:?} lacks {:?}", error, fragment));
        }
    }

    mismatches
}

fn grid_dump(wizard: &Wizard) -> String {
    let plot = wizard.plot();
    let current = wizard.state().current_room.as_ref();
    let mut dump = format!(
        "    grid {}x{} ({} of {} rooms placed):\n",
        plot.width,
        plot.height,
        wizard.rooms().placed_count(),
        wizard.rooms().len()
    );
    for line in render_ascii(plot, wizard.rooms().as_slice(), current).lines() {
        dump.push_str("    ");
        dump.push_str(line);
        dump.push('\n');
    }
    dump
}

// ── 3. Room Seeding ─────────────────────────────────────────────────────

fn validate_room_seeding(config: &WizardConfig) -> Vec<TestResult> {
    println!("--- Room Seeding ---");
    let mut results = Vec::new();

    for n in ROOM_SLIDER_MIN..=MAX_ROOM_COUNT {
        let mut wizard = Wizard::new(config.clone());
        let entered = wizard
            .start_setup()
            .and_then(|_| wizard.set_room_count(n))
            .and_then(|_| wizard.start_design());
        let ids: HashSet<_> = wizard.rooms().iter().map(|r| r.id.clone()).collect();
        let all_unplaced = wizard.rooms().iter().all(|r| r.position.is_none());
        let cursor_first = wizard.current_room().map(|r| r.id.clone())
            == wizard.rooms().first().map(|r| r.id.clone());

        results.push(TestResult {
            name: format!("seed_{}_rooms", n),
            passed: entered.is_ok()
                && wizard.rooms().len() == n as usize
                && ids.len() == n as usize
                && all_unplaced
                && cursor_first,
            detail: format!(
                "{} rooms, {} unique ids, unplaced={}, cursor_first={}",
                wizard.rooms().len(),
                ids.len(),
                all_unplaced,
                cursor_first
            ),
        });
    }

    results
}

// ── 4. Slider Clamping ──────────────────────────────────────────────────

fn validate_slider_clamping(config: &WizardConfig) -> Vec<TestResult> {
    println!("--- Slider Clamping ---");
    let mut results = Vec::new();

    let mut wizard = Wizard::new(config.clone());
    if let Err(e) = wizard.start_setup() {
        results.push(TestResult {
            name: "clamp_setup".into(),
            passed: false,
            detail: e.to_string(),
        });
        return results;
    }
    let before = wizard.plot();
    for dimension in [Dimension::Width, Dimension::Height] {
        for bad in [0, -5, 150] {
            let accepted = wizard.set_plot_dimension(dimension, bad);
            results.push(TestResult {
                name: format!("clamp_{:?}_{}", dimension, bad).to_lowercase(),
                passed: accepted == Ok(false) && wizard.plot() == before,
                detail: format!("plot stays {}x{}", before.width, before.height),
            });
        }
    }

    let count_before = wizard.state().room_count;
    let ignored = [0, -1, 11]
        .iter()
        .all(|&v| wizard.set_room_count(v) == Ok(false));
    results.push(TestResult {
        name: "clamp_room_count".into(),
        passed: ignored && wizard.state().room_count == count_before,
        detail: format!("room count stays {}", count_before.get()),
    });

    results
}

// ── 5. Randomized Placement ─────────────────────────────────────────────

fn validate_random_placement(
    config: &WizardConfig,
    seed: u64,
    rounds: u32,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Randomized Placement ---");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut violations: Vec<String> = Vec::new();
    let mut generated = 0u32;
    let mut refused = 0u32;
    let mut undersized = 0u32;

    for round in 0..rounds {
        let width = rng.gen_range(1..=20);
        let height = rng.gen_range(1..=20);
        let rooms = rng.gen_range(1..=MAX_ROOM_COUNT);

        let mut wizard = Wizard::new(config.clone());
        let entered = wizard
            .start_setup()
            .and_then(|_| wizard.set_plot_dimension(Dimension::Width, width))
            .and_then(|_| wizard.set_plot_dimension(Dimension::Height, height))
            .and_then(|_| wizard.set_room_count(rooms))
            .and_then(|_| wizard.start_design());
        let fits = (width * height) >= rooms;
        match entered {
            Ok(()) if fits => {}
            Err(WizardError::PlotTooSmall { .. }) if !fits => {
                undersized += 1;
                if wizard.step() != Step::Setup {
                    violations.push(format!("round {}: left setup on a small plot", round));
                }
                continue;
            }
            other => {
                violations.push(format!(
                    "round {}: {}x{} plot, {} rooms: start_design gave {:?}",
                    round, width, height, rooms, other
                ));
                continue;
            }
        }

        let clicks = rng.gen_range(0..(rooms as usize * 3));
        for _ in 0..clicks {
            if rng.gen_bool(0.2) {
                let pick = rng.gen_range(0..wizard.rooms().len());
                let id = wizard.rooms().as_slice()[pick].id.clone();
                wizard.select_room(&id);
            }
            // Occasionally click just outside the plot.
            let x = rng.gen_range(0..=width as u32);
            let y = rng.gen_range(0..=height as u32);
            match wizard.place_room(x, y) {
                PlacementOutcome::Placed { .. } => {}
                PlacementOutcome::OutOfBounds { .. } | PlacementOutcome::Occupied { .. } => {
                    refused += 1
                }
                other => violations.push(format!("round {}: unexpected {:?}", round, other)),
            }
        }

        let plot = wizard.plot();
        let mut cells = HashSet::new();
        for room in wizard.rooms().iter() {
            if let Some(pos) = room.position {
                if !plot.contains(pos.x, pos.y) {
                    violations.push(format!("round {}: {} out of bounds", round, room.id));
                }
                if !cells.insert(pos) {
                    violations.push(format!("round {}: shared cell {}", round, pos));
                }
            }
        }
        let occupied = build_grid(plot, wizard.rooms().as_slice(), None)
            .iter()
            .filter(|c| c.room.is_some())
            .count();
        if occupied != wizard.rooms().placed_count() {
            violations.push(format!(
                "round {}: grid shows {} rooms, registry {}",
                round,
                occupied,
                wizard.rooms().placed_count()
            ));
        }
        if wizard.current_room().is_none() {
            violations.push(format!("round {}: cursor lost", round));
        }

        let all_placed = wizard.rooms().all_placed();
        if footer_controls(&wizard).primary_enabled != all_placed {
            violations.push(format!("round {}: generate button state wrong", round));
        }
        match wizard.generate_map() {
            Ok(_) if all_placed => generated += 1,
            Err(WizardError::Validation(v)) if !all_placed => {
                let expected: Vec<String> = wizard
                    .rooms()
                    .unplaced()
                    .map(|r| r.name.clone())
                    .collect();
                if v.missing != expected {
                    violations.push(format!("round {}: wrong missing list", round));
                }
                // Every design that was entered must be completable.
                fill_free_cells(&mut wizard);
                match wizard.generate_map() {
                    Ok(_) => generated += 1,
                    Err(e) => violations.push(format!(
                        "round {}: could not complete design: {}",
                        round, e
                    )),
                }
            }
            other => violations.push(format!("round {}: generate gave {:?}", round, other)),
        }
    }

    if verbose {
        println!(
            "  {} rounds, {} generated, {} clicks refused, {} plots too small",
            rounds, generated, refused, undersized
        );
    }

    vec![TestResult {
        name: "random_placement_invariants".into(),
        passed: violations.is_empty(),
        detail: if violations.is_empty() {
            format!(
                "seed {}: {} rounds, {} reached generation, {} refused at setup",
                seed, rounds, generated, undersized
            )
        } else {
            format!("{} violations, first: {}", violations.len(), violations[0])
        },
    }]
}

/// Place each unplaced room on the first free cell in row-major order.
fn fill_free_cells(wizard: &mut Wizard) {
    let unplaced: Vec<_> = wizard.rooms().unplaced().map(|r| r.id.clone()).collect();
    for id in unplaced {
        let free = wizard
            .grid()
            .iter()
            .find(|c| c.room.is_none())
            .map(|c| (c.x, c.y));
        let Some((x, y)) = free else {
            return;
        };
        wizard.select_room(&id);
        wizard.place_room(x, y);
    }
}

// ── 6. Generation Lifecycle ─────────────────────────────────────────────

fn ready_session(session: &mut MapBuilderSession) -> Result<(), WizardError> {
    session.apply(WizardAction::StartSetup)?;
    session.apply(WizardAction::SetRoomCount { value: 3 })?;
    session.apply(WizardAction::StartDesign)?;
    for x in 0..3 {
        session.apply(WizardAction::PlaceRoom { x, y: 0 })?;
    }
    Ok(())
}

fn validate_generation_lifecycle(config: &WizardConfig) -> Vec<TestResult> {
    println!("--- Generation Lifecycle ---");
    let mut results = Vec::new();

    // Backend failure keeps the wizard in design with a message.
    let failing = |_: &GenerationRequest| -> Result<ImageRef, GenerationFailure> {
        Err(GenerationFailure::Backend("backend unavailable".into()))
    };
    let mut session = MapBuilderSession::with_backend(config.clone(), Box::new(failing));
    let outcome = ready_session(&mut session)
        .and_then(|_| session.generate_map())
        .map(|_| session.run_until_settled(TICK_SECS));
    let w = session.wizard();
    results.push(TestResult {
        name: "generation_failure_stays_in_design".into(),
        passed: matches!(outcome, Ok(Some(Completion::Failed(_))))
            && w.step() == Step::Design
            && !w.is_loading()
            && w.error() == Some("backend unavailable"),
        detail: format!("step={} error={:?}", w.step(), w.error()),
    });

    // Duplicate generate while loading is refused.
    let mut session = MapBuilderSession::new(config.clone());
    let first = ready_session(&mut session).and_then(|_| session.generate_map());
    let second = session.generate_map();
    results.push(TestResult {
        name: "generation_single_flight".into(),
        passed: first.is_ok() && second == Err(WizardError::Busy),
        detail: format!("second call: {:?}", second),
    });

    // A backend slower than the timeout fails with a timeout.
    let slow = Delayed {
        inner: move |_: &GenerationRequest| -> Result<ImageRef, GenerationFailure> {
            Ok(ImageRef::new("/late.png"))
        },
        latency_secs: config.generation_timeout_secs * 2.0,
    };
    let mut session = MapBuilderSession::with_backend(config.clone(), Box::new(slow));
    let outcome = ready_session(&mut session)
        .and_then(|_| session.generate_map())
        .map(|_| session.run_until_settled(TICK_SECS));
    results.push(TestResult {
        name: "generation_timeout".into(),
        passed: matches!(
            outcome,
            Ok(Some(Completion::Failed(GenerationFailure::TimedOut { .. })))
        ) && session.wizard().step() == Step::Design,
        detail: format!("error={:?}", session.wizard().error()),
    });

    // Navigating back abandons the request; its late answer is dropped.
    let mut session = MapBuilderSession::new(config.clone());
    let outcome = ready_session(&mut session)
        .and_then(|_| session.generate_map())
        .and_then(|_| session.apply(WizardAction::GoBack))
        .map(|_| session.run_until_settled(TICK_SECS));
    results.push(TestResult {
        name: "generation_stale_after_back".into(),
        passed: matches!(outcome, Ok(Some(Completion::Stale)))
            && session.wizard().step() == Step::Setup
            && session.wizard().generated_image().is_none(),
        detail: format!("step={}", session.wizard().step()),
    });

    results
}
