//! Seeded chaos runs: jittery swipes and taps through the real runtime.
//!
//! Every run is reproducible from its seed. On failure the seed is part of
//! the assertion message.

use std::{collections::BTreeSet, sync::Arc, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use storyline_core::{StoryCatalog, StoryItem, UserStories};
use storyline_harness::{ChaosPager, Scenario, ScenarioOutcome, TraceAction, TraceExt};

const PAGES: usize = 6;

fn catalog() -> Arc<StoryCatalog> {
    let users = (0..PAGES)
        .map(|u| {
            let items = (0..=u % 3)
                .map(|i| StoryItem::image(format!("{u}-{i}"), "img://x", 700 + 300 * i as u64))
                .collect();
            UserStories::new(format!("user-{u}"), format!("User {u}"), "", items)
        })
        .collect();
    Arc::new(StoryCatalog::new(users).expect("valid catalog"))
}

struct ChaosRun {
    outcome: ScenarioOutcome,
    /// Pages a swipe settled on
    settled: BTreeSet<usize>,
    /// Pages only ever seen mid-scroll
    flickered: BTreeSet<usize>,
}

fn run_chaos(seed: u64, out_of_range_rate: f64) -> ChaosRun {
    let scenario = Scenario::new(catalog())
        .expect("scenario")
        .with_max_duration(Duration::from_secs(20));
    let driver = scenario.driver().clone();
    let mut pager = ChaosPager::new(seed, PAGES).with_out_of_range_rate(out_of_range_rate);
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);

    let mut settled = BTreeSet::new();
    let mut seen = BTreeSet::new();
    let mut from = 0;
    // Swipes land on multiples of 50ms, which never coincide with the
    // simulated pager following a request one millisecond after a frame.
    for slot in 1..200u64 {
        let at = Duration::from_millis(slot * 50);
        match rng.gen_range(0..10) {
            0..=1 => {
                let to = if pager.abandons() { from } else { pager.target() };
                let reports = pager.scroll(from, to);
                seen.extend(reports.iter().flatten().copied());
                driver.schedule_swipe(at, &reports);
                settled.insert(to);
                from = to;
            },
            2..=4 => driver.schedule_tap(at, rng.gen_range(0.0..390.0), 300.0),
            _ => {},
        }
    }

    let outcome = block_on(scenario.run());
    let flickered = seen.difference(&settled).copied().collect();
    ChaosRun { outcome, settled, flickered }
}

fn block_on(future: impl std::future::Future<Output = ScenarioOutcome>) -> ScenarioOutcome {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

#[test]
fn chaos_swipes_never_start_flickered_pages() {
    for seed in 0..32 {
        let run = run_chaos(seed, 0.0);
        let outcome = &run.outcome;
        assert!(outcome.violations.is_empty(), "seed {seed}: {:?}", outcome.violations);

        let requested: BTreeSet<usize> = outcome
            .trace
            .iter()
            .filter_map(|entry| match entry.action {
                TraceAction::PageRequested { target } => Some(target),
                _ => None,
            })
            .collect();

        for (page, _) in outcome.trace.items_started() {
            let reachable = page == 0 || run.settled.contains(&page) || requested.contains(&page);
            assert!(reachable, "seed {seed}: page {page} started without settling");
            assert!(
                !run.flickered.contains(&page) || requested.contains(&page),
                "seed {seed}: flickered page {page} started"
            );
        }
        assert!(outcome.trace.count(TraceAction::Close) <= 1, "seed {seed}");
    }
}

#[test]
fn out_of_range_reports_are_harmless() {
    for seed in 0..16 {
        let run = run_chaos(seed, 0.3);
        let outcome = &run.outcome;
        assert!(outcome.violations.is_empty(), "seed {seed}: {:?}", outcome.violations);
        assert!(
            outcome.trace.items_started().iter().all(|&(page, _)| page < PAGES),
            "seed {seed}: started a page past the catalog"
        );
    }
}

#[test]
fn same_seed_same_trace() {
    let first = run_chaos(7, 0.1);
    let second = run_chaos(7, 0.1);
    assert_eq!(first.outcome.trace, second.outcome.trace);
    assert_eq!(first.outcome.elapsed, second.outcome.elapsed);
}
