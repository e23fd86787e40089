//! End-to-end runs: TOML file → config → run mode → rendered report.

use scatter::report::{render_json, render_text};
use scatter::{run, Mode, ScatterConfig};
use scatter_search::AbandonPolicy;

fn load(toml: &str) -> ScatterConfig {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scatter.toml");
    std::fs::write(&path, toml).expect("write config");
    ScatterConfig::from_file(&path).expect("load config")
}

#[tokio::test(start_paused = true)]
async fn every_mode_runs_from_file_config() {
    let config = load("query = \"golang\"\n[search]\nseed = 11\n");

    for mode in [Mode::Parallel, Mode::Deadline, Mode::Race, Mode::Sequential] {
        let report = run(mode, &config.query, &config.search)
            .await
            .expect("run");
        assert!(report.results.len() <= 3, "{mode}");
        assert_eq!(report.results.deadline_exceeded(), report.results.len() < 3, "{mode}");
        assert!(render_text(&report).contains("elapsed:"), "{mode}");
    }
}

#[tokio::test(start_paused = true)]
async fn race_with_cancel_policy_and_custom_sources() {
    let config = load(
        "[search]\nreplicas = 5\nabandon = \"cancel\"\n\n\
         [[search.sources]]\ncategory = \"News\"\npayload = \"headlines\"\n\n\
         [[search.sources]]\ncategory = \"Maps\"\npayload = \"places\"\n",
    );
    assert_eq!(config.search.abandon, AbandonPolicy::Cancel);

    let report = run(Mode::Race, "rust", &config.search).await.expect("run");

    assert_eq!(report.results.len(), 2);
    let mut categories = report.results.categories();
    categories.sort_unstable();
    assert_eq!(categories, ["Maps", "News"]);
    assert!(report.winner.is_some());
}

#[tokio::test(start_paused = true)]
async fn tiny_deadline_reports_missing_sources() {
    let config = load("[search]\ndeadline_ms = 1\nmax_latency_ms = 100\nseed = 5\n");

    let report = run(Mode::Deadline, "golang", &config.search)
        .await
        .expect("run");

    // Only sources drawing a 0 ms latency can beat a 1 ms deadline.
    if report.results.deadline_exceeded() {
        assert!(render_text(&report).contains("deadline exceeded"));
    }
    let json = render_json(&report).expect("json");
    assert!(json.contains("\"mode\": \"deadline\""));
}
