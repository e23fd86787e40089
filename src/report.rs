//! Human-readable and JSON rendering of a [`Report`].

use std::fmt::Write as _;

use scatter_search::CollectionStatus;

use crate::error::{Result, ScatterError};
use crate::runner::Report;

/// Render `report` as the lines printed by the CLI.
///
/// Per-replica completion notices come first, then the winner (for a
/// race), each result, a deadline notice if collection was cut short, and
/// finally the total elapsed time.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {:?}", report.mode, report.query);

    for notice in &report.finished {
        let _ = writeln!(
            out,
            "finished in {} ({} results, {:?})",
            notice.replica, notice.entries, notice.elapsed
        );
    }
    if let Some(winner) = report.winner {
        let _ = writeln!(out, "winner: {winner}");
    }
    for result in &report.results.entries {
        let _ = writeln!(out, "  {result}");
    }
    if let CollectionStatus::DeadlineExceeded { missing } = report.results.status {
        let _ = writeln!(
            out,
            "deadline exceeded: {missing} of {} sources missing",
            report.results.expected
        );
    }
    let _ = writeln!(out, "elapsed: {:?}", report.elapsed);
    out
}

/// Render `report` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ScatterError::Report`] if serialization fails.
pub fn render_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| ScatterError::Report(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Mode;
    use scatter_search::{ReplicaId, ReplicaNotice, ResultSet, SourceResult};
    use std::time::Duration;

    fn result(category: &str) -> SourceResult {
        SourceResult {
            category: category.into(),
            query: "golang".into(),
            payload: "payload".into(),
        }
    }

    fn report(mode: Mode, results: ResultSet) -> Report {
        Report {
            mode,
            query: "golang".into(),
            results,
            winner: None,
            finished: vec![],
            elapsed: Duration::from_millis(42),
        }
    }

    #[test]
    fn text_lists_results_and_elapsed() {
        let text = render_text(&report(
            Mode::Parallel,
            ResultSet::complete(vec![result("Web"), result("Image")]),
        ));
        assert!(text.starts_with("[parallel] \"golang\"\n"));
        assert!(text.contains("  Web result for \"golang\"\n"));
        assert!(text.contains("  Image result for \"golang\"\n"));
        assert!(text.ends_with("elapsed: 42ms\n"));
        assert!(!text.contains("deadline exceeded"));
    }

    #[test]
    fn text_flags_deadline_exceeded() {
        let text = render_text(&report(
            Mode::Deadline,
            ResultSet::partial(vec![result("Web")], 3),
        ));
        assert!(text.contains("deadline exceeded: 2 of 3 sources missing"));
    }

    #[test]
    fn text_shows_winner_and_notices() {
        let mut race = report(Mode::Race, ResultSet::complete(vec![result("Web")]));
        race.winner = Some(ReplicaId(2));
        race.finished = vec![ReplicaNotice {
            replica: ReplicaId(2),
            entries: 1,
            elapsed: Duration::from_millis(40),
        }];
        let text = render_text(&race);
        assert!(text.contains("finished in replica-2 (1 results, 40ms)"));
        assert!(text.contains("winner: replica-2"));
    }

    #[test]
    fn json_contains_entries() {
        let json = render_json(&report(
            Mode::Sequential,
            ResultSet::complete(vec![result("Video")]),
        ))
        .expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["results"]["entries"][0]["category"], "Video");
        assert_eq!(value["winner"], serde_json::Value::Null);
    }
}
