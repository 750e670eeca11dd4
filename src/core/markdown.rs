// ConsoleLink - core/markdown.rs
//
// Markdown rendering of the console contents.
// Core layer: pure function of (entries, filter). Same inputs always produce
// byte-identical output.
//
// Consecutive entries with the same message and severity collapse into one
// block with a " (Nx)" repeat suffix. Adjacency is judged within the filtered
// view: entries hidden by the filter do not break a run.

use crate::core::filter::FilterState;
use crate::core::model::LogEntry;
use crate::util::constants::{NO_LOGS_MESSAGE, TIMESTAMP_FORMAT};

/// A maximal run of adjacent included entries sharing message and severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    /// First entry of the run; its timestamp and detail are rendered.
    pub entry: &'a LogEntry,
    /// Number of entries in the run (always >= 1).
    pub count: usize,
}

/// Group the entries passing `filter` into runs, preserving order.
pub fn collapse_runs(entries: &[LogEntry], filter: FilterState) -> Vec<Run<'_>> {
    let mut runs: Vec<Run<'_>> = Vec::new();

    for entry in entries.iter().filter(|e| filter.matches(e)) {
        if let Some(run) = runs.last_mut() {
            if entry.continues_run(run.entry) {
                run.count += 1;
                continue;
            }
        }
        runs.push(Run { entry, count: 1 });
    }

    runs
}

/// Render the console contents as Markdown.
///
/// Returns [`NO_LOGS_MESSAGE`] when no entry passes the filter.
pub fn render(entries: &[LogEntry], filter: FilterState) -> String {
    let runs = collapse_runs(entries, filter);
    if runs.is_empty() {
        return NO_LOGS_MESSAGE.to_string();
    }

    let mut out = String::new();
    for run in &runs {
        append_block(&mut out, run);
    }
    out
}

/// Append one run's block: a `###` heading with label, repeat suffix and
/// timestamp, then a fenced body holding the message and (when present) the
/// detail separated by a blank line. Each block ends with a blank line.
fn append_block(out: &mut String, run: &Run<'_>) {
    let entry = run.entry;
    let repeat = if run.count > 1 {
        format!(" ({}x)", run.count)
    } else {
        String::new()
    };

    out.push_str(&format!(
        "### {}{} - {}\n",
        entry.severity.heading_label(),
        repeat,
        entry.timestamp.format(TIMESTAMP_FORMAT)
    ));
    out.push_str("```\n");
    out.push_str(&entry.message);
    out.push('\n');
    if !entry.detail.is_empty() {
        out.push('\n');
        out.push_str(&entry.detail);
        out.push('\n');
    }
    out.push_str("```\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterCategory;
    use crate::core::model::{HostLogType, Severity};
    use chrono::{Local, TimeZone};

    fn ts(millis: u32) -> chrono::DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(millis as i64))
            .unwrap()
    }

    fn make_entry(message: &str, severity: Severity) -> LogEntry {
        LogEntry::new(message, "", severity, ts(42))
    }

    fn block_count(output: &str) -> usize {
        output.matches("### ").count()
    }

    #[test]
    fn test_exact_block_shape_without_detail() {
        let entries = vec![make_entry("Player spawned", Severity::Info)];
        let output = render(&entries, FilterState::default());
        assert_eq!(
            output,
            "### 📋 Log - 2024-03-09 14:05:07.042\n```\nPlayer spawned\n```\n\n"
        );
    }

    #[test]
    fn test_exact_block_shape_with_detail() {
        let entries = vec![LogEntry::new(
            "NullReferenceException",
            "at Foo.Bar()\nat Foo.Baz()",
            Severity::Error,
            ts(7),
        )];
        let output = render(&entries, FilterState::default());
        assert_eq!(
            output,
            "### ❌ Error - 2024-03-09 14:05:07.007\n```\nNullReferenceException\n\nat Foo.Bar()\nat Foo.Baz()\n```\n\n"
        );
    }

    #[test]
    fn test_empty_store_renders_no_logs_message() {
        assert_eq!(render(&[], FilterState::default()), NO_LOGS_MESSAGE);
    }

    #[test]
    fn test_all_filters_off_renders_no_logs_message() {
        let entries = vec![
            make_entry("e", Severity::Error),
            make_entry("w", Severity::Warning),
            make_entry("l", Severity::Info),
        ];
        let mut filter = FilterState::default();
        for category in FilterCategory::all() {
            filter.set(*category, false);
        }
        assert_eq!(render(&entries, filter), NO_LOGS_MESSAGE);
    }

    #[test]
    fn test_consecutive_runs_collapse_but_later_repeat_does_not_merge() {
        let entries = vec![
            make_entry("A", Severity::Error),
            make_entry("A", Severity::Error),
            make_entry("A", Severity::Error),
            make_entry("B", Severity::Error),
            make_entry("A", Severity::Error),
        ];
        let runs = collapse_runs(&entries, FilterState::default());
        let shape: Vec<_> = runs
            .iter()
            .map(|r| (r.entry.message.as_str(), r.count))
            .collect();
        assert_eq!(shape, vec![("A", 3), ("B", 1), ("A", 1)]);

        let output = render(&entries, FilterState::default());
        assert_eq!(block_count(&output), 3);
        assert_eq!(output.matches("(3x)").count(), 1);
        assert!(!output.contains("(1x)"));
    }

    #[test]
    fn test_same_message_different_severity_is_not_a_run() {
        let entries = vec![
            make_entry("disk low", Severity::Warning),
            make_entry("disk low", Severity::Error),
        ];
        assert_eq!(collapse_runs(&entries, FilterState::default()).len(), 2);
    }

    #[test]
    fn test_run_spans_filtered_out_entries() {
        let entries = vec![
            make_entry("A", Severity::Error),
            make_entry("noise", Severity::Warning),
            make_entry("A", Severity::Error),
        ];
        let filter = FilterState {
            include_warnings: false,
            ..FilterState::default()
        };
        let output = render(&entries, filter);
        assert_eq!(block_count(&output), 1);
        assert!(output.contains("### ❌ Error (2x) - "));
        assert!(!output.contains("noise"));
    }

    #[test]
    fn test_run_keeps_first_entry_detail() {
        let entries = vec![
            LogEntry::new("A", "first trace", Severity::Error, ts(1)),
            LogEntry::new("A", "second trace", Severity::Error, ts(2)),
        ];
        let output = render(&entries, FilterState::default());
        assert!(output.contains("first trace"));
        assert!(!output.contains("second trace"));
        assert!(output.contains("2024-03-09 14:05:07.001"));
    }

    #[test]
    fn test_only_warnings_yields_single_block() {
        let entries = vec![
            make_entry("e", Severity::Error),
            make_entry("w", Severity::Warning),
            make_entry("l", Severity::Info),
        ];
        let filter = FilterState {
            include_errors: false,
            include_warnings: true,
            include_logs: false,
        };
        let output = render(&entries, filter);
        assert_eq!(block_count(&output), 1);
        assert!(output.starts_with("### ⚠️ Warning - "));
        assert!(output.contains("\nw\n"));
    }

    #[test]
    fn test_every_filter_combination_renders_exactly_included_runs() {
        let entries = vec![
            make_entry("e1", Severity::Error),
            make_entry("w1", Severity::Warning),
            make_entry("l1", Severity::Info),
            make_entry("e2", Severity::Error),
        ];
        for bits in 0u8..8 {
            let filter = FilterState {
                include_errors: bits & 1 != 0,
                include_warnings: bits & 2 != 0,
                include_logs: bits & 4 != 0,
            };
            let expected = entries.iter().filter(|e| filter.matches(e)).count();
            let output = render(&entries, filter);
            if expected == 0 {
                assert_eq!(output, NO_LOGS_MESSAGE);
            } else {
                assert_eq!(block_count(&output), expected, "filter {filter:?}");
            }
            for entry in &entries {
                let line = format!("\n{}\n", entry.message);
                assert_eq!(output.contains(&line), filter.matches(entry));
            }
        }
    }

    #[test]
    fn test_blocks_follow_insertion_order() {
        let entries = vec![
            make_entry("zeta", Severity::Info),
            make_entry("alpha", Severity::Error),
        ];
        let output = render(&entries, FilterState::default());
        let zeta = output.find("zeta").unwrap();
        let alpha = output.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_render_is_idempotent() {
        let entries = vec![
            make_entry("A", Severity::Error),
            make_entry("A", Severity::Error),
            make_entry("B", Severity::Info),
        ];
        let filter = FilterState::default();
        assert_eq!(render(&entries, filter), render(&entries, filter));
    }

    #[test]
    fn test_exception_renders_like_error() {
        let from_exception = vec![make_entry("x", HostLogType::Exception.into())];
        let from_error = vec![make_entry("x", HostLogType::Error.into())];
        assert_eq!(
            render(&from_exception, FilterState::default()),
            render(&from_error, FilterState::default())
        );
        assert_eq!(
            render(&from_exception, FilterState::errors_only()),
            render(&from_error, FilterState::errors_only())
        );
    }
}
