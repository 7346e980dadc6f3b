//! Enriched per-worker context.
//!
//! Each worker's backend receives situational awareness — its place in the
//! chain, what already ran, what runs next — without the executor leaking
//! chain knowledge into the [`ModelAdapter`](crate::adapter::ModelAdapter)
//! contract. The builder is pure: same inputs, same string.

use crate::diagram::render_diagram;
use crate::types::{PreviousOutput, WorkerContext};

const MAX_OUTPUT_PREVIEW_LENGTH: usize = 150;

/// Truncate an output preview to the budget, appending an ellipsis marker.
fn preview(output: &str) -> String {
    if output.chars().count() > MAX_OUTPUT_PREVIEW_LENGTH {
        let cut: String = output.chars().take(MAX_OUTPUT_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        output.to_string()
    }
}

fn display_context(context: Option<&str>) -> &str {
    context.unwrap_or("No context set")
}

/// Build the enriched context string for one worker.
///
/// Four sections in fixed order: the process-flow diagram, the execution
/// history, the upcoming workers, and the worker's own base context
/// verbatim. An empty roster yields the base context alone.
pub fn build_enriched_context(
    worker_index: usize,
    workers: &[WorkerContext],
    previous_outputs: &[PreviousOutput],
    base_context: &str,
) -> String {
    if workers.is_empty() {
        return base_context.to_string();
    }
    let total = workers.len();
    let mut parts: Vec<String> = Vec::new();

    parts.push("Agent Process Flow".to_string());
    parts.push(render_diagram(workers));
    parts.push(String::new());

    parts.push("Execution History".to_string());
    if previous_outputs.is_empty() {
        parts.push("You are the first worker in the chain.".to_string());
        parts.push("No previous workers have executed.".to_string());
    } else {
        parts.push(format!("You are Worker {} of {}.", worker_index + 1, total));
        parts.push(String::new());
        for prev in previous_outputs {
            parts.push(format!(
                "Worker {}: \"{}\"",
                prev.index + 1,
                display_context(prev.context.as_deref())
            ));
            parts.push(format!("  → {}", preview(&prev.output)));
            parts.push(String::new());
        }
    }
    parts.push(String::new());

    parts.push("Upcoming Workers".to_string());
    if worker_index == total - 1 {
        parts.push("You are the final worker in the chain.".to_string());
        parts.push("No workers will execute after you.".to_string());
    } else {
        let remaining = total - worker_index - 1;
        parts.push(format!(
            "After you complete, {} worker(s) will execute:",
            remaining
        ));
        parts.push(String::new());
        for next in &workers[worker_index + 1..] {
            let is_last = next.index == total - 1;
            parts.push(format!(
                "  {} Worker {}{}: \"{}\"",
                if is_last { "└─" } else { "├─" },
                next.index + 1,
                if is_last { " (final)" } else { "" },
                display_context(next.context.as_deref())
            ));
        }
    }
    parts.push(String::new());

    parts.push("Your Task".to_string());
    parts.push(base_context.to_string());

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<WorkerContext> {
        (0..n)
            .map(|index| WorkerContext {
                index,
                context: Some(format!("task {}", index + 1)),
            })
            .collect()
    }

    fn record(index: usize, output: &str) -> PreviousOutput {
        PreviousOutput {
            index,
            context: Some(format!("task {}", index + 1)),
            output: output.to_string(),
        }
    }

    #[test]
    fn test_empty_roster_yields_base_context() {
        let ctx = build_enriched_context(0, &[], &[], "just do it");
        assert_eq!(ctx, "just do it");
    }

    #[test]
    fn test_first_worker_history() {
        let ctx = build_enriched_context(0, &roster(3), &[], "task 1");
        assert!(ctx.contains("You are the first worker in the chain."));
        assert!(ctx.contains("No previous workers have executed."));
    }

    #[test]
    fn test_middle_worker_history() {
        let history = vec![record(0, "alpha output")];
        let ctx = build_enriched_context(1, &roster(3), &history, "task 2");
        assert!(ctx.contains("You are Worker 2 of 3."));
        assert!(ctx.contains("Worker 1: \"task 1\""));
        assert!(ctx.contains("  → alpha output"));
    }

    #[test]
    fn test_history_in_completion_order() {
        let history = vec![record(0, "first out"), record(1, "second out")];
        let ctx = build_enriched_context(2, &roster(3), &history, "task 3");
        let first = ctx.find("first out").unwrap();
        let second = ctx.find("second out").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_final_worker_upcoming() {
        let history = vec![record(0, "out"), record(1, "out")];
        let ctx = build_enriched_context(2, &roster(3), &history, "task 3");
        assert!(ctx.contains("You are the final worker in the chain."));
        assert!(ctx.contains("No workers will execute after you."));
    }

    #[test]
    fn test_upcoming_lists_remaining_workers() {
        let ctx = build_enriched_context(0, &roster(4), &[], "task 1");
        assert!(ctx.contains("After you complete, 3 worker(s) will execute:"));
        assert!(ctx.contains("├─ Worker 2: \"task 2\""));
        assert!(ctx.contains("├─ Worker 3: \"task 3\""));
        assert!(ctx.contains("└─ Worker 4 (final): \"task 4\""));
    }

    #[test]
    fn test_upcoming_entry_count_matches_position() {
        // Stage i's upcoming list has exactly N-1-i entries.
        for (index, expected) in [(0usize, 3usize), (1, 2), (2, 1)] {
            let ctx = build_enriched_context(index, &roster(4), &[], "t");
            let entries =
                ctx.matches("├─ Worker").count() + ctx.matches("└─ Worker").count();
            assert_eq!(entries, expected, "stage {}", index);
        }
    }

    #[test]
    fn test_output_preview_truncated_at_budget() {
        let long = "z".repeat(MAX_OUTPUT_PREVIEW_LENGTH + 50);
        let history = vec![record(0, &long)];
        let ctx = build_enriched_context(1, &roster(2), &history, "task 2");
        let expected = format!("{}...", "z".repeat(MAX_OUTPUT_PREVIEW_LENGTH));
        assert!(ctx.contains(&expected));
        assert!(!ctx.contains(&"z".repeat(MAX_OUTPUT_PREVIEW_LENGTH + 1)));
    }

    #[test]
    fn test_output_at_budget_verbatim() {
        let exact = "w".repeat(MAX_OUTPUT_PREVIEW_LENGTH);
        let history = vec![record(0, &exact)];
        let ctx = build_enriched_context(1, &roster(2), &history, "task 2");
        assert!(ctx.contains(&format!("  → {}", exact)));
        assert!(!ctx.contains(&format!("{}...", exact)));
    }

    #[test]
    fn test_base_context_verbatim_last_section() {
        let base = "Solve the extracted equation.\nShow no working.";
        let ctx = build_enriched_context(0, &roster(1), &[], base);
        assert!(ctx.ends_with(base));
        assert!(ctx.contains("Your Task"));
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let ctx = build_enriched_context(0, &roster(2), &[], "task 1");
        let flow = ctx.find("Agent Process Flow").unwrap();
        let history = ctx.find("Execution History").unwrap();
        let upcoming = ctx.find("Upcoming Workers").unwrap();
        let task = ctx.find("Your Task").unwrap();
        assert!(flow < history && history < upcoming && upcoming < task);
    }

    #[test]
    fn test_deterministic() {
        let a = build_enriched_context(0, &roster(3), &[], "task 1");
        let b = build_enriched_context(0, &roster(3), &[], "task 1");
        assert_eq!(a, b);
    }
}
