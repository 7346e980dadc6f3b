//! Box diagram of the worker chain.
//!
//! Pure formatting: one fixed-width bordered box per worker with a truncated
//! context preview, connected by arrows. Consumed only by the context
//! builder.

use crate::types::WorkerContext;

const BOX_WIDTH: usize = 50;
const MAX_CONTEXT_LENGTH: usize = 45;
const TRUNCATED_LENGTH: usize = 42;

/// Truncate to `max` visible characters, ellipsis included.
fn truncate_for_box(text: &str) -> String {
    if text.chars().count() > MAX_CONTEXT_LENGTH {
        let cut: String = text.chars().take(TRUNCATED_LENGTH).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Render the chain as a vertical sequence of labelled boxes.
///
/// Workers are labelled by 1-based position; a worker without a context gets
/// a placeholder. Every non-final box is followed by an arrow connector. An
/// empty roster renders an empty diagram.
pub fn render_diagram(workers: &[WorkerContext]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for worker in workers {
        let worker_num = worker.index + 1;
        let is_last = worker.index == workers.len() - 1;
        let display = worker.context.as_deref().unwrap_or("No context set");
        let short = truncate_for_box(display);

        let label = format!("Worker {}", worker_num);
        let padding = BOX_WIDTH.saturating_sub(label.chars().count() + 3);
        let inner_pad = (BOX_WIDTH - 2).saturating_sub(short.chars().count());

        lines.push(format!("┌─ {} {}┐", label, "─".repeat(padding)));
        lines.push(format!("│ {}{} │", short, " ".repeat(inner_pad)));
        lines.push(format!("└{}┘", "─".repeat(BOX_WIDTH)));

        if !is_last {
            lines.push("         ⬇".to_string());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(contexts: &[Option<&str>]) -> Vec<WorkerContext> {
        contexts
            .iter()
            .enumerate()
            .map(|(index, context)| WorkerContext {
                index,
                context: context.map(|c| c.to_string()),
            })
            .collect()
    }

    #[test]
    fn test_single_worker_no_connector() {
        let diagram = render_diagram(&roster(&[Some("Summarize the input")]));
        assert!(diagram.contains("Worker 1"));
        assert!(diagram.contains("Summarize the input"));
        assert!(!diagram.contains('⬇'));
    }

    #[test]
    fn test_connectors_between_boxes() {
        let diagram = render_diagram(&roster(&[Some("a"), Some("b"), Some("c")]));
        assert_eq!(diagram.matches('⬇').count(), 2);
        assert!(diagram.contains("Worker 1"));
        assert!(diagram.contains("Worker 2"));
        assert!(diagram.contains("Worker 3"));
    }

    #[test]
    fn test_missing_context_placeholder() {
        let diagram = render_diagram(&roster(&[None]));
        assert!(diagram.contains("No context set"));
    }

    #[test]
    fn test_long_context_truncated() {
        let long = "x".repeat(100);
        let diagram = render_diagram(&roster(&[Some(&long)]));
        let expected = format!("{}...", "x".repeat(TRUNCATED_LENGTH));
        assert!(diagram.contains(&expected));
        assert!(!diagram.contains(&"x".repeat(TRUNCATED_LENGTH + 1)));
    }

    #[test]
    fn test_context_at_limit_not_truncated() {
        let exact = "y".repeat(MAX_CONTEXT_LENGTH);
        let diagram = render_diagram(&roster(&[Some(&exact)]));
        assert!(diagram.contains(&exact));
        assert!(!diagram.contains("..."));
    }

    #[test]
    fn test_empty_roster_renders_empty() {
        assert_eq!(render_diagram(&[]), "");
    }

    #[test]
    fn test_box_lines_consistent_width() {
        let diagram = render_diagram(&roster(&[Some("short")]));
        let lines: Vec<&str> = diagram.lines().collect();
        // Top, middle, and bottom lines frame the same box width.
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].chars().count(), BOX_WIDTH + 2);
        assert_eq!(lines[1].chars().count(), BOX_WIDTH + 2);
        assert_eq!(lines[2].chars().count(), BOX_WIDTH + 2);
    }
}
