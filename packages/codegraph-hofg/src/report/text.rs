//! Plain-text report
//!
//! ```text
//! %1 --> %2
//! %2 --> %5
//! paths: 1
//! may-leak paths: 0
//! never-freed paths: 0
//! dangling pointer at leak.c:12
//! ```

use crate::features::heap_flow::HeapFlowResult;

pub struct TextReporter;

impl TextReporter {
    pub fn render(result: &HeapFlowResult) -> String {
        let mut lines: Vec<String> = result
            .graph
            .edges()
            .iter()
            .map(|edge| {
                format!(
                    "{} --> {}",
                    result.display(edge.tail.value),
                    result.display(edge.head.value)
                )
            })
            .collect();

        let marker = if result.partial { " (partial)" } else { "" };
        lines.push(format!("paths: {}{}", result.classification.total_paths, marker));
        lines.push(format!("may-leak paths: {}", result.classification.may_leak));
        lines.push(format!("never-freed paths: {}", result.classification.never_freed));

        if !result.fixpoint.converged {
            lines.push(format!(
                "warning: flow graph did not stabilize after {} rounds",
                result.fixpoint.rounds
            ));
        }

        lines.extend(result.issues().iter().map(|issue| issue.to_string()));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    pub fn print(result: &HeapFlowResult) {
        print!("{}", Self::render(result));
    }
}
