//! Outcome emitter: the single stdout line read by the orchestrator.

use crate::types::Label;

/// Format a label as `recommendation: pN`
pub fn render(label: Label) -> String {
    format!("recommendation: {}", label)
}

/// Print the recommendation line on stdout
pub fn emit(label: Label) {
    println!("{}", render(label));
}
