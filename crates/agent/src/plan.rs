//! Plan parsing for the planning phase.
//!
//! The planning model is asked to answer with a JSON object:
//! `{"summary": "...", "steps": ["...", ...]}`. Models wrap that in prose
//! or markdown fences often enough that parsing is forgiving: fenced code
//! blocks are tried first, then any balanced JSON object embedded in the
//! text. When nothing parses, the run falls back to a single-step plan so a
//! malformed planning response never fails the run.

use serde::{Deserialize, Serialize};

/// What the agent intends to do, shown to the caller before execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub summary: String,
    pub steps: Vec<String>,
}

impl Plan {
    /// The single-step plan used when the planning response can't be parsed.
    pub fn fallback(message: &str) -> Self {
        Self {
            summary: "Address the request directly".into(),
            steps: vec![message.to_string()],
        }
    }
}

/// Extract a plan from a planning response.
pub fn parse_plan(content: &str) -> Option<Plan> {
    for block in fenced_blocks(content) {
        if let Some(plan) = plan_from_json(block) {
            return Some(plan);
        }
    }
    for candidate in balanced_objects(content) {
        if let Some(plan) = plan_from_json(candidate) {
            return Some(plan);
        }
    }
    None
}

fn plan_from_json(text: &str) -> Option<Plan> {
    let value: serde_json::Value = serde_json::from_str(text.trim()).ok()?;
    let summary = value.get("summary")?.as_str()?.to_string();
    let steps = value
        .get("steps")?
        .as_array()?
        .iter()
        .filter_map(|s| s.as_str())
        .map(str::to_string)
        .collect();
    Some(Plan { summary, steps })
}

/// The contents of each ``` fenced block, language tag stripped.
fn fenced_blocks(content: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = content;
    while let Some(open) = rest.find("```") {
        let after_open = &rest[open + 3..];
        let Some(close) = after_open.find("```") else {
            break;
        };
        let mut block = &after_open[..close];
        // Drop a language tag like "json" on the opening line
        if let Some(newline) = block.find('\n') {
            let first_line = block[..newline].trim();
            if !first_line.is_empty() && !first_line.contains('{') {
                block = &block[newline + 1..];
            }
        }
        blocks.push(block);
        rest = &after_open[close + 3..];
    }
    blocks
}

/// Every balanced `{...}` object in the text, outermost first.
fn balanced_objects(content: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let bytes = content.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = matching_brace(content, i) {
                objects.push(&content[i..=end]);
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    objects
}

/// Index of the brace closing the object opened at `start`, string-aware.
fn matching_brace(content: &str, start: usize) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
