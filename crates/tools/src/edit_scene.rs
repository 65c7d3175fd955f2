//! edit_scene tool: find-and-replace within the screenplay.

use crate::scene::{SceneRef, split_scenes};
use async_trait::async_trait;
use slugline_core::error::ToolError;
use slugline_core::tool::{Tool, ToolOutcome};

pub struct EditSceneTool;

#[async_trait]
impl Tool for EditSceneTool {
    fn name(&self) -> &str {
        "edit_scene"
    }

    fn description(&self) -> &str {
        "Replace the first occurrence of exact text in the screenplay. Scope the search to one scene with 'scene'."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "find": {
                    "type": "string",
                    "description": "Exact text to find (match the screenplay verbatim, including line breaks)"
                },
                "replace": {
                    "type": "string",
                    "description": "Replacement text"
                },
                "scene": {
                    "description": "Optional scene number or heading fragment to restrict the search to",
                    "type": ["integer", "string"]
                }
            },
            "required": ["find", "replace"]
        })
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        document: &str,
    ) -> Result<ToolOutcome, ToolError> {
        let find = input["find"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments("'find' must be a non-empty string".into())
            })?;
        let replace = input["replace"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("'replace' must be a string".into()))?;

        // Scope the search to one scene when asked
        let (scope_start, scope_end, scope_label) = match input.get("scene") {
            None | Some(serde_json::Value::Null) => (0, document.len(), String::new()),
            Some(value) => {
                let selector = SceneRef::from_value(value).ok_or_else(|| {
                    ToolError::InvalidArguments("'scene' must be a number or heading text".into())
                })?;
                let scenes = split_scenes(document);
                let scene = selector.find(&scenes).ok_or_else(|| {
                    ToolError::ExecutionFailed {
                        tool_name: "edit_scene".into(),
                        reason: format!("no scene matching {selector:?}"),
                    }
                })?;
                (scene.start, scene.end, format!(" in {}", scene.heading))
            }
        };

        let scope = &document[scope_start..scope_end];
        let at = scope.find(find).ok_or_else(|| ToolError::ExecutionFailed {
            tool_name: "edit_scene".into(),
            reason: format!("text not found{scope_label}: {find:?}"),
        })?;

        let mut updated = String::with_capacity(document.len() + replace.len());
        updated.push_str(&document[..scope_start + at]);
        updated.push_str(replace);
        updated.push_str(&document[scope_start + at + find.len()..]);

        Ok(ToolOutcome::updated(
            format!("Replaced text{scope_label}."),
            updated,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str =
        "INT. ROOM - DAY\n\nJOHN\nHello.\n\nEXT. STREET - NIGHT\n\nMARY\nHello.\n";

    #[tokio::test]
    async fn replaces_first_occurrence() {
        let outcome = EditSceneTool
            .execute(
                serde_json::json!({"find": "Hello.", "replace": "Hey, great to see you!"}),
                SCRIPT,
            )
            .await
            .unwrap();
        let doc = outcome.updated_document.unwrap();
        assert!(doc.contains("JOHN\nHey, great to see you!"));
        // Second occurrence untouched
        assert!(doc.contains("MARY\nHello."));
    }

    #[tokio::test]
    async fn scene_scope_restricts_search() {
        let outcome = EditSceneTool
            .execute(
                serde_json::json!({"find": "Hello.", "replace": "Goodbye.", "scene": 2}),
                SCRIPT,
            )
            .await
            .unwrap();
        let doc = outcome.updated_document.unwrap();
        assert!(doc.contains("JOHN\nHello."));
        assert!(doc.contains("MARY\nGoodbye."));
    }

    #[tokio::test]
    async fn missing_text_fails() {
        let err = EditSceneTool
            .execute(
                serde_json::json!({"find": "Bonjour.", "replace": "Hi."}),
                SCRIPT,
            )
            .await
            .unwrap_err();
        match err {
            ToolError::ExecutionFailed { reason, .. } => assert!(reason.contains("Bonjour")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn text_outside_scoped_scene_fails() {
        let err = EditSceneTool
            .execute(
                serde_json::json!({"find": "JOHN", "replace": "JACK", "scene": "street"}),
                SCRIPT,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn empty_find_rejected() {
        let err = EditSceneTool
            .execute(serde_json::json!({"find": "", "replace": "x"}), SCRIPT)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn multiline_find_spans_lines() {
        let outcome = EditSceneTool
            .execute(
                serde_json::json!({"find": "JOHN\nHello.", "replace": "JOHN\n(beat)\nHello."}),
                SCRIPT,
            )
            .await
            .unwrap();
        assert!(outcome.updated_document.unwrap().contains("(beat)"));
    }
}
