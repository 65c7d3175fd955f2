//! insert_scene tool: add a new scene to the screenplay.

use crate::scene::{SceneRef, is_slugline, split_scenes};
use async_trait::async_trait;
use slugline_core::error::ToolError;
use slugline_core::tool::{Tool, ToolOutcome};

pub struct InsertSceneTool;

#[async_trait]
impl Tool for InsertSceneTool {
    fn name(&self) -> &str {
        "insert_scene"
    }

    fn description(&self) -> &str {
        "Insert a new scene. Provide a slugline heading (INT./EXT.) and the scene content. Inserts after 'after_scene', or at the end of the screenplay."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "heading": {
                    "type": "string",
                    "description": "Scene heading in slugline format, e.g. 'INT. KITCHEN - NIGHT'"
                },
                "content": {
                    "type": "string",
                    "description": "Scene body: action lines and dialogue"
                },
                "after_scene": {
                    "description": "Optional scene number or heading fragment to insert after; omitted means append at the end",
                    "type": ["integer", "string"]
                }
            },
            "required": ["heading", "content"]
        })
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        document: &str,
    ) -> Result<ToolOutcome, ToolError> {
        let heading = input["heading"]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments("'heading' must be a non-empty string".into())
            })?;
        if !is_slugline(heading) {
            return Err(ToolError::InvalidArguments(format!(
                "'{heading}' is not a slugline; headings start with INT., EXT., or I/E."
            )));
        }
        let content = input["content"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("'content' must be a string".into()))?;

        let at = match input.get("after_scene") {
            None | Some(serde_json::Value::Null) => document.len(),
            Some(value) => {
                let selector = SceneRef::from_value(value).ok_or_else(|| {
                    ToolError::InvalidArguments(
                        "'after_scene' must be a number or heading text".into(),
                    )
                })?;
                let scenes = split_scenes(document);
                let scene = selector.find(&scenes).ok_or_else(|| {
                    ToolError::ExecutionFailed {
                        tool_name: "insert_scene".into(),
                        reason: format!("no scene matching {selector:?}"),
                    }
                })?;
                scene.end
            }
        };

        let mut block = format!("{heading}\n\n{}", content.trim_end());
        block.push('\n');

        let mut updated = String::with_capacity(document.len() + block.len() + 2);
        updated.push_str(&document[..at]);
        // Keep a blank line between the new scene and what precedes it
        if !updated.is_empty() {
            if !updated.ends_with('\n') {
                updated.push('\n');
            }
            if !updated.ends_with("\n\n") {
                updated.push('\n');
            }
        }
        updated.push_str(&block);
        if at < document.len() {
            let rest = &document[at..];
            if !rest.starts_with('\n') {
                updated.push('\n');
            }
            updated.push_str(rest);
        }

        Ok(ToolOutcome::updated(
            format!("Inserted scene: {heading}"),
            updated,
        ))
    }
}
