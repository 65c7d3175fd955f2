//! read_scene tool: return one scene's text, or the scene list.

use crate::scene::{SceneRef, split_scenes};
use async_trait::async_trait;
use slugline_core::error::ToolError;
use slugline_core::tool::{Tool, ToolOutcome};

pub struct ReadSceneTool;

#[async_trait]
impl Tool for ReadSceneTool {
    fn name(&self) -> &str {
        "read_scene"
    }

    fn description(&self) -> &str {
        "Read one scene of the screenplay by scene number or heading. Omit 'scene' to list all scene headings."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "scene": {
                    "description": "Scene number (1-based) or a fragment of the scene heading, e.g. 'INT. ROOM'. Omit to list all scenes.",
                    "type": ["integer", "string"]
                }
            }
        })
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        document: &str,
    ) -> Result<ToolOutcome, ToolError> {
        let scenes = split_scenes(document);

        let selector = match input.get("scene") {
            None | Some(serde_json::Value::Null) => {
                if scenes.is_empty() {
                    return Ok(ToolOutcome::read_only("The screenplay has no scenes yet."));
                }
                let listing = scenes
                    .iter()
                    .map(|s| format!("{}. {}", s.number, s.heading))
                    .collect::<Vec<_>>()
                    .join("\n");
                return Ok(ToolOutcome::read_only(listing));
            }
            Some(value) => SceneRef::from_value(value).ok_or_else(|| {
                ToolError::InvalidArguments("'scene' must be a number or heading text".into())
            })?,
        };

        let scene = selector.find(&scenes).ok_or_else(|| ToolError::ExecutionFailed {
            tool_name: "read_scene".into(),
            reason: format!("no scene matching {selector:?}"),
        })?;

        Ok(ToolOutcome::read_only(scene.text(document)))
    }
}
