//! Built-in screenplay editing tools for Slugline.
//!
//! Tools are how the agent touches the screenplay: read a scene, rewrite a
//! region, insert a new scene. Each takes the current document snapshot and
//! never mutates it in place, so the agent loop can diff before/after.

pub mod edit_scene;
pub mod insert_scene;
pub mod read_scene;
pub mod scene;

use slugline_core::tool::ToolRegistry;

/// Create a default tool registry with all built-in tools.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(read_scene::ReadSceneTool));
    registry.register(Box::new(edit_scene::EditSceneTool));
    registry.register(Box::new(insert_scene::InsertSceneTool));
    registry
}
