//! Scene segmentation for screenplay documents.
//!
//! A scene starts at a slugline (a heading line like `INT. ROOM - DAY`) and
//! runs until the next slugline or the end of the document. Text before the
//! first slugline (title page, FADE IN) belongs to no scene.

/// Slugline prefixes in standard screenplay format.
///
/// `INT./EXT.` is covered by the `INT.` prefix.
const SLUGLINE_PREFIXES: &[&str] = &["INT.", "EXT.", "I/E."];

/// Whether a line is a scene heading.
pub fn is_slugline(line: &str) -> bool {
    let trimmed = line.trim_start();
    SLUGLINE_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// One scene's position within a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// 1-based scene number, in document order
    pub number: usize,
    /// The slugline text, trimmed
    pub heading: String,
    /// Byte offset of the start of the slugline
    pub start: usize,
    /// Byte offset one past the last byte of the scene
    pub end: usize,
}

impl Scene {
    /// The scene's full text, slugline included.
    pub fn text<'a>(&self, document: &'a str) -> &'a str {
        &document[self.start..self.end]
    }
}

/// Split a document into scenes at sluglines.
pub fn split_scenes(document: &str) -> Vec<Scene> {
    let mut scenes: Vec<Scene> = Vec::new();
    let mut offset = 0;

    for line in document.split_inclusive('\n') {
        if is_slugline(line) {
            if let Some(prev) = scenes.last_mut() {
                prev.end = offset;
            }
            scenes.push(Scene {
                number: scenes.len() + 1,
                heading: line.trim().to_string(),
                start: offset,
                end: document.len(),
            });
        }
        offset += line.len();
    }

    scenes
}

/// How a tool argument names a scene: by number or by heading text.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneRef {
    Number(usize),
    Heading(String),
}

impl SceneRef {
    /// Parse a JSON argument value: an integer scene number or a heading
    /// string (a numeric string counts as a number).
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if let Some(n) = value.as_u64() {
            return Some(Self::Number(n as usize));
        }
        let s = value.as_str()?.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(n) = s.parse::<usize>() {
            return Some(Self::Number(n));
        }
        Some(Self::Heading(s.to_string()))
    }

    /// Find the referenced scene. Heading matches are case-insensitive
    /// substring matches, first scene wins.
    pub fn find<'a>(&self, scenes: &'a [Scene]) -> Option<&'a Scene> {
        match self {
            Self::Number(n) => scenes.iter().find(|s| s.number == *n),
            Self::Heading(text) => {
                let needle = text.to_uppercase();
                scenes
                    .iter()
                    .find(|s| s.heading.to_uppercase().contains(&needle))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "FADE IN:\n\nINT. ROOM - DAY\n\nJOHN\nHello.\n\nEXT. STREET - NIGHT\n\nMARY\nGoodbye.\n";

    #[test]
    fn slugline_detection() {
        assert!(is_slugline("INT. ROOM - DAY"));
        assert!(is_slugline("EXT. STREET - NIGHT"));
        assert!(is_slugline("INT./EXT. CAR - DAY"));
        assert!(is_slugline("I/E. CAR - CONTINUOUS"));
        assert!(!is_slugline("JOHN"));
        assert!(!is_slugline("He enters the INT. area"));
        assert!(!is_slugline("FADE IN:"));
    }

    #[test]
    fn split_finds_both_scenes() {
        let scenes = split_scenes(SCRIPT);
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].number, 1);
        assert_eq!(scenes[0].heading, "INT. ROOM - DAY");
        assert_eq!(scenes[1].heading, "EXT. STREET - NIGHT");
    }

    #[test]
    fn scene_text_excludes_preamble_and_next_scene() {
        let scenes = split_scenes(SCRIPT);
        let first = scenes[0].text(SCRIPT);
        assert!(first.starts_with("INT. ROOM - DAY"));
        assert!(first.contains("Hello."));
        assert!(!first.contains("FADE IN"));
        assert!(!first.contains("Goodbye."));

        let second = scenes[1].text(SCRIPT);
        assert!(second.starts_with("EXT. STREET - NIGHT"));
        assert!(second.ends_with("Goodbye.\n"));
    }

    #[test]
    fn no_sluglines_means_no_scenes() {
        assert!(split_scenes("Just some notes.\nNothing here.\n").is_empty());
        assert!(split_scenes("").is_empty());
    }

    #[test]
    fn scene_ref_parsing() {
        assert_eq!(
            SceneRef::from_value(&serde_json::json!(2)),
            Some(SceneRef::Number(2))
        );
        assert_eq!(
            SceneRef::from_value(&serde_json::json!("2")),
            Some(SceneRef::Number(2))
        );
        assert_eq!(
            SceneRef::from_value(&serde_json::json!("INT. ROOM")),
            Some(SceneRef::Heading("INT. ROOM".into()))
        );
        assert_eq!(SceneRef::from_value(&serde_json::json!(null)), None);
        assert_eq!(SceneRef::from_value(&serde_json::json!("")), None);
    }

    #[test]
    fn scene_ref_lookup() {
        let scenes = split_scenes(SCRIPT);
        assert_eq!(
            SceneRef::Number(2).find(&scenes).map(|s| s.number),
            Some(2)
        );
        assert_eq!(
            SceneRef::Heading("street".into())
                .find(&scenes)
                .map(|s| s.number),
            Some(2)
        );
        assert!(SceneRef::Number(9).find(&scenes).is_none());
        assert!(SceneRef::Heading("ROOFTOP".into()).find(&scenes).is_none());
    }
}
