use serde::{Deserialize, Serialize};

/// A student's generated learning plan. Lives only inside the owning
/// session; it is never written to the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapDraft {
    pub topic: String,
    pub level: String,
    pub duration: String,
    pub goal: String,
    pub content: String,
}

impl RoadmapDraft {
    /// Title used for the exported PDF.
    pub fn export_title(&self) -> String {
        format!("{} Roadmap", self.topic)
    }
}
