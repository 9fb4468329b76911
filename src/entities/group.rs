// 🗂️ Group Entity - top-level grouping of skill categories
//
// Groups are purely organizational: a category points at its group by id,
// the group itself owns no behavior.

use serde::{Deserialize, Serialize};

/// Top-level taxonomy group (e.g. "A. AI Product Development")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Short letter id ("A", "B", ...)
    pub id: String,

    /// Human-readable name
    pub name: String,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Group {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Label as it appears in the taxonomy outline: "A. AI Product Development"
    pub fn display_label(&self) -> String {
        format!("{}. {}", self.id, self.name)
    }
}
