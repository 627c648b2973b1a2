use serde::{Deserialize, Serialize};

/// Form-encoded board create/edit submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardForm {
    pub name: String,
    pub description: String,
}
