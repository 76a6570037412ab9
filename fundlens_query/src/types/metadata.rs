use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StateMetadata {
    pub code: String,
    pub name: String,
}

/// A code with its human-readable label (entity types, committee types, offices).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LabeledCode {
    pub code: String,
    pub label: String,
}
