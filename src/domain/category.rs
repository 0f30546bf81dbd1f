use serde::{Deserialize, Serialize};

/// Product category. Identifiers are assigned by supplier feeds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
}
