use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List payload as returned by the backend. Most endpoints wrap the list in
/// `{"data": [...]}`, some older ones return the bare array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Records {
    Wrapped { data: Vec<Value> },
    Bare(Vec<Value>),
}

impl Records {
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Records::Wrapped { data } => data,
            Records::Bare(data) => data,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Wrapped { data } => data.len(),
            Records::Bare(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
