use crate::Points;
use serde::Deserialize;
use serde::Serialize;

/// Asset definition. Owned instances live on the player row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    id: String,
    name: String,
    profit: Points,
}

impl Asset {
    pub fn new(id: &str, name: &str, profit: Points) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            profit,
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Points paid into on-hand points per return.
    pub fn profit(&self) -> Points {
        self.profit
    }
}
