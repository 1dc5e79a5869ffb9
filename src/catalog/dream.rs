use crate::ID;
use crate::Points;
use crate::Unique;
use serde::Deserialize;
use serde::Serialize;

/// Victory purchase. Dreams form an ordered unlock tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dream {
    id: ID<Self>,
    name: String,
    slug: String,
    cost: Points,
    order: i32,
    prerequisite: Option<ID<Self>>,
}

impl Dream {
    pub fn new(
        id: ID<Self>,
        name: &str,
        slug: &str,
        cost: Points,
        order: i32,
        prerequisite: Option<ID<Self>>,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
            cost,
            order,
            prerequisite,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn slug(&self) -> &str {
        &self.slug
    }
    /// Paid from on-hand points, never from savings.
    pub fn cost(&self) -> Points {
        self.cost
    }
    pub fn order(&self) -> i32 {
        self.order
    }
    pub fn prerequisite(&self) -> Option<ID<Self>> {
        self.prerequisite
    }
}

impl Unique for Dream {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
