/// A registered parent and its family group.
///
/// Created by `register_parent`, never destroyed. `children` holds the
/// addresses of the children the parent enrolled, in enrolment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    pub address: String,
    pub name: String,
    pub children: Vec<String>,
}

impl Parent {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn is_member(&self, child_address: &str) -> bool {
        self.children.iter().any(|c| c == child_address)
    }
}

/// A registered child.
///
/// `parent` is the back-reference to the owning parent; it is cleared when
/// the child is removed from the family group, but the record itself (and its
/// balance) persists. `balance` is in token base units and never negative by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub address: String,
    pub name: String,
    pub parent: Option<String>,
    pub balance: u128,
}

impl Child {
    pub fn new(
        address: impl Into<String>,
        name: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            parent: Some(parent.into()),
            balance: 0,
        }
    }
}
