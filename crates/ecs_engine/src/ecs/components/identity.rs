//! Display name component

use crate::ecs::Component;
use std::fmt;

/// Human-readable entity name, informational only
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    /// Display name
    pub name: String,
}

impl Component for Identity {}

impl Identity {
    /// Create a new identity
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
