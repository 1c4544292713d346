use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Non-core services currently requested to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveState {
    services: BTreeSet<String>,
}

impl ActiveState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn services(&self) -> &BTreeSet<String> {
        &self.services
    }

    pub fn into_services(self) -> BTreeSet<String> {
        self.services
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Sorted service names.
    pub fn names(&self) -> Vec<String> {
        self.services.iter().cloned().collect()
    }

    /// Same set with every name in `excluded` removed.
    pub fn without(&self, excluded: &BTreeSet<String>) -> Self {
        self.services.difference(excluded).cloned().collect()
    }
}

impl From<BTreeSet<String>> for ActiveState {
    fn from(services: BTreeSet<String>) -> Self {
        Self { services }
    }
}

impl FromIterator<String> for ActiveState {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            services: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for ActiveState {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(String::from).collect()
    }
}
