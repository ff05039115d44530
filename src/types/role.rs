use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Grants every verb in `verbs` on every resource kind in `resources`. `*`
/// matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    pub resources: HashSet<String>,
    pub verbs: HashSet<String>,
}

impl RoleRule {
    pub fn new<R, V>(resources: R, verbs: V) -> Self
    where
        R: IntoIterator,
        R::Item: ToString,
        V: IntoIterator,
        V::Item: ToString,
    {
        Self {
            resources: resources.into_iter().map(|r| r.to_string()).collect(),
            verbs: verbs.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn allows(&self, resource: &str, verb: &str) -> bool {
        (self.resources.contains("*") || self.resources.contains(resource))
            && (self.verbs.contains("*") || self.verbs.contains(verb))
    }
}
