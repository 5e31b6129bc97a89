//! Domain model for todos, projects and sections.
//!
//! # Responsibility
//! - Define canonical records and the request shapes that create/patch them.
//! - Own field-level validation so no invalid write reaches storage.
//!
//! # Invariants
//! - Todo deletion is a soft-delete tombstone (`TodoLifecycle::Deleted`).
//! - Project visibility is governed by the `archived` boolean only.
//! - Section belongs to exactly one project.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod flag;
pub mod project;
pub mod section;
pub mod time;
pub mod todo;
pub mod validation;

/// Entity families managed by core, used to qualify not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Todo,
    Project,
    Section,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Project => "project",
            Self::Section => "section",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a bulk purge, serialized as `{"deleted": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeReport {
    pub deleted: u64,
}
