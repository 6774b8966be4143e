// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;

/// Lifecycle of a tracked entity inside one rate engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// No prior sample held.
    Unseen,
    /// A prior sample is held; deltas can be computed.
    Active,
    /// Dropped from the enumeration; prior sample discarded. Terminal: an
    /// entity that shows up again with the same ID starts over as `Unseen`.
    Removed,
}

impl EntityState {
    pub(crate) fn can_transition_to(self, next: EntityState) -> bool {
        use EntityState::*;
        matches!(
            (self, next),
            (Unseen, Active) | (Active, Active) | (Active, Removed)
        )
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityState::Unseen => write!(f, "unseen"),
            EntityState::Active => write!(f, "active"),
            EntityState::Removed => write!(f, "removed"),
        }
    }
}
