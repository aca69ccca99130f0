// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;
use std::hash::Hash;

/// An entity the roster can hold: stable identity plus the attributes the
/// list filters on.
pub trait Record {
    type Id: Clone + Eq + Hash + fmt::Display;

    /// Replacement attributes for an in-place edit. Applying a patch never
    /// changes [`Record::id`].
    type Patch;

    fn id(&self) -> &Self::Id;

    /// Attributes matched by the free-text query, in display order.
    fn searchable_fields(&self) -> Vec<&str>;

    fn status_tag(&self) -> &str;

    fn group_tag(&self) -> &str;

    fn apply_patch(&mut self, patch: Self::Patch);
}
