// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::{GeneratedId, Page, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    DuplicateId(String),
    NotFound(String),
}

impl std::fmt::Display for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "record {id} already exists"),
            Self::NotFound(id) => write!(f, "record {id} not found"),
        }
    }
}

impl std::error::Error for ListError {}

pub type ListResult<T> = std::result::Result<T, ListError>;

/// Active predicates. Empty status/group mean "any".
///
/// Fields are private so every path through `new` and the `with_*` setters
/// normalizes an empty tag to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    query: String,
    status: Option<String>,
    group: Option<String>,
}

impl ListFilter {
    pub fn new(query: impl Into<String>, status: Option<&str>, group: Option<&str>) -> Self {
        Self {
            query: query.into(),
            status: non_empty(status),
            group: non_empty(group),
        }
    }

    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self
        }
    }

    pub fn with_status(self, status: Option<&str>) -> Self {
        Self {
            status: non_empty(status),
            ..self
        }
    }

    pub fn with_group(self, group: Option<&str>) -> Self {
        Self {
            group: non_empty(group),
            ..self
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.status.is_none() && self.group.is_none()
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.matches_needle(self.needle().as_deref(), record)
    }

    // A blank query matches everything; otherwise the query is lowercased
    // but not trimmed.
    fn needle(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            None
        } else {
            Some(self.query.to_lowercase())
        }
    }

    fn matches_needle<R: Record>(&self, needle: Option<&str>, record: &R) -> bool {
        if let Some(needle) = needle
            && !record
                .searchable_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
        {
            return false;
        }
        if let Some(status) = &self.status
            && record.status_tag() != status
        {
            return false;
        }
        if let Some(group) = &self.group
            && record.group_tag() != group
        {
            return false;
        }
        true
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_owned)
}

/// Borrowed, ordered view of the records that pass the active filter.
#[derive(Debug)]
pub struct FilteredView<'a, R> {
    master: &'a [R],
    indices: &'a [usize],
}

impl<R> Clone for FilteredView<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FilteredView<'_, R> {}

impl<'a, R> FilteredView<'a, R> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&'a R> {
        let master = self.master;
        self.indices.get(position).map(|&index| &master[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a R> + use<'a, R> {
        let master = self.master;
        let indices = self.indices;
        indices.iter().map(move |&index| &master[index])
    }

    pub fn page(&self, page: usize, per_page: usize) -> Page<&'a R> {
        Page::of(self.iter().collect(), page, per_page)
    }

    pub fn to_vec(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'a, R: Record> FilteredView<'a, R> {
    pub fn ids(&self) -> Vec<&'a R::Id> {
        self.iter().map(Record::id).collect()
    }
}

/// Master collection plus the filtered view derived from it.
///
/// Every mutation recomputes the view before returning it, and a failed
/// mutation leaves both untouched.
#[derive(Debug, Clone)]
pub struct FilteredList<R> {
    master: Vec<R>,
    visible: Vec<usize>,
    filter: ListFilter,
    next_sequence: u64,
}

impl<R: Record> Default for FilteredList<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> FilteredList<R> {
    pub fn new() -> Self {
        Self {
            master: Vec::new(),
            visible: Vec::new(),
            filter: ListFilter::default(),
            next_sequence: 0,
        }
    }

    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        let mut list = Self::new();
        list.set_all(records);
        list
    }

    pub fn master(&self) -> &[R] {
        &self.master
    }

    pub fn filtered(&self) -> FilteredView<'_, R> {
        FilteredView {
            master: &self.master,
            indices: &self.visible,
        }
    }

    pub fn active_filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn len(&self) -> usize {
        self.master.len()
    }

    pub fn is_empty(&self) -> bool {
        self.master.is_empty()
    }

    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.master.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the master collection. Later records whose id was already
    /// seen are dropped so ids stay unique.
    pub fn set_all<I>(&mut self, records: I) -> FilteredView<'_, R>
    where
        I: IntoIterator<Item = R>,
    {
        let mut seen = HashSet::new();
        let mut master = Vec::new();
        for record in records {
            if seen.insert(record.id().clone()) {
                master.push(record);
            } else {
                tracing::warn!(id = %record.id(), "dropping record with duplicate id");
            }
        }

        self.master = master;
        self.recompute();
        tracing::debug!(
            master = self.master.len(),
            visible = self.visible.len(),
            "records replaced"
        );
        self.filtered()
    }

    /// Adds a record at the front of the master collection.
    pub fn insert(&mut self, record: R) -> ListResult<FilteredView<'_, R>> {
        if self.contains(record.id()) {
            return Err(ListError::DuplicateId(record.id().to_string()));
        }

        tracing::debug!(id = %record.id(), "record inserted");
        self.master.insert(0, record);
        self.recompute();
        Ok(self.filtered())
    }

    /// Mints an unused id, builds the record from it, and inserts it.
    pub fn insert_with<F>(&mut self, build: F) -> ListResult<FilteredView<'_, R>>
    where
        R::Id: GeneratedId,
        F: FnOnce(R::Id) -> R,
    {
        let id = self.allocate_id();
        self.insert(build(id))
    }

    pub fn update_by_id(&mut self, id: &R::Id, patch: R::Patch) -> ListResult<FilteredView<'_, R>> {
        let Some(record) = self.master.iter_mut().find(|record| record.id() == id) else {
            return Err(ListError::NotFound(id.to_string()));
        };

        record.apply_patch(patch);
        tracing::debug!(id = %id, "record updated");
        self.recompute();
        Ok(self.filtered())
    }

    pub fn remove_by_id(&mut self, id: &R::Id) -> ListResult<FilteredView<'_, R>> {
        let Some(position) = self.master.iter().position(|record| record.id() == id) else {
            return Err(ListError::NotFound(id.to_string()));
        };

        self.master.remove(position);
        tracing::debug!(id = %id, "record removed");
        self.recompute();
        Ok(self.filtered())
    }

    pub fn apply_filters(
        &mut self,
        query: &str,
        status: Option<&str>,
        group: Option<&str>,
    ) -> FilteredView<'_, R> {
        self.set_filter(ListFilter::new(query, status, group))
    }

    pub fn set_filter(&mut self, filter: ListFilter) -> FilteredView<'_, R> {
        self.filter = filter;
        self.recompute();
        tracing::debug!(
            query = %self.filter.query,
            status = ?self.filter.status,
            group = ?self.filter.group,
            visible = self.visible.len(),
            "filters applied"
        );
        self.filtered()
    }

    fn allocate_id(&mut self) -> R::Id
    where
        R::Id: GeneratedId,
    {
        loop {
            self.next_sequence += 1;
            let candidate = R::Id::generate(self.next_sequence);
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn recompute(&mut self) {
        let needle = self.filter.needle();
        self.visible = self
            .master
            .iter()
            .enumerate()
            .filter(|(_, record)| self.filter.matches_needle(needle.as_deref(), *record))
            .map(|(index, _)| index)
            .collect();
    }
}

/// Serializes every call on one list behind a mutex so each mutation stays
/// all-or-nothing when the list is shared across threads.
#[derive(Debug)]
pub struct SharedList<R> {
    inner: Arc<Mutex<FilteredList<R>>>,
}

impl<R> Clone for SharedList<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Record> SharedList<R> {
    pub fn new(list: FilteredList<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(list)),
        }
    }

    pub fn with<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut FilteredList<R>) -> T,
    {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}
