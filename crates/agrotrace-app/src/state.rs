// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use time::PrimitiveDateTime;

use crate::{
    Animal, AnimalFormInput, AnimalId, DEFAULT_PAGE_SIZE, FilteredList, HealthStatus, HerdStats,
    ListFilter, Page, avatar_color, page_count,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterCommand {
    Search(String),
    FilterStatus(Option<HealthStatus>),
    FilterBreed(Option<String>),
    ClearFilters,
    NextPage,
    PrevPage,
    Add(AnimalFormInput),
    Edit(AnimalId, AnimalFormInput),
    Delete(AnimalId),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    ViewChanged { visible: usize, total: usize },
    PageChanged(usize),
    StatusUpdated(String),
    StatusCleared,
}

/// Animal roster screen: the filtered list plus paging and the status line.
#[derive(Debug, Clone)]
pub struct RosterState {
    animals: FilteredList<Animal>,
    page: usize,
    page_size: usize,
    added: usize,
    pub status_line: Option<String>,
}

impl Default for RosterState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl RosterState {
    pub fn new(page_size: usize) -> Self {
        Self {
            animals: FilteredList::new(),
            page: 1,
            page_size: page_size.max(1),
            added: 0,
            status_line: None,
        }
    }

    pub fn animals(&self) -> &FilteredList<Animal> {
        &self.animals
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> Page<&Animal> {
        self.animals.filtered().page(self.page, self.page_size)
    }

    /// Totals over the whole herd, ignoring filters. Scan recency is
    /// measured back from `now`.
    pub fn stats(&self, now: PrimitiveDateTime) -> HerdStats {
        HerdStats::from_animals(self.animals.master(), now)
    }

    /// Single entry point for an initial fetch or its fallback dataset.
    pub fn load<I>(&mut self, animals: I) -> Vec<RosterEvent>
    where
        I: IntoIterator<Item = Animal>,
    {
        self.animals.set_all(animals);
        self.page = 1;
        vec![self.view_changed(), RosterEvent::PageChanged(self.page)]
    }

    pub fn dispatch(&mut self, command: RosterCommand) -> Result<Vec<RosterEvent>> {
        match command {
            RosterCommand::Search(query) => {
                let filter = self.animals.active_filter().clone().with_query(query);
                Ok(self.refilter(filter))
            }
            RosterCommand::FilterStatus(status) => {
                let filter = self
                    .animals
                    .active_filter()
                    .clone()
                    .with_status(status.map(HealthStatus::as_str));
                Ok(self.refilter(filter))
            }
            RosterCommand::FilterBreed(breed) => {
                let filter = self
                    .animals
                    .active_filter()
                    .clone()
                    .with_group(breed.as_deref());
                Ok(self.refilter(filter))
            }
            RosterCommand::ClearFilters => Ok(self.refilter(ListFilter::default())),
            RosterCommand::NextPage => Ok(self.turn_page(1)),
            RosterCommand::PrevPage => Ok(self.turn_page(-1)),
            RosterCommand::Add(form) => {
                form.validate()?;
                let name = form.name.clone();
                let color = avatar_color(self.added);
                self.animals.insert_with(|id| form.into_animal(id, color))?;
                self.added += 1;
                Ok(self.after_mutation(format!("{name} added")))
            }
            RosterCommand::Edit(id, form) => {
                form.validate()?;
                let name = form.name.clone();
                self.animals.update_by_id(&id, form)?;
                Ok(self.after_mutation(format!("{name} updated")))
            }
            RosterCommand::Delete(id) => {
                let name = self
                    .animals
                    .get(&id)
                    .map_or_else(|| id.to_string(), |animal| animal.name.clone());
                self.animals.remove_by_id(&id)?;
                Ok(self.after_mutation(format!("{name} removed")))
            }
            RosterCommand::ClearStatus => {
                self.status_line = None;
                Ok(vec![RosterEvent::StatusCleared])
            }
        }
    }

    fn refilter(&mut self, filter: ListFilter) -> Vec<RosterEvent> {
        self.animals.set_filter(filter);
        self.page = 1;
        vec![self.view_changed(), RosterEvent::PageChanged(self.page)]
    }

    fn turn_page(&mut self, delta: isize) -> Vec<RosterEvent> {
        let last = self.last_page();
        let next = self.page.saturating_add_signed(delta).clamp(1, last);
        if next == self.page {
            return Vec::new();
        }
        self.page = next;
        vec![RosterEvent::PageChanged(self.page)]
    }

    fn after_mutation(&mut self, message: String) -> Vec<RosterEvent> {
        let mut events = vec![self.view_changed()];
        let last = self.last_page();
        if self.page > last {
            self.page = last;
            events.push(RosterEvent::PageChanged(self.page));
        }
        events.push(self.set_status(message));
        events
    }

    fn last_page(&self) -> usize {
        page_count(self.animals.filtered().len(), self.page_size).max(1)
    }

    fn view_changed(&self) -> RosterEvent {
        RosterEvent::ViewChanged {
            visible: self.animals.filtered().len(),
            total: self.animals.len(),
        }
    }

    fn set_status(&mut self, message: String) -> RosterEvent {
        self.status_line = Some(message.clone());
        RosterEvent::StatusUpdated(message)
    }
}
