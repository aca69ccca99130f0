// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::VecDeque;
use time::PrimitiveDateTime;

use crate::Activity;

pub const DEFAULT_FEED_CAPACITY: usize = 15;

/// Newest-first log of recent herd activity with a fixed capacity.
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    entries: VecDeque<Activity>,
    capacity: usize,
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }
}

impl ActivityFeed {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, activity: Activity) {
        self.entries.push_front(activity);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Replaces the log with `activities`, newest first by timestamp.
    pub fn replace<I>(&mut self, activities: I)
    where
        I: IntoIterator<Item = Activity>,
    {
        let mut sorted = activities.into_iter().collect::<Vec<_>>();
        sorted.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        sorted.truncate(self.capacity);
        self.entries = sorted.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

pub fn time_ago(now: PrimitiveDateTime, then: PrimitiveDateTime) -> String {
    let seconds = (now - then).whole_seconds();
    if seconds < 60 {
        return "just now".to_owned();
    }
    if seconds < 3_600 {
        return plural(seconds / 60, "minute");
    }
    if seconds < 86_400 {
        return plural(seconds / 3_600, "hour");
    }
    plural(seconds / 86_400, "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
