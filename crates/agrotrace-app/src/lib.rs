// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod activity;
pub mod forms;
pub mod ids;
pub mod list;
pub mod model;
pub mod page;
pub mod record;
pub mod state;
pub mod stats;

pub use activity::*;
pub use forms::*;
pub use ids::*;
pub use list::*;
pub use model::*;
pub use page::*;
pub use record::*;
pub use state::*;
pub use stats::*;
