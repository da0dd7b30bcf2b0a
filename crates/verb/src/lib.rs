// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Verb calls, their composition with `>>` and the pipelines they form.

pub use chain::Chain;
pub use pipeline::{Grouping, Pipeline, Source};
pub use select::{SelectError, Selector, col_range, contains, ends_with, resolve_selection, starts_with};
pub use verb::{
	Assignments, JoinHow, Verb, anti_join, arrange, count, count_with, distinct, distinct_keep_all, filter, full_join,
	group_by, group_by_add, group_by_named, head, inner_join, left_join, mutate, rename, right_join, select, semi_join,
	summarize, transmute, ungroup,
};

mod chain;
mod display;
mod pipeline;
mod select;
mod verb;
