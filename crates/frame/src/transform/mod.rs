// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub use sort::{SortDirection, sort_indices};

mod sort;
