// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub use group_by::{GroupByKey, GroupByView};

mod group_by;
