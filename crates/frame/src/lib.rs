// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-memory columnar frames and the kernels the eager backend runs on them.

pub use column::{Column, ColumnData};
pub use error::FrameError;
pub use frame::Frame;
pub use transform::{SortDirection, sort_indices};
pub use view::{GroupByKey, GroupByView};

mod column;
pub mod compute;
mod display;
mod error;
mod frame;
mod transform;
mod view;

pub type Result<T> = std::result::Result<T, FrameError>;
