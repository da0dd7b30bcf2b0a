// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Fixtures and assertions shared by the test suites.

pub use assert::{assert_frame_equal, assert_frame_sort_equal};
pub use backend::{Backend, backends, copy_to_sql};
pub use logging::init_tracing;

#[doc(hidden)]
pub use tidyq_frame as __frame;

mod assert;
mod backend;
mod logging;

/// Builds a frame from `name => ColumnData` pairs; panics when the columns
/// differ in length.
#[macro_export]
macro_rules! frame {
	($($name:expr => $data:expr),* $(,)?) => {
		$crate::__frame::Frame::new(vec![$($crate::__frame::Column::new($name, $data)),*])
			.unwrap_or_else(|err| panic!("invalid test frame: {err}"))
	};
}
