// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use tidyq_frame::Frame;
use tidyq_sql::{SqlTable, SqliteConnection};
use tidyq_verb::Pipeline;

/// A backend every cross-backend case runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
	Eager,
	Sqlite,
}

/// Every backend, eager first.
pub fn backends() -> [Backend; 2] {
	[Backend::Eager, Backend::Sqlite]
}

impl Backend {
	/// A pipeline over `frame` on this backend.
	pub fn source(&self, frame: &Frame) -> Pipeline {
		let mut sources = self.sources(&[("data", frame)]);
		sources.remove(0)
	}

	/// One pipeline per frame. On SQLite all of them live in the same
	/// database, so they can be joined.
	pub fn sources(&self, frames: &[(&str, &Frame)]) -> Vec<Pipeline> {
		match self {
			Backend::Eager => frames.iter().map(|(_, frame)| Pipeline::new((*frame).clone())).collect(),
			Backend::Sqlite => {
				let connection = SqliteConnection::in_memory()
					.unwrap_or_else(|err| panic!("cannot open an in-memory database: {err}"));
				frames.iter().map(|(name, frame)| Pipeline::new(copy_to_sql(&connection, name, frame))).collect()
			}
		}
	}
}

impl Display for Backend {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Backend::Eager => "eager",
			Backend::Sqlite => "sqlite",
		})
	}
}

/// Loads `frame` into table `name`, replacing any table of that name.
pub fn copy_to_sql(connection: &SqliteConnection, name: &str, frame: &Frame) -> SqlTable {
	SqlTable::create(connection.clone(), name, frame).unwrap_or_else(|err| panic!("cannot load table '{name}': {err}"))
}
