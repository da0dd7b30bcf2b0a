// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{path::PathBuf, time::Duration};

use crate::Dialect;

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbPath {
	Memory,
	File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags {
	pub read_write: bool,
	pub create: bool,
	pub full_mutex: bool,
	pub no_mutex: bool,
	pub shared_cache: bool,
	pub private_cache: bool,
	pub uri: bool,
}

impl Default for OpenFlags {
	fn default() -> Self {
		Self {
			read_write: true,
			create: true,
			full_mutex: false,
			no_mutex: true,
			shared_cache: false,
			private_cache: false,
			uri: false,
		}
	}
}

impl OpenFlags {
	pub(crate) fn to_rusqlite(self) -> rusqlite::OpenFlags {
		let mut flags = rusqlite::OpenFlags::empty();
		if self.read_write {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE;
		}
		if self.create {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_CREATE;
		}
		if self.full_mutex {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_FULL_MUTEX;
		}
		if self.no_mutex {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX;
		}
		if self.shared_cache {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_SHARED_CACHE;
		}
		if self.private_cache {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_PRIVATE_CACHE;
		}
		if self.uri {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_URI;
		}
		flags
	}
}

#[derive(Debug, Clone)]
pub struct SqliteConfig {
	pub path: DbPath,
	pub flags: OpenFlags,
	pub busy_timeout: Duration,
	/// When false the connection behaves like an engine without `OVER (..)`
	/// support and window expressions are refused before any SQL is run.
	pub window_functions: bool,
}

impl SqliteConfig {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: DbPath::File(path.into()),
			..Self::in_memory()
		}
	}

	pub fn in_memory() -> Self {
		Self {
			path: DbPath::Memory,
			flags: OpenFlags::default(),
			busy_timeout: Duration::from_millis(5000),
			window_functions: true,
		}
	}

	pub fn path(mut self, path: DbPath) -> Self {
		self.path = path;
		self
	}

	pub fn flags(mut self, flags: OpenFlags) -> Self {
		self.flags = flags;
		self
	}

	pub fn busy_timeout(mut self, timeout: Duration) -> Self {
		self.busy_timeout = timeout;
		self
	}

	pub fn window_functions(mut self, enabled: bool) -> Self {
		self.window_functions = enabled;
		self
	}

	pub fn dialect(&self) -> Dialect {
		if self.window_functions { Dialect::sqlite() } else { Dialect::sqlite_legacy() }
	}
}

impl Default for SqliteConfig {
	fn default() -> Self {
		Self::in_memory()
	}
}
