// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_frame::Frame;
use tidyq_type::{Result, Type};

use crate::{Select, SqliteConnection};

/// A named table on a connection, with the schema read when it was opened.
#[derive(Debug, Clone)]
pub struct SqlTable {
	connection: SqliteConnection,
	name: String,
	schema: Vec<(String, Type)>,
}

impl SqlTable {
	pub fn new(connection: SqliteConnection, name: impl Into<String>) -> Result<Self> {
		let name = name.into();
		let schema = connection.table_columns(&name)?;
		Ok(Self {
			connection,
			name,
			schema,
		})
	}

	/// Loads `frame` into table `name` and opens it.
	pub fn create(connection: SqliteConnection, name: impl Into<String>, frame: &Frame) -> Result<Self> {
		let name = name.into();
		connection.load(&name, frame)?;
		Self::new(connection, name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn schema(&self) -> &[(String, Type)] {
		&self.schema
	}

	pub fn connection(&self) -> &SqliteConnection {
		&self.connection
	}

	/// `SELECT <every column> FROM <table>`
	pub fn select(&self) -> Select {
		Select::from_table(&self.name, &self.schema)
	}
}
