// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

use parking_lot::Mutex;
use rusqlite::{
	Connection,
	types::{Value as SqliteValue, ValueRef},
};
use tidyq_frame::{Column, ColumnData, Frame};
use tidyq_type::{BackendKind, QueryError, Result, Type, Value, error};
use tracing::{debug, instrument};

use crate::{DbPath, Dialect, SqliteConfig};

pub(crate) fn execution_failed(reason: impl ToString, sql: Option<&str>) -> tidyq_type::Error {
	error!(QueryError::ExecutionFailed {
		verb: None,
		backend: BackendKind::Sql,
		sql: sql.map(str::to_string),
		reason: reason.to_string(),
	})
}

/// A SQLite connection shared by every table and pipeline created from it.
/// Statements are serialised through the mutex.
#[derive(Clone)]
pub struct SqliteConnection {
	inner: Arc<Mutex<Connection>>,
	dialect: Dialect,
}

impl Debug for SqliteConnection {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("SqliteConnection").field("dialect", &self.dialect).finish_non_exhaustive()
	}
}

impl SqliteConnection {
	#[instrument(name = "sql::sqlite::open", level = "debug", skip(config), fields(path = ?config.path))]
	pub fn open(config: SqliteConfig) -> Result<Self> {
		let flags = config.flags.to_rusqlite();
		let conn = match &config.path {
			DbPath::Memory => Connection::open_in_memory_with_flags(flags),
			DbPath::File(path) => Connection::open_with_flags(path, flags),
		}
		.map_err(|e| {
			error!(QueryError::ConnectionFailed {
				reason: e.to_string(),
			})
		})?;

		conn.busy_timeout(config.busy_timeout).map_err(|e| {
			error!(QueryError::ConnectionFailed {
				reason: e.to_string(),
			})
		})?;

		Ok(Self {
			inner: Arc::new(Mutex::new(conn)),
			dialect: config.dialect(),
		})
	}

	pub fn in_memory() -> Result<Self> {
		Self::open(SqliteConfig::in_memory())
	}

	pub fn dialect(&self) -> &Dialect {
		&self.dialect
	}

	/// True when both handles share one underlying database connection.
	pub fn same_connection(&self, other: &SqliteConnection) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Runs `sql` and materialises every row. `types` are the expected output
	/// types by position; SQLite's storage classes are converted back onto
	/// them (0/1 to booleans, integers to floats).
	#[instrument(name = "sql::sqlite::query", level = "debug", skip(self, types), fields(rows = tracing::field::Empty))]
	pub fn query(&self, sql: &str, types: &[Type]) -> Result<Frame> {
		debug!(sql, "executing");
		let conn = self.inner.lock();
		let mut stmt = conn.prepare(sql).map_err(|e| execution_failed(e, Some(sql)))?;
		let names: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();

		let mut cells: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
		let mut rows = stmt.query([]).map_err(|e| execution_failed(e, Some(sql)))?;
		while let Some(row) = rows.next().map_err(|e| execution_failed(e, Some(sql)))? {
			for (idx, column) in cells.iter_mut().enumerate() {
				let cell = row.get_ref(idx).map_err(|e| execution_failed(e, Some(sql)))?;
				column.push(convert(cell, types.get(idx).copied().unwrap_or(Type::Undefined)));
			}
		}

		let row_count = cells.first().map_or(0, Vec::len);
		tracing::Span::current().record("rows", row_count);

		let columns = names
			.into_iter()
			.zip(cells)
			.enumerate()
			.map(|(idx, (name, values))| {
				let expected = types.get(idx).copied().unwrap_or(Type::Undefined);
				let data = build_column(values, expected).map_err(|e| execution_failed(e, Some(sql)))?;
				Ok(Column::new(name, data))
			})
			.collect::<Result<Vec<_>>>()?;

		Frame::new(columns).map_err(|e| execution_failed(e, Some(sql)))
	}

	/// Replaces table `name` with the contents of `frame`.
	#[instrument(name = "sql::sqlite::load", level = "debug", skip(self, frame), fields(rows = frame.row_count()))]
	pub fn load(&self, name: &str, frame: &Frame) -> Result<()> {
		let table = self.dialect.quote_identifier(name);
		let definitions = frame
			.columns
			.iter()
			.map(|c| {
				format!("{} {}", self.dialect.quote_identifier(&c.name), self.dialect.column_type(c.data.get_type()))
			})
			.collect::<Vec<_>>()
			.join(", ");
		let placeholders = vec!["?"; frame.column_count()].join(", ");
		let create = format!("DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({definitions});");
		let insert = format!("INSERT INTO {table} VALUES ({placeholders})");

		let mut conn = self.inner.lock();
		let tx = conn.transaction().map_err(|e| execution_failed(e, None))?;
		tx.execute_batch(&create).map_err(|e| execution_failed(e, Some(&create)))?;
		{
			let mut stmt = tx.prepare(&insert).map_err(|e| execution_failed(e, Some(&insert)))?;
			for row in 0..frame.row_count() {
				let params = frame.row(row).into_iter().map(to_sqlite);
				stmt.execute(rusqlite::params_from_iter(params))
					.map_err(|e| execution_failed(e, Some(&insert)))?;
			}
		}
		tx.commit().map_err(|e| execution_failed(e, None))
	}

	/// Column names and types of an existing table, in declaration order.
	pub fn table_columns(&self, name: &str) -> Result<Vec<(String, Type)>> {
		let sql = format!("PRAGMA table_info({})", self.dialect.quote_identifier(name));
		let conn = self.inner.lock();
		let mut stmt = conn.prepare(&sql).map_err(|e| execution_failed(e, Some(&sql)))?;
		let columns = stmt
			.query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))
			.map_err(|e| execution_failed(e, Some(&sql)))?
			.collect::<std::result::Result<Vec<_>, _>>()
			.map_err(|e| execution_failed(e, Some(&sql)))?;

		if columns.is_empty() {
			return Err(execution_failed(format!("no such table: {name}"), Some(&sql)));
		}

		Ok(columns.into_iter().map(|(column, declared)| (column, self.dialect.parse_column_type(&declared))).collect())
	}

	pub fn execute_batch(&self, sql: &str) -> Result<()> {
		self.inner.lock().execute_batch(sql).map_err(|e| execution_failed(e, Some(sql)))
	}
}

fn convert(cell: ValueRef<'_>, expected: Type) -> Value {
	match cell {
		ValueRef::Null => Value::Undefined,
		ValueRef::Integer(i) => match expected {
			Type::Boolean => Value::Boolean(i != 0),
			Type::Float8 => Value::float8(i as f64),
			_ => Value::Int8(i),
		},
		ValueRef::Real(f) => match expected {
			Type::Boolean => Value::Boolean(f != 0.0),
			_ => Value::float8(f),
		},
		ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Value::Utf8(String::from_utf8_lossy(bytes).into_owned()),
	}
}

fn build_column(values: Vec<Value>, expected: Type) -> tidyq_frame::Result<ColumnData> {
	let len = values.len();
	let data = ColumnData::from_values(values)?;
	if data.get_type() == Type::Undefined && expected != Type::Undefined {
		let mut typed = ColumnData::with_type(expected);
		for _ in 0..len {
			typed.push(Value::Undefined)?;
		}
		return Ok(typed);
	}
	Ok(data)
}

fn to_sqlite(value: Value) -> SqliteValue {
	match value {
		Value::Undefined => SqliteValue::Null,
		Value::Boolean(b) => SqliteValue::Integer(b as i64),
		Value::Int8(i) => SqliteValue::Integer(i),
		Value::Float8(f) => SqliteValue::Real(f.value()),
		Value::Utf8(s) => SqliteValue::Text(s),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn frame() -> Frame {
		Frame::new(vec![
			Column::int8("x", [1, 2, 3]),
			Column::float8("f", [0.5, 1.5, 2.5]),
			Column::bool("b", [true, false, true]),
			Column::utf8("s", ["a", "b", "c"]),
		])
		.unwrap()
	}

	#[test]
	fn test_load_and_query_round_trip() {
		let conn = SqliteConnection::in_memory().unwrap();
		conn.load("t", &frame()).unwrap();
		let types = [Type::Int8, Type::Float8, Type::Boolean, Type::Utf8];
		let result = conn.query(r#"SELECT "x", "f", "b", "s" FROM "t""#, &types).unwrap();
		assert_eq!(result, frame());
	}

	#[test]
	fn test_table_columns() {
		let conn = SqliteConnection::in_memory().unwrap();
		conn.load("t", &frame()).unwrap();
		assert_eq!(
			conn.table_columns("t").unwrap(),
			vec![
				("x".to_string(), Type::Int8),
				("f".to_string(), Type::Float8),
				("b".to_string(), Type::Boolean),
				("s".to_string(), Type::Utf8),
			]
		);
	}

	#[test]
	fn test_missing_table() {
		let conn = SqliteConnection::in_memory().unwrap();
		let err = conn.table_columns("nope").unwrap_err();
		assert_eq!(err.code, "BACKEND_001");
	}

	#[test]
	fn test_bad_sql_carries_statement() {
		let conn = SqliteConnection::in_memory().unwrap();
		let err = conn.query("SELECT FROM", &[]).unwrap_err();
		assert_eq!(err.code, "BACKEND_001");
		assert_eq!(err.expression.as_deref(), Some("SELECT FROM"));
	}

	#[test]
	fn test_nulls_keep_expected_type() {
		let conn = SqliteConnection::in_memory().unwrap();
		let result = conn.query("SELECT NULL AS \"x\", 1 AS \"y\"", &[Type::Int8, Type::Float8]).unwrap();
		assert_eq!(result.columns[0].data, ColumnData::Int8(vec![0], vec![false]));
		assert_eq!(result.columns[1].data, ColumnData::float8([1.0]));
	}

	#[test]
	fn test_same_connection() {
		let conn = SqliteConnection::in_memory().unwrap();
		let other = SqliteConnection::in_memory().unwrap();
		assert!(conn.same_connection(&conn.clone()));
		assert!(!conn.same_connection(&other));
	}

	#[test]
	fn test_reload_replaces_table() {
		let conn = SqliteConnection::in_memory().unwrap();
		conn.load("t", &frame()).unwrap();
		conn.load("t", &Frame::new(vec![Column::int8("y", [7])]).unwrap()).unwrap();
		assert_eq!(conn.table_columns("t").unwrap(), vec![("y".to_string(), Type::Int8)]);
	}
}
