// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_type::Type;

/// What the target SQL engine can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
	name: &'static str,
	window_functions: bool,
	// upper-case function names the engine does not provide
	missing_functions: &'static [&'static str],
	// aggregates the engine cannot evaluate as window functions
	missing_window_aggregates: &'static [&'static str],
}

impl Dialect {
	pub fn sqlite() -> Self {
		Self {
			name: "sqlite",
			window_functions: true,
			missing_functions: &["MEDIAN", "STDDEV_SAMP", "VAR_SAMP", "FIRST", "LAST"],
			missing_window_aggregates: &["COUNT_DISTINCT"],
		}
	}

	/// SQLite before 3.25, without `OVER (..)` support.
	pub fn sqlite_legacy() -> Self {
		Self {
			window_functions: false,
			..Self::sqlite()
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn supports_window_functions(&self) -> bool {
		self.window_functions
	}

	pub fn supports_function(&self, name: &str) -> bool {
		let upper = name.to_ascii_uppercase();
		!self.missing_functions.contains(&upper.as_str())
	}

	pub fn supports_window_aggregate(&self, name: &str) -> bool {
		let upper = name.to_ascii_uppercase();
		self.window_functions && !self.missing_window_aggregates.contains(&upper.as_str())
	}

	pub fn quote_identifier(&self, name: &str) -> String {
		format!("\"{}\"", name.replace('"', "\"\""))
	}

	pub fn quote_string(&self, value: &str) -> String {
		format!("'{}'", value.replace('\'', "''"))
	}

	pub fn bool_literal(&self, value: bool) -> &'static str {
		if value { "1" } else { "0" }
	}

	pub fn cast_type(&self, ty: Type) -> &'static str {
		match ty {
			Type::Boolean => "INTEGER",
			Type::Int8 => "INTEGER",
			Type::Float8 => "REAL",
			Type::Utf8 => "TEXT",
			Type::Undefined => "BLOB",
		}
	}

	/// Declared column type used when loading a frame into a table. Boolean
	/// keeps its own name so the schema round-trips through `PRAGMA table_info`.
	pub fn column_type(&self, ty: Type) -> &'static str {
		match ty {
			Type::Boolean => "BOOLEAN",
			Type::Undefined => "",
			other => self.cast_type(other),
		}
	}

	/// Maps a declared column type back onto a value type, following SQLite's
	/// type affinity rules.
	pub fn parse_column_type(&self, declared: &str) -> Type {
		let upper = declared.to_ascii_uppercase();
		if upper.is_empty() {
			Type::Undefined
		} else if upper.contains("BOOL") {
			Type::Boolean
		} else if upper.contains("INT") {
			Type::Int8
		} else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
			Type::Utf8
		} else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
			Type::Float8
		} else {
			Type::Undefined
		}
	}
}

impl Default for Dialect {
	fn default() -> Self {
		Self::sqlite()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_sqlite_capabilities() {
		let dialect = Dialect::sqlite();
		assert!(dialect.supports_window_functions());
		assert!(dialect.supports_function("sum"));
		assert!(!dialect.supports_function("median"));
		assert!(dialect.supports_window_aggregate("AVG"));
		assert!(!dialect.supports_window_aggregate("count_distinct"));
	}

	#[test]
	fn test_legacy_has_no_windows() {
		let dialect = Dialect::sqlite_legacy();
		assert!(!dialect.supports_window_functions());
		assert!(!dialect.supports_window_aggregate("SUM"));
		assert_eq!(dialect.name(), "sqlite");
	}

	#[test]
	fn test_quoting() {
		let dialect = Dialect::sqlite();
		assert_eq!(dialect.quote_identifier("a\"b"), "\"a\"\"b\"");
		assert_eq!(dialect.quote_string("it's"), "'it''s'");
	}

	#[test]
	fn test_column_type_round_trip() {
		let dialect = Dialect::sqlite();
		for ty in [Type::Boolean, Type::Int8, Type::Float8, Type::Utf8, Type::Undefined] {
			assert_eq!(dialect.parse_column_type(dialect.column_type(ty)), ty);
		}
		assert_eq!(dialect.parse_column_type("VARCHAR(10)"), Type::Utf8);
		assert_eq!(dialect.parse_column_type("DOUBLE"), Type::Float8);
	}
}
