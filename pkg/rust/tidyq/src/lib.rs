// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Tabular queries written once and run on either backend.
//!
//! Expressions are built from the placeholder `_`, spelled [`PLACEHOLDER`]
//! or [`col`]. Verbs compose with `>>` into a [`Pipeline`], which
//! [`collect`] runs against an in-memory [`Frame`] or a SQLite table.
//!
//! ```
//! use tidyq::prelude::*;
//!
//! let frame = Frame::new(vec![Column::int8("g", [1, 1, 2]), Column::int8("x", [1, 2, 3])]).unwrap();
//! let pipeline = frame >> group_by([col("g")]) >> summarize([("total", col("x").sum())]);
//! let result = pipeline.collect().unwrap();
//! assert_eq!(result.try_column("total").unwrap().data, ColumnData::int8([3, 3]));
//! ```

pub use tidyq_engine as engine;
pub use tidyq_engine::{Collect, Dispatcher, Engine, EngineConfig, collect, show_query};
pub use tidyq_expr as expr;
pub use tidyq_expr::{Expr, PLACEHOLDER, col, lit};
pub use tidyq_frame as frame;
pub use tidyq_frame::{Column, ColumnData, Frame};
pub use tidyq_sql as sql;
pub use tidyq_sql::{SqlTable, SqliteConfig, SqliteConnection};
pub use tidyq_type::{BackendKind, Error, ErrorKind, Result, Type, Value, VerbKind};
pub use tidyq_verb as verb;
pub use tidyq_verb::{Chain, Pipeline, Verb};

/// Everything a query needs in scope.
pub mod prelude {
	pub use tidyq_engine::Collect;
	pub use tidyq_expr::{PLACEHOLDER, case_when, coalesce, col, desc, if_else, lit, n, row_number};
	pub use tidyq_frame::{Column, ColumnData, Frame};
	pub use tidyq_sql::{SqlTable, SqliteConnection};
	pub use tidyq_type::{Type, Value};
	pub use tidyq_verb::{
		Pipeline, anti_join, arrange, col_range, contains, count, count_with, distinct, distinct_keep_all, ends_with,
		filter, full_join, group_by, group_by_add, group_by_named, head, inner_join, left_join, mutate, rename, right_join,
		select, semi_join, starts_with, summarize, transmute, ungroup,
	};
}

#[cfg(test)]
mod tests {
	use super::prelude::*;

	#[test]
	fn test_chain_applies_to_both_sources() {
		let frame = Frame::new(vec![Column::int8("x", [1, 2, 3, 4])]).unwrap();
		let chain = filter([col("x").gt(1)]) >> mutate([("y", col("x") * 2)]);

		let eager = (frame.clone() >> chain.clone()).collect().unwrap();
		let table = SqlTable::create(SqliteConnection::in_memory().unwrap(), "t", &frame).unwrap();
		let sql = (table >> chain).collect().unwrap();
		assert_eq!(eager, sql);
	}

	#[test]
	fn test_show_query() {
		let frame = Frame::new(vec![Column::int8("x", [1, 2])]).unwrap();
		let table = SqlTable::create(SqliteConnection::in_memory().unwrap(), "t", &frame).unwrap();
		let pipeline = table >> head(1);
		assert_eq!(pipeline.show_query().unwrap(), r#"SELECT "x" FROM "t" LIMIT 1"#);
	}
}
