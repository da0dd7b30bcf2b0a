// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use tidyq_sql::{FromClause, JoinKind, OrderBy, Select, SqlBinaryOp, SqlColumn, SqlExpr};
use tidyq_type::{BackendKind, Type, VerbKind};
use tidyq_verb::{JoinHow, Pipeline, Verb};

use super::{SqlQuery, carry_order, subquery};
use crate::{Dispatcher, Relation, context::Context, join::JoinLayout};

const LEFT: &str = "lhs";
const RIGHT: &str = "rhs";

pub(crate) fn join(dispatcher: &Dispatcher, mut input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Join, BackendKind::Sql);
	let Verb::Join {
		right,
		on,
		how,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};

	let right = right_query(&ctx, dispatcher, &input, right)?;
	let (left_schema, right_schema) = (schema(&input.select), schema(&right.select));
	let layout = JoinLayout::new(&ctx, &left_schema, &right_schema, on)?;
	let coalesce_keys = matches!(how, JoinHow::Right | JoinHow::Full);
	let type_of = |schema: &[(String, Type)], name: &str| {
		schema.iter().find(|(n, _)| n == name).map_or(Type::Undefined, |(_, ty)| *ty)
	};

	let mut columns = IndexMap::with_capacity(layout.left.len() + layout.right.len());
	for column in &layout.left {
		let ty = type_of(&left_schema, &column.source);
		let definition = match (&column.key, coalesce_keys) {
			// the left key is undefined on rows only the right side has
			(Some(key), true) => {
				let other = type_of(&right_schema, key);
				SqlColumn::new(
					SqlExpr::function(
						"COALESCE",
						vec![SqlExpr::qualified(LEFT, &column.source), SqlExpr::qualified(RIGHT, key)],
					),
					if ty == other { ty } else { Type::promote(ty, other).unwrap_or(ty) },
				)
			}
			_ => SqlColumn::new(SqlExpr::qualified(LEFT, &column.source), ty),
		};
		columns.insert(column.output.clone(), definition);
	}
	for column in &layout.right {
		let ty = type_of(&right_schema, &column.source);
		columns.insert(column.output.clone(), SqlColumn::new(SqlExpr::qualified(RIGHT, &column.source), ty));
	}

	let kind = match how {
		JoinHow::Inner => JoinKind::Inner,
		JoinHow::Left => JoinKind::Left,
		JoinHow::Right => JoinKind::Right,
		JoinHow::Full => JoinKind::Full,
	};
	let mut select = Select::new(FromClause::Join {
		left: Box::new(subquery(input.select.clone(), LEFT)),
		right: Box::new(subquery(right.select, RIGHT)),
		kind,
		on: on.iter().map(|(l, r)| (SqlExpr::qualified(LEFT, l), SqlExpr::qualified(RIGHT, r))).collect(),
	});
	select.columns = columns;
	input.select = select;
	Ok(input)
}

pub(crate) fn semi_join(dispatcher: &Dispatcher, input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::SemiJoin, BackendKind::Sql);
	let Verb::SemiJoin {
		right,
		on,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};
	filter_join(&ctx, dispatcher, input, right, on, true)
}

pub(crate) fn anti_join(dispatcher: &Dispatcher, input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::AntiJoin, BackendKind::Sql);
	let Verb::AntiJoin {
		right,
		on,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};
	filter_join(&ctx, dispatcher, input, right, on, false)
}

// `WHERE [NOT] EXISTS (..)` over the left query; its columns and row order
// pass through
fn filter_join(
	ctx: &Context,
	dispatcher: &Dispatcher,
	mut input: SqlQuery,
	right: &Pipeline,
	on: &[(String, String)],
	keep_matched: bool,
) -> crate::Result<SqlQuery> {
	let right = right_query(ctx, dispatcher, &input, right)?;
	JoinLayout::new(ctx, &schema(&input.select), &schema(&right.select), on)?;

	let mut matches = Select::new(subquery(right.select, RIGHT));
	matches.columns.insert("one".to_string(), SqlColumn::new(SqlExpr::literal(1), Type::Int8));
	for (l, r) in on {
		matches.and_where(SqlExpr::qualified(LEFT, l).binary(SqlBinaryOp::Eq, SqlExpr::qualified(RIGHT, r)));
	}

	let mut left = input.select.clone();
	let (order, _) = carry_order(&mut left);
	let mut select = Select::new(subquery(left, LEFT));
	for (name, column) in &input.select.columns {
		select.columns.insert(name.clone(), SqlColumn::new(SqlExpr::qualified(LEFT, name), column.ty));
	}
	select.and_where(SqlExpr::Exists {
		query: Box::new(matches),
		negated: !keep_matched,
	});
	select.order_by = order
		.into_iter()
		.filter_map(|order| match order.expr {
			SqlExpr::Column {
				name,
				..
			} => Some(OrderBy {
				expr: SqlExpr::qualified(LEFT, name),
				descending: order.descending,
			}),
			_ => None,
		})
		.collect();
	input.select = select;
	Ok(input)
}

// the right pipeline has to build a query against the same database
fn right_query(ctx: &Context, dispatcher: &Dispatcher, left: &SqlQuery, right: &Pipeline) -> crate::Result<SqlQuery> {
	match dispatcher.run(right)? {
		Relation::Sql(query) if query.table().connection().same_connection(left.table().connection()) => Ok(query),
		Relation::Sql(_) => Err(ctx.execution_failed("both sides of a SQL join must live on the same connection")),
		other => Err(ctx.execution_failed(format!(
			"a SQL query can only be joined with another SQL query, not a {} relation",
			other.backend()
		))),
	}
}

fn schema(select: &Select) -> Vec<(String, Type)> {
	select.columns.iter().map(|(name, column)| (name.clone(), column.ty)).collect()
}

#[cfg(test)]
mod tests {
	use tidyq_expr::col;
	use tidyq_frame::{Column, ColumnData, Frame};
	use tidyq_sql::{SqlTable, SqliteConnection};
	use tidyq_type::ErrorKind;
	use tidyq_verb::{anti_join, arrange, full_join, inner_join, left_join, right_join, semi_join as semi_join_verb};

	use super::*;

	fn tables() -> (SqlQuery, SqlTable) {
		let connection = SqliteConnection::in_memory().unwrap();
		let left = Frame::new(vec![Column::int8("id", [1, 2, 3, 4]), Column::utf8("v", ["a", "b", "c", "d"])]).unwrap();
		let right =
			Frame::new(vec![Column::int8("id", [2, 3, 3, 5]), Column::utf8("v", ["B", "C", "CC", "E"])]).unwrap();
		let left = SqlTable::create(connection.clone(), "l", &left).unwrap();
		let right = SqlTable::create(connection, "r", &right).unwrap();
		(SqlQuery::new(left), right)
	}

	// runs the verb built from the right table, then sorts by id
	fn joined(verb: impl FnOnce(SqlTable) -> Verb) -> Frame {
		let (left, right) = tables();
		let verb = verb(right);
		let dispatcher = Dispatcher::empty();
		let result = match &verb {
			Verb::Join {
				..
			} => join(&dispatcher, left, &verb),
			Verb::SemiJoin {
				..
			} => semi_join(&dispatcher, left, &verb),
			_ => super::anti_join(&dispatcher, left, &verb),
		}
		.unwrap();
		let sorted = super::super::arrange::arrange(&dispatcher, result, &arrange([col("id")])).unwrap();
		sorted.fetch().unwrap()
	}

	#[test]
	fn test_inner_join_suffixes() {
		let (left, right) = tables();
		let result = join(&Dispatcher::empty(), left, &inner_join(right, [("id", "id")])).unwrap();
		assert_eq!(
			result.sql(),
			r#"SELECT "lhs"."id" AS "id", "lhs"."v" AS "v_x", "rhs"."v" AS "v_y" FROM (SELECT "id", "v" FROM "l") AS "lhs" INNER JOIN (SELECT "id", "v" FROM "r") AS "rhs" ON "lhs"."id" = "rhs"."id""#
		);
		let frame = joined(|right| inner_join(right, [("id", "id")]));
		assert_eq!(frame.try_column("id").unwrap().data, ColumnData::int8([2, 3, 3]));
	}

	#[test]
	fn test_left_join() {
		let frame = joined(|right| left_join(right, [("id", "id")]));
		assert_eq!(frame.row_count(), 5);
		assert_eq!(frame.try_column("v_y").unwrap().data.get(0), tidyq_type::Value::Undefined);
	}

	#[test]
	fn test_right_join_coalesces_keys() {
		let frame = joined(|right| right_join(right, [("id", "id")]));
		assert_eq!(frame.try_column("id").unwrap().data, ColumnData::int8([2, 3, 3, 5]));
	}

	#[test]
	fn test_full_join() {
		let frame = joined(|right| full_join(right, [("id", "id")]));
		assert_eq!(frame.try_column("id").unwrap().data, ColumnData::int8([1, 2, 3, 3, 4, 5]));
	}

	#[test]
	fn test_semi_and_anti() {
		let frame = joined(|right| semi_join_verb(right, [("id", "id")]));
		assert_eq!(frame.column_names(), vec!["id", "v"]);
		assert_eq!(frame.try_column("v").unwrap().data, ColumnData::utf8(["b", "c"]));

		let frame = joined(|right| anti_join(right, [("id", "id")]));
		assert_eq!(frame.try_column("v").unwrap().data, ColumnData::utf8(["a", "d"]));
	}

	#[test]
	fn test_semi_join_keeps_order() {
		let (mut left, right) = tables();
		left.select.order_by.push(OrderBy::desc(SqlExpr::column("id")));
		let result = semi_join(&Dispatcher::empty(), left, &semi_join_verb(right, [("id", "id")])).unwrap();
		assert!(result.sql().ends_with(r#"ORDER BY "lhs"."id" DESC NULLS LAST"#));
		assert_eq!(result.fetch().unwrap().try_column("id").unwrap().data, ColumnData::int8([3, 2]));
	}

	#[test]
	fn test_other_connection_fails() {
		let (left, _) = tables();
		let (_, elsewhere) = tables();
		let err = join(&Dispatcher::empty(), left, &inner_join(elsewhere, [("id", "id")])).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::BackendExecution);
	}

	#[test]
	fn test_eager_right_side_fails() {
		let (left, _) = tables();
		let frame = Frame::new(vec![Column::int8("id", [1])]).unwrap();
		let err = join(&Dispatcher::empty(), left, &inner_join(frame, [("id", "id")])).unwrap_err();
		assert_eq!(err.code, "BACKEND_001");
	}
}
