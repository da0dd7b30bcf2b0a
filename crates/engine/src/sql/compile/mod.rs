// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use tidyq_expr::{Classifier, Expr};
use tidyq_sql::{Dialect, OrderBy, SqlColumn, SqlExpr};
use tidyq_type::Type;

use crate::context::Context;

mod call;
mod operator;
mod window;

/// Where aggregates land: as window functions over the partition, or as
/// plain aggregates of a `GROUP BY` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
	Window,
	Aggregate,
}

/// Translates expressions into SQL over a select list. A column reference
/// is replaced by the definition it has in that list, so the result is
/// valid against the list's `FROM` clause.
pub(crate) struct Compiler<'a> {
	ctx: &'a Context,
	columns: &'a IndexMap<String, SqlColumn>,
	dialect: &'a Dialect,
	mode: Mode,
	partition: Vec<SqlExpr>,
	order: Vec<OrderBy>,
}

impl<'a> Compiler<'a> {
	pub(crate) fn new(
		ctx: &'a Context,
		columns: &'a IndexMap<String, SqlColumn>,
		dialect: &'a Dialect,
		mode: Mode,
	) -> Self {
		Self {
			ctx,
			columns,
			dialect,
			mode,
			partition: vec![],
			order: vec![],
		}
	}

	pub(crate) fn with_window(mut self, partition: Vec<SqlExpr>, order: Vec<OrderBy>) -> Self {
		self.partition = partition;
		self.order = order;
		self
	}

	pub(crate) fn compile(&self, expr: &Expr) -> crate::Result<SqlColumn> {
		if Classifier::is_window(expr) {
			return self.window(expr);
		}
		if let Some(name) = expr.column_name() {
			return self.column(name);
		}
		match expr {
			Expr::Literal(value) => Ok(SqlColumn::new(SqlExpr::Literal(value.clone()), value.get_type())),
			Expr::Binary {
				op,
				left,
				right,
			} => self.binary(expr, *op, left, right),
			Expr::Unary {
				op,
				operand,
			} => self.unary(expr, *op, operand),
			Expr::Call {
				name,
				args,
			} => self.call(expr, name, args),
			Expr::Placeholder
			| Expr::Attr {
				..
			}
			| Expr::Index {
				..
			} => Err(self.ctx.invalid_argument(expr, "expected a column reference such as _.x")),
		}
	}

	/// Compiles a condition; it has to produce booleans.
	pub(crate) fn condition(&self, expr: &Expr) -> crate::Result<SqlColumn> {
		let compiled = self.compile(expr)?;
		match compiled.ty {
			Type::Boolean | Type::Undefined => Ok(compiled),
			other => Err(self.ctx.invalid_argument(expr, format!("a condition must be boolean, got {other}"))),
		}
	}

	fn column(&self, name: &str) -> crate::Result<SqlColumn> {
		self.columns
			.get(name)
			.cloned()
			.ok_or_else(|| self.ctx.column_not_found(name, self.columns.keys().cloned().collect()))
	}

	fn argument<'e>(&self, call: &'e Expr, args: &'e [Expr], index: usize) -> crate::Result<&'e Expr> {
		args.get(index).ok_or_else(|| self.ctx.invalid_argument(call, format!("missing argument {}", index + 1)))
	}

	// the dialect has to provide `function`, else the capability is missing
	fn require(&self, function: &str, capability: &str) -> crate::Result<()> {
		if self.dialect.supports_function(function) {
			Ok(())
		} else {
			Err(self.ctx.unsupported_capability(self.dialect.name(), capability))
		}
	}
}

#[cfg(test)]
mod tests {
	use tidyq_expr::{PLACEHOLDER, case_when, coalesce, col, if_else, lit, n, row_number};
	use tidyq_sql::Renderer;
	use tidyq_type::{BackendKind, VerbKind};

	use super::*;

	fn columns() -> IndexMap<String, SqlColumn> {
		let mut columns = IndexMap::new();
		columns.insert("x".to_string(), SqlColumn::new(SqlExpr::column("x"), Type::Int8));
		columns.insert("f".to_string(), SqlColumn::new(SqlExpr::column("f"), Type::Float8));
		columns.insert("g".to_string(), SqlColumn::new(SqlExpr::column("g"), Type::Utf8));
		columns.insert("b".to_string(), SqlColumn::new(SqlExpr::column("b"), Type::Boolean));
		columns.insert(
			"y".to_string(),
			SqlColumn::new(SqlExpr::column("x").binary(tidyq_sql::SqlBinaryOp::Add, SqlExpr::literal(1)), Type::Int8),
		);
		columns
	}

	fn ctx() -> Context {
		Context::new(VerbKind::Mutate, BackendKind::Sql)
	}

	fn compile_with(expr: Expr, mode: Mode, dialect: Dialect) -> crate::Result<(String, Type)> {
		let ctx = ctx();
		let columns = columns();
		let compiler = Compiler::new(&ctx, &columns, &dialect, mode)
			.with_window(vec![SqlExpr::column("g")], vec![OrderBy::asc(SqlExpr::column("x"))]);
		let compiled = compiler.compile(&expr)?;
		Ok((Renderer::new(&dialect).expr(&compiled.expr), compiled.ty))
	}

	fn compile(expr: Expr) -> crate::Result<(String, Type)> {
		compile_with(expr, Mode::Window, Dialect::sqlite())
	}

	fn sql(expr: Expr) -> String {
		compile(expr).unwrap().0
	}

	#[test]
	fn test_column_inlines_definition() {
		assert_eq!(compile(col("y") * 2).unwrap(), (r#"("x" + 1) * 2"#.to_string(), Type::Int8));
	}

	#[test]
	fn test_division_is_real() {
		assert_eq!(compile(col("x") / 2).unwrap(), (r#"CAST("x" AS REAL) / 2"#.to_string(), Type::Float8));
	}

	#[test]
	fn test_float_remainder_unsupported() {
		assert_eq!(compile(col("f") % 2).unwrap_err().code, "DISPATCH_003");
		assert_eq!(sql(col("x") % 2), r#""x" % 2"#);
	}

	#[test]
	fn test_type_errors() {
		assert_eq!(compile(col("g") + 1).unwrap_err().code, "RESOLVE_005");
		assert_eq!(compile(col("g").gt(1)).unwrap_err().code, "RESOLVE_005");
		assert_eq!(compile(col("nope")).unwrap_err().code, "RESOLVE_001");
		assert_eq!(compile(PLACEHOLDER).unwrap_err().code, "RESOLVE_006");
	}

	#[test]
	fn test_logic_and_unary() {
		assert_eq!(sql(col("b").and(col("x").gt(1))), r#""b" AND ("x" > 1)"#);
		assert_eq!(sql(!col("b")), r#"NOT ("b")"#);
		assert_eq!(sql(-col("x")), r#"-("x")"#);
	}

	#[test]
	fn test_scalar_calls() {
		assert_eq!(sql(col("x").abs()), r#"ABS("x")"#);
		assert_eq!(compile(col("x").round(1)).unwrap().1, Type::Float8);
		assert_eq!(sql(col("x").is_null()), r#"("x" IS NULL)"#);
		assert_eq!(sql(col("x").isin([1, 2])), r#""x" IN (1, 2)"#);
		assert_eq!(sql(col("g").upper()), r#"UPPER("g")"#);
		assert_eq!(sql(col("g").len()), r#"LENGTH("g")"#);
		assert_eq!(sql(col("g").startswith("ab")), r#"SUBSTR("g", 1, 2) = 'ab'"#);
		assert_eq!(sql(col("g").endswith("ab")), r#"SUBSTR("g", -2) = 'ab'"#);
		assert_eq!(compile(col("x").astype(Type::Float8)).unwrap(), (r#"CAST("x" AS REAL)"#.to_string(), Type::Float8));
		assert_eq!(sql(col("f").astype(Type::Boolean)), r#""f" <> 0"#);
	}

	#[test]
	fn test_conditionals() {
		assert_eq!(
			sql(if_else(col("x").gt(1), lit("a"), lit("b"))),
			r#"CASE WHEN "x" > 1 THEN 'a' ELSE 'b' END"#
		);
		assert_eq!(
			sql(case_when([(col("x").lt(2), lit(1)), (col("x").lt(3), lit(2))], lit(3))),
			r#"CASE WHEN "x" < 2 THEN 1 WHEN "x" < 3 THEN 2 ELSE 3 END"#
		);
		assert_eq!(sql(coalesce([col("x"), lit(0)])), r#"COALESCE("x", 0)"#);
		assert_eq!(compile(if_else(col("b"), lit(1), lit("a"))).unwrap_err().code, "RESOLVE_005");
	}

	#[test]
	fn test_unknown_call() {
		assert_eq!(compile(col("x").call("frobnicate", [])).unwrap_err().code, "RESOLVE_002");
	}

	#[test]
	fn test_window_mode() {
		assert_eq!(
			compile(col("x").mean()).unwrap(),
			(r#"AVG("x") OVER (PARTITION BY "g")"#.to_string(), Type::Float8)
		);
		assert_eq!(
			sql(col("x").cumsum()),
			r#"SUM("x") OVER (PARTITION BY "g" ORDER BY "x" ASC NULLS LAST ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"#
		);
		assert_eq!(sql(row_number(PLACEHOLDER)), r#"ROW_NUMBER() OVER (PARTITION BY "g" ORDER BY "x" ASC NULLS LAST)"#);
		assert_eq!(
			sql(row_number(-col("f"))),
			r#"ROW_NUMBER() OVER (PARTITION BY "g" ORDER BY "f" DESC NULLS LAST)"#
		);
		assert_eq!(sql(col("f").rank()), r#"RANK() OVER (PARTITION BY "g" ORDER BY "f" ASC NULLS LAST)"#);
		assert_eq!(sql(col("f").lag(2)), r#"LAG("f", 2) OVER (PARTITION BY "g" ORDER BY "x" ASC NULLS LAST)"#);
		assert_eq!(sql(n(PLACEHOLDER)), r#"COUNT(*) OVER (PARTITION BY "g")"#);
	}

	#[test]
	fn test_aggregate_mode() {
		let compiled = compile_with(col("x").sum() + col("f").max(), Mode::Aggregate, Dialect::sqlite()).unwrap();
		assert_eq!(compiled.0, r#"SUM("x") + MAX("f")"#);
		assert_eq!(compiled.1, Type::Float8);
		let compiled = compile_with(col("g").nunique(), Mode::Aggregate, Dialect::sqlite()).unwrap();
		assert_eq!(compiled.0, r#"COUNT(DISTINCT "g")"#);
		let err = compile_with(col("x").cumsum(), Mode::Aggregate, Dialect::sqlite()).unwrap_err();
		assert_eq!(err.code, "RESOLVE_006");
	}

	#[test]
	fn test_missing_capabilities() {
		assert_eq!(compile(col("x").median()).unwrap_err().code, "DISPATCH_002");
		assert_eq!(compile(col("x").std()).unwrap_err().code, "DISPATCH_002");
		assert_eq!(compile(col("g").nunique()).unwrap_err().code, "DISPATCH_002");
		let err = compile_with(col("x").mean(), Mode::Window, Dialect::sqlite_legacy()).unwrap_err();
		assert_eq!(err.code, "DISPATCH_002");
	}

	#[test]
	fn test_condition_must_be_boolean() {
		let ctx = ctx();
		let columns = columns();
		let dialect = Dialect::sqlite();
		let compiler = Compiler::new(&ctx, &columns, &dialect, Mode::Window);
		assert!(compiler.condition(&col("x").gt(1)).is_ok());
		assert_eq!(compiler.condition(&(col("x") + 1)).unwrap_err().code, "RESOLVE_006");
	}
}
