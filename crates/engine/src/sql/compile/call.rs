// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{ClassifyError, Expr};
use tidyq_sql::{SqlBinaryOp, SqlColumn, SqlExpr};
use tidyq_type::{Type, Value};

use super::Compiler;
use crate::args::{int_argument, literal_values, str_argument, type_argument};

impl Compiler<'_> {
	pub(super) fn call(&self, expr: &Expr, name: &str, args: &[Expr]) -> crate::Result<SqlColumn> {
		match name {
			"if_else" => {
				let condition = self.condition(self.argument(expr, args, 0)?)?;
				let then = self.compile(self.argument(expr, args, 1)?)?;
				let otherwise = self.compile(self.argument(expr, args, 2)?)?;
				self.case(expr, vec![(condition, then)], otherwise)
			}
			"case_when" => {
				let Some((default, cases)) = args.split_last() else {
					return Err(self.ctx.invalid_argument(expr, "case_when needs a default"));
				};
				if cases.len() % 2 != 0 {
					return Err(self.ctx.invalid_argument(expr, "case_when needs (condition, value) pairs"));
				}
				let cases = cases
					.chunks(2)
					.map(|pair| Ok((self.condition(&pair[0])?, self.compile(&pair[1])?)))
					.collect::<crate::Result<Vec<_>>>()?;
				let default = self.compile(default)?;
				self.case(expr, cases, default)
			}
			"coalesce" => {
				let compiled = args.iter().map(|arg| self.compile(arg)).collect::<crate::Result<Vec<_>>>()?;
				let ty = self.common_type(expr, compiled.iter().map(|c| c.ty))?;
				let mut exprs: Vec<SqlExpr> = compiled.into_iter().map(|c| c.expr).collect();
				// sqlite rejects COALESCE with a single argument
				let compiled = match exprs.len() {
					1 => exprs.remove(0),
					_ => SqlExpr::function("COALESCE", exprs),
				};
				Ok(SqlColumn::new(compiled, ty))
			}
			"desc" => Err(self.ctx.invalid_argument(expr, "desc() only orders arrange keys")),
			_ => self.method(expr, name, args),
		}
	}

	fn method(&self, expr: &Expr, name: &str, args: &[Expr]) -> crate::Result<SqlColumn> {
		let receiver = self.compile(self.argument(expr, args, 0)?)?;
		let ty = receiver.ty;
		let numeric = ty.is_number() || ty == Type::Undefined;
		let text = ty == Type::Utf8 || ty == Type::Undefined;
		let unsupported = || self.ctx.unsupported_type(expr, name, ty);

		let (compiled, ty) = match name {
			"abs" if numeric => (SqlExpr::function("ABS", vec![receiver.expr]), ty),
			"round" if numeric => {
				let digits = int_argument(self.ctx, expr, args, 1, 0)?;
				(SqlExpr::function("ROUND", vec![receiver.expr.cast(Type::Float8), SqlExpr::literal(digits)]), Type::Float8)
			}
			"astype" => {
				let target = type_argument(self.ctx, expr, args)?;
				(self.cast(expr, receiver, target)?, target)
			}
			"is_null" | "not_null" => (
				SqlExpr::IsNull {
					expr: Box::new(receiver.expr),
					negated: name == "not_null",
				},
				Type::Boolean,
			),
			"isin" => {
				let candidates = literal_values(self.ctx, expr, &args[1..])?;
				(
					SqlExpr::InList {
						expr: Box::new(receiver.expr),
						list: candidates.into_iter().map(SqlExpr::Literal).collect(),
					},
					Type::Boolean,
				)
			}
			"upper" if text => (SqlExpr::function("UPPER", vec![receiver.expr]), Type::Utf8),
			"lower" if text => (SqlExpr::function("LOWER", vec![receiver.expr]), Type::Utf8),
			"len" if text => (SqlExpr::function("LENGTH", vec![receiver.expr]), Type::Int8),
			"startswith" | "endswith" if text => {
				let affix = str_argument(self.ctx, expr, args, 1)?;
				(affix_test(receiver.expr, affix, name == "startswith"), Type::Boolean)
			}
			"abs" | "round" | "upper" | "lower" | "len" | "startswith" | "endswith" => return Err(unsupported()),
			_ => {
				return Err(self.ctx.classify_error(ClassifyError::UnknownOperation {
					name: name.to_string(),
					expression: expr.to_string(),
				}));
			}
		};
		Ok(SqlColumn::new(compiled, ty))
	}

	fn case(&self, expr: &Expr, cases: Vec<(SqlColumn, SqlColumn)>, default: SqlColumn) -> crate::Result<SqlColumn> {
		let ty = self.common_type(expr, cases.iter().map(|(_, v)| v.ty).chain([default.ty]))?;
		Ok(SqlColumn::new(
			SqlExpr::Case {
				cases: cases.into_iter().map(|(c, v)| (c.expr, v.expr)).collect(),
				default: Some(Box::new(default.expr)),
			},
			ty,
		))
	}

	// the type every branch promotes to
	fn common_type(&self, expr: &Expr, types: impl IntoIterator<Item = Type>) -> crate::Result<Type> {
		let mut result = Type::Undefined;
		for ty in types {
			result = Type::promote(result, ty).ok_or_else(|| self.ctx.type_mismatch(expr, result, ty))?;
		}
		Ok(result)
	}

	fn cast(&self, expr: &Expr, from: SqlColumn, to: Type) -> crate::Result<SqlExpr> {
		Ok(match (from.ty, to) {
			(from_ty, to) if from_ty == to => from.expr,
			(_, Type::Undefined) => return Err(self.ctx.invalid_argument(expr, "cannot cast to undefined")),
			(Type::Boolean, Type::Utf8) => SqlExpr::Case {
				cases: vec![
					(from.expr.clone(), SqlExpr::literal("true")),
					(
						SqlExpr::Unary {
							op: tidyq_sql::SqlUnaryOp::Not,
							operand: Box::new(from.expr),
						},
						SqlExpr::literal("false"),
					),
				],
				default: None,
			},
			(Type::Int8 | Type::Float8, Type::Boolean) => from.expr.binary(SqlBinaryOp::NotEq, SqlExpr::literal(0)),
			(Type::Utf8, Type::Boolean) => {
				return Err(self.ctx.unsupported_expression(expr, "text cannot be cast to a boolean"));
			}
			(_, to) => from.expr.cast(to),
		})
	}
}

// `SUBSTR` keeps the comparison in characters, like the in-memory kernels
fn affix_test(receiver: SqlExpr, affix: &str, prefix: bool) -> SqlExpr {
	let len = affix.chars().count() as i64;
	if len == 0 {
		// every defined string matches an empty affix
		return SqlExpr::function("LENGTH", vec![receiver]).binary(SqlBinaryOp::GtEq, SqlExpr::literal(0));
	}
	let slice = if prefix {
		SqlExpr::function("SUBSTR", vec![receiver, SqlExpr::literal(1), SqlExpr::literal(len)])
	} else {
		SqlExpr::function("SUBSTR", vec![receiver, SqlExpr::literal(-len)])
	};
	slice.binary(SqlBinaryOp::Eq, SqlExpr::Literal(Value::utf8(affix)))
}
