// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{Expr, UnaryOp};
use tidyq_frame::SortDirection;
use tidyq_type::{Type, Value};

use crate::context::Context;

/// Splits an `arrange` key into the expression to sort by and its direction.
pub(crate) fn sort_key(expr: &Expr) -> (&Expr, SortDirection) {
	match expr {
		Expr::Call {
			name,
			args,
		} if name == "desc" && args.len() == 1 => (&args[0], SortDirection::Desc),
		Expr::Unary {
			op: UnaryOp::Neg,
			operand,
		} => (operand, SortDirection::Desc),
		other => (other, SortDirection::Asc),
	}
}

pub(crate) fn literal<'a>(ctx: &Context, call: &Expr, arg: &'a Expr) -> crate::Result<&'a Value> {
	match arg {
		Expr::Literal(value) => Ok(value),
		other => Err(ctx.invalid_argument(call, format!("'{other}' must be a literal"))),
	}
}

pub(crate) fn int_argument(ctx: &Context, call: &Expr, args: &[Expr], index: usize, default: i64) -> crate::Result<i64> {
	let Some(arg) = args.get(index) else {
		return Ok(default);
	};
	match literal(ctx, call, arg)? {
		Value::Int8(value) => Ok(*value),
		other => Err(ctx.invalid_argument(call, format!("expected an integer, got '{other}'"))),
	}
}

/// The row offset of `lag`/`lead`, one when omitted.
pub(crate) fn offset_argument(ctx: &Context, call: &Expr, args: &[Expr]) -> crate::Result<usize> {
	let offset = int_argument(ctx, call, args, 1, 1)?;
	usize::try_from(offset).map_err(|_| ctx.invalid_argument(call, format!("offset must not be negative, got {offset}")))
}

pub(crate) fn str_argument<'a>(ctx: &Context, call: &Expr, args: &'a [Expr], index: usize) -> crate::Result<&'a str> {
	let arg = args.get(index).ok_or_else(|| ctx.invalid_argument(call, "missing text argument"))?;
	match literal(ctx, call, arg)? {
		Value::Utf8(value) => Ok(value),
		other => Err(ctx.invalid_argument(call, format!("expected text, got '{other}'"))),
	}
}

/// The target type of `astype`.
pub(crate) fn type_argument(ctx: &Context, call: &Expr, args: &[Expr]) -> crate::Result<Type> {
	str_argument(ctx, call, args, 1)?.parse::<Type>().map_err(|reason| ctx.invalid_argument(call, reason))
}

/// The candidates of `isin`, every one a literal.
pub(crate) fn literal_values(ctx: &Context, call: &Expr, args: &[Expr]) -> crate::Result<Vec<Value>> {
	args.iter().map(|arg| literal(ctx, call, arg).cloned()).collect()
}

#[cfg(test)]
mod tests {
	use tidyq_expr::{col, desc, lit};
	use tidyq_type::{BackendKind, VerbKind};

	use super::*;

	fn ctx() -> Context {
		Context::new(VerbKind::Mutate, BackendKind::Eager)
	}

	#[test]
	fn test_sort_key() {
		assert_eq!(sort_key(&col("x")), (&col("x"), SortDirection::Asc));
		assert_eq!(sort_key(&-col("x")), (&col("x"), SortDirection::Desc));
		assert_eq!(sort_key(&desc(col("x"))), (&col("x"), SortDirection::Desc));
	}

	#[test]
	fn test_offset_argument() {
		let call = col("x").lag(2);
		let Expr::Call {
			args,
			..
		} = &call
		else {
			panic!("expected call");
		};
		assert_eq!(offset_argument(&ctx(), &call, args).unwrap(), 2);
		assert_eq!(offset_argument(&ctx(), &call, &args[..1]).unwrap(), 1);

		let negative = col("x").lag(-1);
		let Expr::Call {
			args,
			..
		} = &negative
		else {
			panic!("expected call");
		};
		assert_eq!(offset_argument(&ctx(), &negative, args).unwrap_err().code, "RESOLVE_006");
	}

	#[test]
	fn test_literal_required() {
		let call = col("x").call("round", [col("y")]);
		let Expr::Call {
			args,
			..
		} = &call
		else {
			panic!("expected call");
		};
		let err = int_argument(&ctx(), &call, args, 1, 0).unwrap_err();
		assert_eq!(err.code, "RESOLVE_006");
		assert!(literal_values(&ctx(), &call, &[lit(1), lit("a")]).is_ok());
	}

	#[test]
	fn test_type_argument() {
		let call = col("x").astype(Type::Float8);
		let Expr::Call {
			args,
			..
		} = &call
		else {
			panic!("expected call");
		};
		assert_eq!(type_argument(&ctx(), &call, args).unwrap(), Type::Float8);
	}
}
