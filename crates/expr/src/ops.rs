// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::ops::{Add, BitAnd, BitOr, Div, Mul, Neg, Not, Rem, Sub};

use tidyq_type::{Type, Value};

use crate::{BinaryOp, Expr, UnaryOp};

macro_rules! impl_binary_op {
	($trait:ident, $method:ident, $op:expr) => {
		impl<R: Into<Expr>> $trait<R> for Expr {
			type Output = Expr;

			fn $method(self, rhs: R) -> Expr {
				self.binary($op, rhs)
			}
		}

		impl $trait<Expr> for i64 {
			type Output = Expr;

			fn $method(self, rhs: Expr) -> Expr {
				Expr::from(self).binary($op, rhs)
			}
		}

		impl $trait<Expr> for i32 {
			type Output = Expr;

			fn $method(self, rhs: Expr) -> Expr {
				Expr::from(self).binary($op, rhs)
			}
		}

		impl $trait<Expr> for f64 {
			type Output = Expr;

			fn $method(self, rhs: Expr) -> Expr {
				Expr::from(self).binary($op, rhs)
			}
		}
	};
}

impl_binary_op!(Add, add, BinaryOp::Add);
impl_binary_op!(Sub, sub, BinaryOp::Sub);
impl_binary_op!(Mul, mul, BinaryOp::Mul);
impl_binary_op!(Div, div, BinaryOp::Div);
impl_binary_op!(Rem, rem, BinaryOp::Rem);

impl<R: Into<Expr>> BitAnd<R> for Expr {
	type Output = Expr;

	fn bitand(self, rhs: R) -> Expr {
		self.binary(BinaryOp::And, rhs)
	}
}

impl<R: Into<Expr>> BitOr<R> for Expr {
	type Output = Expr;

	fn bitor(self, rhs: R) -> Expr {
		self.binary(BinaryOp::Or, rhs)
	}
}

impl Neg for Expr {
	type Output = Expr;

	fn neg(self) -> Expr {
		self.unary(UnaryOp::Neg)
	}
}

impl Not for Expr {
	type Output = Expr;

	fn not(self) -> Expr {
		self.unary(UnaryOp::Not)
	}
}

impl Expr {
	pub fn eq(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Eq, rhs)
	}

	pub fn ne(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Ne, rhs)
	}

	pub fn lt(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Lt, rhs)
	}

	pub fn le(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Le, rhs)
	}

	pub fn gt(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Gt, rhs)
	}

	pub fn ge(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Ge, rhs)
	}

	pub fn and(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::And, rhs)
	}

	pub fn or(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Or, rhs)
	}

	// reductions

	pub fn sum(self) -> Expr {
		self.call("sum", [])
	}

	pub fn mean(self) -> Expr {
		self.call("mean", [])
	}

	pub fn min(self) -> Expr {
		self.call("min", [])
	}

	pub fn max(self) -> Expr {
		self.call("max", [])
	}

	pub fn count(self) -> Expr {
		self.call("count", [])
	}

	pub fn median(self) -> Expr {
		self.call("median", [])
	}

	pub fn std(self) -> Expr {
		self.call("std", [])
	}

	pub fn var(self) -> Expr {
		self.call("var", [])
	}

	pub fn nunique(self) -> Expr {
		self.call("nunique", [])
	}

	pub fn first(self) -> Expr {
		self.call("first", [])
	}

	pub fn last(self) -> Expr {
		self.call("last", [])
	}

	// order dependent

	pub fn cumsum(self) -> Expr {
		self.call("cumsum", [])
	}

	pub fn cummean(self) -> Expr {
		self.call("cummean", [])
	}

	pub fn cummin(self) -> Expr {
		self.call("cummin", [])
	}

	pub fn cummax(self) -> Expr {
		self.call("cummax", [])
	}

	pub fn rank(self) -> Expr {
		self.call("rank", [])
	}

	pub fn min_rank(self) -> Expr {
		self.call("min_rank", [])
	}

	pub fn dense_rank(self) -> Expr {
		self.call("dense_rank", [])
	}

	pub fn percent_rank(self) -> Expr {
		self.call("percent_rank", [])
	}

	pub fn lag(self, n: i64) -> Expr {
		self.call("lag", [Expr::from(n)])
	}

	pub fn lead(self, n: i64) -> Expr {
		self.call("lead", [Expr::from(n)])
	}

	// scalar

	pub fn abs(self) -> Expr {
		self.call("abs", [])
	}

	pub fn round(self, digits: i64) -> Expr {
		self.call("round", [Expr::from(digits)])
	}

	pub fn astype(self, ty: Type) -> Expr {
		self.call("astype", [Expr::Literal(Value::utf8(ty.to_string()))])
	}

	pub fn is_null(self) -> Expr {
		self.call("is_null", [])
	}

	pub fn not_null(self) -> Expr {
		self.call("not_null", [])
	}

	pub fn isin<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Expr {
		self.call("isin", values.into_iter().map(|v| Expr::Literal(v.into())))
	}

	pub fn upper(self) -> Expr {
		self.call("upper", [])
	}

	pub fn lower(self) -> Expr {
		self.call("lower", [])
	}

	pub fn len(self) -> Expr {
		self.call("len", [])
	}

	pub fn startswith(self, prefix: &str) -> Expr {
		self.call("startswith", [Expr::from(prefix)])
	}

	pub fn endswith(self, suffix: &str) -> Expr {
		self.call("endswith", [Expr::from(suffix)])
	}

	pub fn desc(self) -> Expr {
		crate::desc(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{PLACEHOLDER, col, lit};

	#[test]
	fn test_arithmetic_builds_binary() {
		let expr = col("a") + col("b");
		assert_eq!(
			expr,
			Expr::Binary {
				op: BinaryOp::Add,
				left: Box::new(col("a")),
				right: Box::new(col("b")),
			}
		);
	}

	#[test]
	fn test_scalar_on_left() {
		assert_eq!((1i64 - col("x")).to_string(), "1 - _.x");
		assert_eq!((2.5 * col("x")).to_string(), "2.5 * _.x");
	}

	#[test]
	fn test_comparison_and_logic() {
		let expr = col("x").gt(1) & !col("y").eq("a");
		assert_eq!(expr.to_string(), "(_.x > 1) & ~(_.y == 'a')");
	}

	#[test]
	fn test_method_chain() {
		let expr = PLACEHOLDER.attr("x").cumsum().astype(Type::Float8);
		assert_eq!(expr.to_string(), "_.x.cumsum().astype('FLOAT8')");
	}

	#[test]
	fn test_isin() {
		let expr = col("g").isin([1, 2]);
		assert_eq!(expr.to_string(), "_.g.isin(1, 2)");
		assert_eq!(expr.op_vars(), vec!["g".to_string()]);
	}

	#[test]
	fn test_negation() {
		assert_eq!((-col("x")).to_string(), "-_.x");
		assert_eq!((-(col("x") + lit(1))).to_string(), "-(_.x + 1)");
	}
}
