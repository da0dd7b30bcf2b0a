// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tidyq_type::Value;

use crate::function;

/// The row placeholder every column reference starts from.
pub const PLACEHOLDER: Expr = Expr::Placeholder;

/// `_.name`
pub fn col(name: impl Into<String>) -> Expr {
	PLACEHOLDER.attr(name)
}

pub fn lit(value: impl Into<Value>) -> Expr {
	Expr::Literal(value.into())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
	Placeholder,
	Attr {
		of: Box<Expr>,
		name: String,
	},
	Index {
		of: Box<Expr>,
		key: String,
	},
	/// Method calls carry their receiver as the first argument.
	Call {
		name: String,
		args: Vec<Expr>,
	},
	Binary {
		op: BinaryOp,
		left: Box<Expr>,
		right: Box<Expr>,
	},
	Unary {
		op: UnaryOp,
		operand: Box<Expr>,
	},
	Literal(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
	Add,
	Sub,
	Mul,
	Div,
	Rem,
	Eq,
	Ne,
	Lt,
	Le,
	Gt,
	Ge,
	And,
	Or,
}

impl BinaryOp {
	pub fn is_arithmetic(&self) -> bool {
		matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem)
	}

	pub fn is_comparison(&self) -> bool {
		matches!(self, BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
	}

	pub fn is_logical(&self) -> bool {
		matches!(self, BinaryOp::And | BinaryOp::Or)
	}

	pub fn symbol(&self) -> &'static str {
		match self {
			BinaryOp::Add => "+",
			BinaryOp::Sub => "-",
			BinaryOp::Mul => "*",
			BinaryOp::Div => "/",
			BinaryOp::Rem => "%",
			BinaryOp::Eq => "==",
			BinaryOp::Ne => "!=",
			BinaryOp::Lt => "<",
			BinaryOp::Le => "<=",
			BinaryOp::Gt => ">",
			BinaryOp::Ge => ">=",
			BinaryOp::And => "&",
			BinaryOp::Or => "|",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
	Neg,
	Not,
}

impl Expr {
	pub fn attr(self, name: impl Into<String>) -> Expr {
		Expr::Attr {
			of: Box::new(self),
			name: name.into(),
		}
	}

	pub fn index(self, key: impl Into<String>) -> Expr {
		Expr::Index {
			of: Box::new(self),
			key: key.into(),
		}
	}

	/// Generic method call; the receiver becomes the first argument.
	pub fn call(self, name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Expr {
		let mut all = vec![self];
		all.extend(args);
		Expr::Call {
			name: name.into(),
			args: all,
		}
	}

	pub(crate) fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Expr {
		Expr::Binary {
			op,
			left: Box::new(self),
			right: Box::new(right.into()),
		}
	}

	pub(crate) fn unary(self, op: UnaryOp) -> Expr {
		Expr::Unary {
			op,
			operand: Box::new(self),
		}
	}

	/// The column name when this is a direct reference (`_.x` or `_["x"]`).
	pub fn column_name(&self) -> Option<&str> {
		match self {
			Expr::Attr {
				of,
				name,
			} if matches!(**of, Expr::Placeholder) => Some(name),
			Expr::Index {
				of,
				key,
			} if matches!(**of, Expr::Placeholder) => Some(key),
			_ => None,
		}
	}

	pub fn is_literal(&self) -> bool {
		matches!(self, Expr::Literal(_))
	}

	/// Column names referenced anywhere in the tree, in first-appearance order.
	pub fn op_vars(&self) -> Vec<String> {
		let mut result = IndexSet::new();
		self.collect_vars(&mut result);
		result.into_iter().collect()
	}

	fn collect_vars(&self, out: &mut IndexSet<String>) {
		if let Some(name) = self.column_name() {
			out.insert(name.to_string());
			return;
		}
		for child in self.children() {
			child.collect_vars(out);
		}
	}

	pub fn children(&self) -> Vec<&Expr> {
		match self {
			Expr::Placeholder | Expr::Literal(_) => vec![],
			Expr::Attr {
				of,
				..
			}
			| Expr::Index {
				of,
				..
			} => vec![of.as_ref()],
			Expr::Call {
				args,
				..
			} => args.iter().collect(),
			Expr::Binary {
				left,
				right,
				..
			} => vec![left.as_ref(), right.as_ref()],
			Expr::Unary {
				operand,
				..
			} => vec![operand.as_ref()],
		}
	}

	/// Rebuilds the tree bottom-up, letting `f` replace any node first.
	pub fn transform(&self, f: &mut impl FnMut(&Expr) -> Option<Expr>) -> Expr {
		if let Some(replaced) = f(self) {
			return replaced;
		}
		match self {
			Expr::Placeholder | Expr::Literal(_) => self.clone(),
			Expr::Attr {
				of,
				name,
			} => Expr::Attr {
				of: Box::new(of.transform(f)),
				name: name.clone(),
			},
			Expr::Index {
				of,
				key,
			} => Expr::Index {
				of: Box::new(of.transform(f)),
				key: key.clone(),
			},
			Expr::Call {
				name,
				args,
			} => Expr::Call {
				name: name.clone(),
				args: args.iter().map(|a| a.transform(f)).collect(),
			},
			Expr::Binary {
				op,
				left,
				right,
			} => Expr::Binary {
				op: *op,
				left: Box::new(left.transform(f)),
				right: Box::new(right.transform(f)),
			},
			Expr::Unary {
				op,
				operand,
			} => Expr::Unary {
				op: *op,
				operand: Box::new(operand.transform(f)),
			},
		}
	}
}

impl Display for Expr {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Expr::Placeholder => f.write_str("_"),
			Expr::Attr {
				of,
				name,
			} => write!(f, "{}.{}", of, name),
			Expr::Index {
				of,
				key,
			} => write!(f, "{}[\"{}\"]", of, key),
			Expr::Call {
				name,
				args,
			} => {
				let free = function::lookup(name).map(|s| s.free).unwrap_or(false);
				let (head, rest) = match args.split_first() {
					Some((receiver, rest)) if !free => (Some(receiver), rest),
					_ => (None, args.as_slice()),
				};
				if let Some(receiver) = head {
					write!(f, "{}.", receiver)?;
				}
				write!(f, "{}(", name)?;
				for (i, arg) in rest.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", arg)?;
				}
				f.write_str(")")
			}
			Expr::Binary {
				op,
				left,
				right,
			} => {
				write_operand(f, left)?;
				write!(f, " {} ", op.symbol())?;
				write_operand(f, right)
			}
			Expr::Unary {
				op: UnaryOp::Neg,
				operand,
			} => {
				f.write_str("-")?;
				write_operand(f, operand)
			}
			Expr::Unary {
				op: UnaryOp::Not,
				operand,
			} => {
				f.write_str("~")?;
				write_operand(f, operand)
			}
			Expr::Literal(Value::Utf8(s)) => write!(f, "'{}'", s),
			Expr::Literal(value) => write!(f, "{}", value),
		}
	}
}

fn write_operand(f: &mut Formatter<'_>, expr: &Expr) -> fmt::Result {
	match expr {
		Expr::Binary {
			..
		} => write!(f, "({})", expr),
		_ => write!(f, "{}", expr),
	}
}

impl From<Value> for Expr {
	fn from(value: Value) -> Self {
		Expr::Literal(value)
	}
}

macro_rules! impl_from_literal {
	($($t:ty),*) => {
		$(
			impl From<$t> for Expr {
				fn from(value: $t) -> Self {
					Expr::Literal(Value::from(value))
				}
			}
		)*
	};
}

impl_from_literal!(bool, i32, i64, f64, &str, String);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_column_name() {
		assert_eq!(col("x").column_name(), Some("x"));
		assert_eq!(PLACEHOLDER.index("a b").column_name(), Some("a b"));
		assert_eq!(col("x").attr("y").column_name(), None);
		assert_eq!(PLACEHOLDER.column_name(), None);
	}

	#[test]
	fn test_display_dsl_notation() {
		let expr = col("x") - col("x").call("mean", []);
		assert_eq!(expr.to_string(), "_.x - _.x.mean()");

		let expr = (col("a") + 1) * col("b");
		assert_eq!(expr.to_string(), "(_.a + 1) * _.b");

		assert_eq!(PLACEHOLDER.index("y").to_string(), "_[\"y\"]");
		assert_eq!(lit("a").to_string(), "'a'");
	}

	#[test]
	fn test_op_vars_order_and_dedup() {
		let expr = col("b") + col("a") * col("b");
		assert_eq!(expr.op_vars(), vec!["b".to_string(), "a".to_string()]);
	}

	#[test]
	fn test_literal_has_no_vars() {
		assert!(lit(1).op_vars().is_empty());
	}

	#[test]
	fn test_transform_replaces_columns() {
		let expr = col("x") + col("y");
		let replaced = expr.transform(&mut |e| match e.column_name() {
			Some("x") => Some(lit(10)),
			_ => None,
		});
		assert_eq!(replaced, lit(10) + col("y"));
	}

	#[test]
	fn test_construction_is_pure() {
		let base = col("x");
		let a = base.clone() + 1;
		let b = base.clone() * 2;
		assert_eq!(base, col("x"));
		assert_ne!(a, b);
	}

	#[test]
	fn test_serde() {
		let expr = col("x").call("cumsum", []) + lit(1.5);
		let json = serde_json::to_string(&expr).unwrap();
		let back: Expr = serde_json::from_str(&json).unwrap();
		assert_eq!(back, expr);
	}
}
