// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	fmt,
	fmt::{Display, Formatter},
};

use once_cell::sync::Lazy;

use crate::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionMode {
	// _.x.abs()
	Scalar,
	// _.x.mean(), reduces a group to one value
	Aggregate,
	// _.x.cumsum(), row aligned and order dependent
	Cumulative,
}

impl Display for FunctionMode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let label = match self {
			FunctionMode::Scalar => "Scalar",
			FunctionMode::Aggregate => "Aggregate",
			FunctionMode::Cumulative => "Cumulative",
		};
		write!(f, "{}", label)
	}
}

/// Registry entry. Argument counts include the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
	pub name: &'static str,
	pub mode: FunctionMode,
	pub min_args: usize,
	pub max_args: Option<usize>,
	/// Rendered as `name(args)` rather than `receiver.name(args)`.
	pub free: bool,
}

impl Signature {
	const fn method(name: &'static str, mode: FunctionMode, min_args: usize, max_args: Option<usize>) -> Self {
		Self {
			name,
			mode,
			min_args,
			max_args,
			free: false,
		}
	}

	const fn free(name: &'static str, mode: FunctionMode, min_args: usize, max_args: Option<usize>) -> Self {
		Self {
			name,
			mode,
			min_args,
			max_args,
			free: true,
		}
	}

	pub fn accepts(&self, count: usize) -> bool {
		count >= self.min_args && self.max_args.is_none_or(|max| count <= max)
	}
}

use FunctionMode::{Aggregate, Cumulative, Scalar};

const SIGNATURES: &[Signature] = &[
	// reducing
	Signature::method("sum", Aggregate, 1, Some(1)),
	Signature::method("mean", Aggregate, 1, Some(1)),
	Signature::method("min", Aggregate, 1, Some(1)),
	Signature::method("max", Aggregate, 1, Some(1)),
	Signature::method("count", Aggregate, 1, Some(1)),
	Signature::free("n", Aggregate, 1, Some(1)),
	Signature::method("median", Aggregate, 1, Some(1)),
	Signature::method("std", Aggregate, 1, Some(1)),
	Signature::method("var", Aggregate, 1, Some(1)),
	Signature::method("nunique", Aggregate, 1, Some(1)),
	Signature::method("first", Aggregate, 1, Some(1)),
	Signature::method("last", Aggregate, 1, Some(1)),
	// order dependent
	Signature::method("cumsum", Cumulative, 1, Some(1)),
	Signature::method("cummean", Cumulative, 1, Some(1)),
	Signature::method("cummin", Cumulative, 1, Some(1)),
	Signature::method("cummax", Cumulative, 1, Some(1)),
	Signature::method("cumcount", Cumulative, 1, Some(1)),
	Signature::free("row_number", Cumulative, 1, Some(1)),
	Signature::method("rank", Cumulative, 1, Some(1)),
	Signature::method("min_rank", Cumulative, 1, Some(1)),
	Signature::method("dense_rank", Cumulative, 1, Some(1)),
	Signature::method("percent_rank", Cumulative, 1, Some(1)),
	Signature::method("lag", Cumulative, 1, Some(2)),
	Signature::method("lead", Cumulative, 1, Some(2)),
	// scalar
	Signature::method("abs", Scalar, 1, Some(1)),
	Signature::method("round", Scalar, 1, Some(2)),
	Signature::method("astype", Scalar, 2, Some(2)),
	Signature::method("is_null", Scalar, 1, Some(1)),
	Signature::method("not_null", Scalar, 1, Some(1)),
	Signature::method("isin", Scalar, 1, None),
	Signature::method("upper", Scalar, 1, Some(1)),
	Signature::method("lower", Scalar, 1, Some(1)),
	Signature::method("len", Scalar, 1, Some(1)),
	Signature::method("startswith", Scalar, 2, Some(2)),
	Signature::method("endswith", Scalar, 2, Some(2)),
	Signature::free("if_else", Scalar, 3, Some(3)),
	Signature::free("case_when", Scalar, 1, None),
	Signature::free("coalesce", Scalar, 1, None),
	Signature::free("desc", Scalar, 1, Some(1)),
];

static FUNCTIONS: Lazy<HashMap<&'static str, Signature>> =
	Lazy::new(|| SIGNATURES.iter().map(|s| (s.name, *s)).collect());

pub fn lookup(name: &str) -> Option<&'static Signature> {
	FUNCTIONS.get(name)
}

/// Number of rows in the current group: `n(_)`.
pub fn n(of: Expr) -> Expr {
	Expr::Call {
		name: "n".to_string(),
		args: vec![of],
	}
}

/// `row_number(_)` numbers rows in the current order; `row_number(_.x)` orders by `x`.
pub fn row_number(of: Expr) -> Expr {
	Expr::Call {
		name: "row_number".to_string(),
		args: vec![of],
	}
}

pub fn if_else(condition: impl Into<Expr>, then: impl Into<Expr>, otherwise: impl Into<Expr>) -> Expr {
	Expr::Call {
		name: "if_else".to_string(),
		args: vec![condition.into(), then.into(), otherwise.into()],
	}
}

/// Arguments are laid out as `cond1, value1, cond2, value2, ..., default`.
pub fn case_when(cases: impl IntoIterator<Item = (Expr, Expr)>, default: impl Into<Expr>) -> Expr {
	let mut args = Vec::new();
	for (condition, value) in cases {
		args.push(condition);
		args.push(value);
	}
	args.push(default.into());
	Expr::Call {
		name: "case_when".to_string(),
		args,
	}
}

pub fn coalesce(exprs: impl IntoIterator<Item = Expr>) -> Expr {
	Expr::Call {
		name: "coalesce".to_string(),
		args: exprs.into_iter().collect(),
	}
}

/// Descending sort key for `arrange`.
pub fn desc(expr: impl Into<Expr>) -> Expr {
	Expr::Call {
		name: "desc".to_string(),
		args: vec![expr.into()],
	}
}
