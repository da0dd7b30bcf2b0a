// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};
use tidyq_expr::Expr;
use tidyq_type::VerbKind;

use crate::{Pipeline, Selector};

/// Ordered `name = expression` pairs.
pub type Assignments = Vec<(String, Expr)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinHow {
	Inner,
	Left,
	Right,
	Full,
}

/// A single verb call. Holds expressions only; nothing is evaluated until
/// the pipeline it belongs to is collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Verb {
	Select(Vec<Selector>),
	Mutate(Assignments),
	Transmute(Assignments),
	Filter(Vec<Expr>),
	/// `add` appends the keys to the current ones instead of replacing them.
	GroupBy {
		keys: Assignments,
		add: bool,
	},
	Ungroup,
	Summarize(Assignments),
	Arrange(Vec<Expr>),
	/// `(new, old)` pairs.
	Rename(Vec<(String, String)>),
	Count {
		keys: Assignments,
		name: String,
		sort: bool,
	},
	Distinct {
		keys: Assignments,
		keep_all: bool,
	},
	Head(usize),
	// joins carry a bound pipeline and do not serialise
	#[serde(skip)]
	Join {
		right: Box<Pipeline>,
		on: Vec<(String, String)>,
		how: JoinHow,
	},
	#[serde(skip)]
	SemiJoin {
		right: Box<Pipeline>,
		on: Vec<(String, String)>,
	},
	#[serde(skip)]
	AntiJoin {
		right: Box<Pipeline>,
		on: Vec<(String, String)>,
	},
}

impl Verb {
	pub fn kind(&self) -> VerbKind {
		match self {
			Verb::Select(_) => VerbKind::Select,
			Verb::Mutate(_) => VerbKind::Mutate,
			Verb::Transmute(_) => VerbKind::Transmute,
			Verb::Filter(_) => VerbKind::Filter,
			Verb::GroupBy {
				..
			} => VerbKind::GroupBy,
			Verb::Ungroup => VerbKind::Ungroup,
			Verb::Summarize(_) => VerbKind::Summarize,
			Verb::Arrange(_) => VerbKind::Arrange,
			Verb::Rename(_) => VerbKind::Rename,
			Verb::Count {
				..
			} => VerbKind::Count,
			Verb::Distinct {
				..
			} => VerbKind::Distinct,
			Verb::Head(_) => VerbKind::Head,
			Verb::Join {
				..
			} => VerbKind::Join,
			Verb::SemiJoin {
				..
			} => VerbKind::SemiJoin,
			Verb::AntiJoin {
				..
			} => VerbKind::AntiJoin,
		}
	}
}

fn assignments<K: Into<String>, E: Into<Expr>>(items: impl IntoIterator<Item = (K, E)>) -> Assignments {
	items.into_iter().map(|(k, e)| (k.into(), e.into())).collect()
}

/// Positional keys are named after the column they reference, anything
/// else after its DSL rendering.
fn keys(items: impl IntoIterator<Item = Expr>) -> Assignments {
	items.into_iter()
		.map(|expr| {
			let name = expr.column_name().map(str::to_string).unwrap_or_else(|| expr.to_string());
			(name, expr)
		})
		.collect()
}

fn pairs<L: Into<String>, R: Into<String>>(items: impl IntoIterator<Item = (L, R)>) -> Vec<(String, String)> {
	items.into_iter().map(|(l, r)| (l.into(), r.into())).collect()
}

pub fn select<S: Into<Selector>>(selectors: impl IntoIterator<Item = S>) -> Verb {
	Verb::Select(selectors.into_iter().map(Into::into).collect())
}

pub fn mutate<K: Into<String>, E: Into<Expr>>(items: impl IntoIterator<Item = (K, E)>) -> Verb {
	Verb::Mutate(assignments(items))
}

pub fn transmute<K: Into<String>, E: Into<Expr>>(items: impl IntoIterator<Item = (K, E)>) -> Verb {
	Verb::Transmute(assignments(items))
}

pub fn filter<E: Into<Expr>>(conditions: impl IntoIterator<Item = E>) -> Verb {
	Verb::Filter(conditions.into_iter().map(Into::into).collect())
}

pub fn group_by(exprs: impl IntoIterator<Item = Expr>) -> Verb {
	Verb::GroupBy {
		keys: keys(exprs),
		add: false,
	}
}

/// `group_by(.., add = true)`: the keys follow the current ones, each
/// name once.
pub fn group_by_add(exprs: impl IntoIterator<Item = Expr>) -> Verb {
	Verb::GroupBy {
		keys: keys(exprs),
		add: true,
	}
}

/// `group_by(name = expr)`: the keys are computed first, as in `mutate`.
pub fn group_by_named<K: Into<String>, E: Into<Expr>>(items: impl IntoIterator<Item = (K, E)>) -> Verb {
	Verb::GroupBy {
		keys: assignments(items),
		add: false,
	}
}

pub fn ungroup() -> Verb {
	Verb::Ungroup
}

pub fn summarize<K: Into<String>, E: Into<Expr>>(items: impl IntoIterator<Item = (K, E)>) -> Verb {
	Verb::Summarize(assignments(items))
}

/// Ascending unless an expression is negated or wrapped in `desc`.
pub fn arrange(exprs: impl IntoIterator<Item = Expr>) -> Verb {
	Verb::Arrange(exprs.into_iter().collect())
}

/// `(new, old)` pairs.
pub fn rename<N: Into<String>, O: Into<String>>(items: impl IntoIterator<Item = (N, O)>) -> Verb {
	Verb::Rename(pairs(items))
}

pub fn count(exprs: impl IntoIterator<Item = Expr>) -> Verb {
	count_with(exprs, "n", false)
}

/// Counts into column `name`; `sort` orders by the count, largest first.
pub fn count_with(exprs: impl IntoIterator<Item = Expr>, name: impl Into<String>, sort: bool) -> Verb {
	Verb::Count {
		keys: keys(exprs),
		name: name.into(),
		sort,
	}
}

/// Unique rows over `exprs`, or over every column when empty.
pub fn distinct(exprs: impl IntoIterator<Item = Expr>) -> Verb {
	Verb::Distinct {
		keys: keys(exprs),
		keep_all: false,
	}
}

/// Like `distinct`, keeping every column of the first row per key.
pub fn distinct_keep_all(exprs: impl IntoIterator<Item = Expr>) -> Verb {
	Verb::Distinct {
		keys: keys(exprs),
		keep_all: true,
	}
}

pub fn head(n: usize) -> Verb {
	Verb::Head(n)
}

fn join<L: Into<String>, R: Into<String>>(
	right: impl Into<Pipeline>,
	on: impl IntoIterator<Item = (L, R)>,
	how: JoinHow,
) -> Verb {
	Verb::Join {
		right: Box::new(right.into()),
		on: pairs(on),
		how,
	}
}

/// `on` pairs a left key name with a right key name.
pub fn inner_join<L: Into<String>, R: Into<String>>(
	right: impl Into<Pipeline>,
	on: impl IntoIterator<Item = (L, R)>,
) -> Verb {
	join(right, on, JoinHow::Inner)
}

pub fn left_join<L: Into<String>, R: Into<String>>(
	right: impl Into<Pipeline>,
	on: impl IntoIterator<Item = (L, R)>,
) -> Verb {
	join(right, on, JoinHow::Left)
}

pub fn right_join<L: Into<String>, R: Into<String>>(
	right: impl Into<Pipeline>,
	on: impl IntoIterator<Item = (L, R)>,
) -> Verb {
	join(right, on, JoinHow::Right)
}

pub fn full_join<L: Into<String>, R: Into<String>>(
	right: impl Into<Pipeline>,
	on: impl IntoIterator<Item = (L, R)>,
) -> Verb {
	join(right, on, JoinHow::Full)
}

pub fn semi_join<L: Into<String>, R: Into<String>>(
	right: impl Into<Pipeline>,
	on: impl IntoIterator<Item = (L, R)>,
) -> Verb {
	Verb::SemiJoin {
		right: Box::new(right.into()),
		on: pairs(on),
	}
}

pub fn anti_join<L: Into<String>, R: Into<String>>(
	right: impl Into<Pipeline>,
	on: impl IntoIterator<Item = (L, R)>,
) -> Verb {
	Verb::AntiJoin {
		right: Box::new(right.into()),
		on: pairs(on),
	}
}
