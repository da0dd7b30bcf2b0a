// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};
use tidyq_expr::{BinaryOp, Expr, UnaryOp};

/// One entry of a `select`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selector {
	Column(String),
	/// `_.new == _.old`
	Rename {
		new: String,
		old: String,
	},
	/// `-_.x`
	Drop(String),
	/// Every column from `from` to `to`, inclusive, in frame order.
	Range {
		from: String,
		to: String,
	},
	StartsWith(String),
	EndsWith(String),
	Contains(String),
	/// An expression with no selector meaning; rejected on resolution.
	Expr(Expr),
}

impl From<Expr> for Selector {
	fn from(expr: Expr) -> Self {
		let selector = match &expr {
			Expr::Binary {
				op: BinaryOp::Eq,
				left,
				right,
			} => match (left.column_name(), right.column_name()) {
				(Some(new), Some(old)) => Some(Selector::Rename {
					new: new.to_string(),
					old: old.to_string(),
				}),
				_ => None,
			},
			Expr::Unary {
				op: UnaryOp::Neg,
				operand,
			} => operand.column_name().map(|name| Selector::Drop(name.to_string())),
			other => other.column_name().map(|name| Selector::Column(name.to_string())),
		};
		selector.unwrap_or(Selector::Expr(expr))
	}
}

impl From<&str> for Selector {
	fn from(name: &str) -> Self {
		Selector::Column(name.to_string())
	}
}

pub fn col_range(from: impl Into<String>, to: impl Into<String>) -> Selector {
	Selector::Range {
		from: from.into(),
		to: to.into(),
	}
}

pub fn starts_with(prefix: impl Into<String>) -> Selector {
	Selector::StartsWith(prefix.into())
}

pub fn ends_with(suffix: impl Into<String>) -> Selector {
	Selector::EndsWith(suffix.into())
}

pub fn contains(needle: impl Into<String>) -> Selector {
	Selector::Contains(needle.into())
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectError {
	#[error("column '{0}' not found")]
	ColumnNotFound(String),

	#[error("'{0}' is not a column selector")]
	NotASelector(String),
}

/// Resolves selectors against the current column names into
/// `(output name, source name)` pairs, in output order.
///
/// When every selector is a drop, selection starts from all columns.
pub fn resolve_selection(columns: &[String], selectors: &[Selector]) -> Result<Vec<(String, String)>, SelectError> {
	let position = |name: &str| {
		columns.iter().position(|c| c == name).ok_or_else(|| SelectError::ColumnNotFound(name.to_string()))
	};

	let mut selected: Vec<(String, String)> = if selectors.iter().all(|s| matches!(s, Selector::Drop(_))) {
		columns.iter().map(|c| (c.clone(), c.clone())).collect()
	} else {
		vec![]
	};

	let add = |selected: &mut Vec<(String, String)>, new: String, old: String| {
		if let Some(existing) = selected.iter_mut().find(|(_, source)| *source == old) {
			existing.0 = new;
		} else {
			selected.push((new, old));
		}
	};

	for selector in selectors {
		match selector {
			Selector::Column(name) => {
				position(name)?;
				add(&mut selected, name.clone(), name.clone());
			}
			Selector::Rename {
				new,
				old,
			} => {
				position(old)?;
				add(&mut selected, new.clone(), old.clone());
			}
			Selector::Drop(name) => {
				position(name)?;
				selected.retain(|(_, source)| source != name);
			}
			Selector::Range {
				from,
				to,
			} => {
				let (start, end) = (position(from)?, position(to)?);
				let (start, end) = if start <= end { (start, end) } else { (end, start) };
				for name in &columns[start..=end] {
					add(&mut selected, name.clone(), name.clone());
				}
			}
			Selector::StartsWith(pattern) | Selector::EndsWith(pattern) | Selector::Contains(pattern) => {
				let matches = |name: &str| match selector {
					Selector::StartsWith(_) => name.starts_with(pattern.as_str()),
					Selector::EndsWith(_) => name.ends_with(pattern.as_str()),
					_ => name.contains(pattern.as_str()),
				};
				for name in columns.iter().filter(|c| matches(c)) {
					add(&mut selected, name.clone(), name.clone());
				}
			}
			Selector::Expr(expr) => return Err(SelectError::NotASelector(expr.to_string())),
		}
	}

	Ok(selected)
}
