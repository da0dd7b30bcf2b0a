// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{Expr, FunctionMode, lookup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprClass {
	/// Elementwise; needs no grouping or ordering.
	Plain,
	/// Reduces each group to one value.
	Aggregate,
	/// Row aligned, depends on row order within each group.
	Cumulative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
	/// Class of the outermost node.
	pub class: ExprClass,
	/// Maximal aggregate/cumulative sub-expressions, in first-appearance order.
	pub windows: Vec<Expr>,
	/// Grouping keys the windows partition by.
	pub partition: Vec<String>,
}

impl Classification {
	/// A plain operator over aggregate or cumulative sub-expressions.
	pub fn is_composite(&self) -> bool {
		self.class == ExprClass::Plain && !self.windows.is_empty()
	}

	pub fn is_plain(&self) -> bool {
		self.class == ExprClass::Plain && self.windows.is_empty()
	}

	pub fn has_cumulative(&self) -> bool {
		self.windows.iter().any(|w| Classifier::mode_of(w) == Some(FunctionMode::Cumulative))
	}

	pub fn has_aggregate(&self) -> bool {
		self.windows.iter().any(|w| Classifier::mode_of(w) == Some(FunctionMode::Aggregate))
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
	#[error("unknown operation '{name}' in {expression}")]
	UnknownOperation {
		name: String,
		expression: String,
	},

	#[error("'{name}' takes {expected} arguments, got {got}")]
	Arity {
		name: String,
		expected: String,
		got: usize,
		expression: String,
	},

	#[error("window function nested inside {expression}")]
	NestedWindow {
		expression: String,
	},
}

pub struct Classifier;

impl Classifier {
	pub fn classify(expr: &Expr, groups: &[String]) -> Result<Classification, ClassifyError> {
		Self::validate(expr)?;

		let class = match Self::mode_of(expr) {
			Some(FunctionMode::Aggregate) => ExprClass::Aggregate,
			Some(FunctionMode::Cumulative) => ExprClass::Cumulative,
			_ => ExprClass::Plain,
		};

		let mut windows = Vec::new();
		Self::collect_windows(expr, &mut windows)?;

		Ok(Classification {
			class,
			windows,
			partition: groups.to_vec(),
		})
	}

	/// The registry mode of a call node, `None` for anything else.
	pub fn mode_of(expr: &Expr) -> Option<FunctionMode> {
		match expr {
			Expr::Call {
				name,
				..
			} => lookup(name).map(|s| s.mode),
			_ => None,
		}
	}

	pub fn is_window(expr: &Expr) -> bool {
		matches!(Self::mode_of(expr), Some(FunctionMode::Aggregate | FunctionMode::Cumulative))
	}

	/// Checks every call against the function registry.
	pub fn validate(expr: &Expr) -> Result<(), ClassifyError> {
		match expr {
			Expr::Call {
				name,
				args,
			} => {
				let Some(signature) = lookup(name) else {
					return Err(ClassifyError::UnknownOperation {
						name: name.clone(),
						expression: expr.to_string(),
					});
				};
				if !signature.accepts(args.len()) {
					let expected = match signature.max_args {
						Some(max) if max == signature.min_args => max.to_string(),
						Some(max) => format!("{}..{}", signature.min_args, max),
						None => format!("at least {}", signature.min_args),
					};
					return Err(ClassifyError::Arity {
						name: name.clone(),
						expected,
						got: args.len(),
						expression: expr.to_string(),
					});
				}
				args.iter().try_for_each(Self::validate)
			}
			Expr::Attr {
				of,
				name,
			} if !matches!(**of, Expr::Placeholder) => Err(ClassifyError::UnknownOperation {
				name: name.clone(),
				expression: expr.to_string(),
			}),
			_ => expr.children().into_iter().try_for_each(Self::validate),
		}
	}

	fn collect_windows(expr: &Expr, out: &mut Vec<Expr>) -> Result<(), ClassifyError> {
		if Self::is_window(expr) {
			if expr.children().into_iter().any(Self::contains_window) {
				return Err(ClassifyError::NestedWindow {
					expression: expr.to_string(),
				});
			}
			if !out.contains(expr) {
				out.push(expr.clone());
			}
			return Ok(());
		}
		for child in expr.children() {
			Self::collect_windows(child, out)?;
		}
		Ok(())
	}

	pub fn contains_window(expr: &Expr) -> bool {
		Self::is_window(expr) || expr.children().into_iter().any(Self::contains_window)
	}
}
