// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{Classification, Classifier, ClassifyError, Expr};
use tidyq_frame::FrameError;
use tidyq_type::{BackendKind, Error, QueryError, Type, VerbKind, error};
use tidyq_verb::SelectError;

/// The verb and backend a handler runs for. Every error raised while
/// resolving or compiling an expression is built through it, so the
/// diagnostic always names both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Context {
	pub(crate) verb: VerbKind,
	pub(crate) backend: BackendKind,
}

impl Context {
	pub(crate) fn new(verb: VerbKind, backend: BackendKind) -> Self {
		Self {
			verb,
			backend,
		}
	}

	pub(crate) fn classify(&self, expr: &Expr, groups: &[String]) -> crate::Result<Classification> {
		Classifier::classify(expr, groups).map_err(|e| self.classify_error(e))
	}

	pub(crate) fn classify_error(&self, err: ClassifyError) -> Error {
		let reason = err.to_string();
		match err {
			ClassifyError::UnknownOperation {
				name,
				expression,
			} => error!(QueryError::UnknownOperation {
				verb: self.verb,
				backend: self.backend,
				name,
				expression,
			}),
			ClassifyError::Arity {
				expression,
				..
			} => self.invalid_argument(expression, reason),
			ClassifyError::NestedWindow {
				expression,
			} => error!(QueryError::NestedWindow {
				verb: self.verb,
				backend: self.backend,
				expression,
			}),
		}
	}

	pub(crate) fn column_not_found(&self, column: impl Into<String>, available: Vec<String>) -> Error {
		error!(QueryError::ColumnNotFound {
			verb: self.verb,
			backend: self.backend,
			column: column.into(),
			available,
		})
	}

	pub(crate) fn invalid_argument(&self, expression: impl ToString, reason: impl Into<String>) -> Error {
		error!(QueryError::InvalidArgument {
			verb: self.verb,
			backend: self.backend,
			expression: expression.to_string(),
			reason: reason.into(),
		})
	}

	pub(crate) fn type_mismatch(&self, expression: impl ToString, left: Type, right: Type) -> Error {
		error!(QueryError::TypeMismatch {
			verb: self.verb,
			backend: self.backend,
			expression: expression.to_string(),
			left,
			right,
		})
	}

	/// `op` has no meaning for values of type `ty`.
	pub(crate) fn unsupported_type(&self, expression: impl ToString, op: &str, ty: Type) -> Error {
		self.invalid_argument(expression, format!("'{op}' is not defined for {ty}"))
	}

	pub(crate) fn unsupported_expression(&self, expression: impl ToString, reason: impl Into<String>) -> Error {
		error!(QueryError::UnsupportedExpression {
			verb: self.verb,
			backend: self.backend,
			expression: expression.to_string(),
			reason: reason.into(),
		})
	}

	pub(crate) fn unsupported_capability(&self, dialect: &str, capability: impl Into<String>) -> Error {
		error!(QueryError::UnsupportedCapability {
			verb: self.verb,
			backend: self.backend,
			dialect: dialect.to_string(),
			capability: capability.into(),
		})
	}

	pub(crate) fn drops_grouping_column(&self, column: impl Into<String>) -> Error {
		error!(QueryError::DropsGroupingColumn {
			verb: self.verb,
			backend: self.backend,
			column: column.into(),
		})
	}

	pub(crate) fn grouping_column_not_found(&self, column: impl Into<String>, available: Vec<String>) -> Error {
		error!(QueryError::GroupingColumnNotFound {
			verb: self.verb,
			backend: self.backend,
			column: column.into(),
			available,
		})
	}

	pub(crate) fn empty_grouping(&self) -> Error {
		error!(QueryError::EmptyGrouping {
			verb: self.verb,
			backend: self.backend,
		})
	}

	pub(crate) fn unsupported_verb(&self) -> Error {
		error!(QueryError::UnsupportedVerb {
			verb: self.verb,
			backend: self.backend,
		})
	}

	/// Failure of a handler step that has no better classification, such as
	/// two joined SQL tables living on different connections.
	pub(crate) fn execution_failed(&self, reason: impl Into<String>) -> Error {
		error!(QueryError::ExecutionFailed {
			verb: Some(self.verb),
			backend: self.backend,
			sql: None,
			reason: reason.into(),
		})
	}

	pub(crate) fn same_call_reference(&self, column: impl Into<String>, expression: impl ToString) -> Error {
		error!(QueryError::SameCallReference {
			verb: self.verb,
			backend: self.backend,
			column: column.into(),
			expression: expression.to_string(),
		})
	}

	/// Maps a kernel error raised while evaluating `expression`.
	pub(crate) fn frame_error(&self, err: FrameError, expression: impl ToString, available: Vec<String>) -> Error {
		match err {
			FrameError::ColumnNotFound(column) => self.column_not_found(column, available),
			FrameError::TypeMismatch {
				left,
				right,
				..
			} => self.type_mismatch(expression, left, right),
			err @ (FrameError::UnsupportedType {
				..
			}
			| FrameError::InvalidCast {
				..
			}
			| FrameError::DuplicateColumn(_)) => self.invalid_argument(expression, err.to_string()),
			err @ (FrameError::LengthMismatch {
				..
			}
			| FrameError::MixedTypes {
				..
			}) => self.execution_failed(err.to_string()),
		}
	}

	pub(crate) fn select_error(&self, err: SelectError, available: Vec<String>) -> Error {
		let reason = err.to_string();
		match err {
			SelectError::ColumnNotFound(column) => self.column_not_found(column, available),
			SelectError::NotASelector(expression) => self.invalid_argument(expression, reason),
		}
	}
}
