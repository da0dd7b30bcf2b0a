// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use super::{Diagnostic, IntoDiagnostic};
use crate::{BackendKind, Type, VerbKind};

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
	#[error("{verb} on {backend}: column '{column}' not found")]
	ColumnNotFound {
		verb: VerbKind,
		backend: BackendKind,
		column: String,
		available: Vec<String>,
	},

	#[error("{verb} on {backend}: unknown operation '{name}'")]
	UnknownOperation {
		verb: VerbKind,
		backend: BackendKind,
		name: String,
		expression: String,
	},

	#[error("{verb} on {backend}: '{column}' is defined in the same call")]
	SameCallReference {
		verb: VerbKind,
		backend: BackendKind,
		column: String,
		expression: String,
	},

	#[error("{verb} on {backend}: window function nested inside an aggregate")]
	NestedWindow {
		verb: VerbKind,
		backend: BackendKind,
		expression: String,
	},

	#[error("{verb} on {backend}: cannot combine {left} with {right}")]
	TypeMismatch {
		verb: VerbKind,
		backend: BackendKind,
		expression: String,
		left: Type,
		right: Type,
	},

	#[error("{verb} on {backend}: {reason}")]
	InvalidArgument {
		verb: VerbKind,
		backend: BackendKind,
		expression: String,
		reason: String,
	},

	#[error("{verb} is not supported on {backend}")]
	UnsupportedVerb {
		verb: VerbKind,
		backend: BackendKind,
	},

	#[error("{verb} on {backend}: dialect '{dialect}' does not support {capability}")]
	UnsupportedCapability {
		verb: VerbKind,
		backend: BackendKind,
		dialect: String,
		capability: String,
	},

	#[error("{verb} on {backend}: {reason}")]
	UnsupportedExpression {
		verb: VerbKind,
		backend: BackendKind,
		expression: String,
		reason: String,
	},

	#[error("{verb} on {backend}: no grouping keys given")]
	EmptyGrouping {
		verb: VerbKind,
		backend: BackendKind,
	},

	#[error("{verb} on {backend}: grouping column '{column}' would be removed")]
	DropsGroupingColumn {
		verb: VerbKind,
		backend: BackendKind,
		column: String,
	},

	#[error("{verb} on {backend}: grouping column '{column}' not found")]
	GroupingColumnNotFound {
		verb: VerbKind,
		backend: BackendKind,
		column: String,
		available: Vec<String>,
	},

	#[error("execution failed on {backend}: {reason}")]
	ExecutionFailed {
		verb: Option<VerbKind>,
		backend: BackendKind,
		sql: Option<String>,
		reason: String,
	},

	#[error("connection failed: {reason}")]
	ConnectionFailed {
		reason: String,
	},
}

impl IntoDiagnostic for QueryError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			QueryError::ColumnNotFound {
				verb,
				backend,
				column,
				available,
			} => Diagnostic {
				code: "RESOLVE_001".to_string(),
				message,
				verb: Some(verb),
				expression: Some(column),
				backend: Some(backend),
				label: Some("unknown column".to_string()),
				help: Some("Only columns of the source or columns assigned by an earlier verb are visible"
					.to_string()),
				notes: if available.is_empty() {
					vec![]
				} else {
					vec![format!("available columns: {}", available.join(", "))]
				},
				cause: None,
			},

			QueryError::UnknownOperation {
				verb,
				backend,
				name,
				expression,
			} => Diagnostic {
				code: "RESOLVE_002".to_string(),
				message,
				verb: Some(verb),
				expression: Some(expression),
				backend: Some(backend),
				label: Some(format!("'{name}' is not a known function")),
				help: Some("Check the spelling of the method call".to_string()),
				notes: vec![],
				cause: None,
			},

			QueryError::SameCallReference {
				verb,
				backend,
				column,
				expression,
			} => Diagnostic {
				code: "RESOLVE_003".to_string(),
				message,
				verb: Some(verb),
				expression: Some(expression),
				backend: Some(backend),
				label: Some(format!("'{column}' is assigned earlier in this {verb}")),
				help: Some(format!("Split the {verb} into two calls, or repeat the expression")),
				notes: vec![],
				cause: None,
			},

			QueryError::NestedWindow {
				verb,
				backend,
				expression,
			} => Diagnostic {
				code: "RESOLVE_004".to_string(),
				message,
				verb: Some(verb),
				expression: Some(expression),
				backend: Some(backend),
				label: Some("aggregate over a window or aggregate".to_string()),
				help: Some("Compute the inner expression in a separate mutate first".to_string()),
				notes: vec![],
				cause: None,
			},

			QueryError::TypeMismatch {
				verb,
				backend,
				expression,
				..
			} => Diagnostic {
				code: "RESOLVE_005".to_string(),
				message,
				verb: Some(verb),
				expression: Some(expression),
				backend: Some(backend),
				label: Some("incompatible operand types".to_string()),
				help: Some("Cast one of the operands with astype".to_string()),
				notes: vec![],
				cause: None,
			},

			QueryError::InvalidArgument {
				verb,
				backend,
				expression,
				..
			} => Diagnostic {
				code: "RESOLVE_006".to_string(),
				message,
				verb: Some(verb),
				expression: Some(expression),
				backend: Some(backend),
				label: Some("invalid argument".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},

			QueryError::UnsupportedVerb {
				verb,
				backend,
			} => Diagnostic {
				code: "DISPATCH_001".to_string(),
				message,
				verb: Some(verb),
				expression: None,
				backend: Some(backend),
				label: None,
				help: Some(format!("Register a handler for ({verb}, {backend}) in the dispatcher")),
				notes: vec![],
				cause: None,
			},

			QueryError::UnsupportedCapability {
				verb,
				backend,
				capability,
				..
			} => Diagnostic {
				code: "DISPATCH_002".to_string(),
				message,
				verb: Some(verb),
				expression: None,
				backend: Some(backend),
				label: Some(format!("{capability} required")),
				help: Some("Use a dialect that supports it, or collect to the eager backend first".to_string()),
				notes: vec![],
				cause: None,
			},

			QueryError::UnsupportedExpression {
				verb,
				backend,
				expression,
				..
			} => Diagnostic {
				code: "DISPATCH_003".to_string(),
				message,
				verb: Some(verb),
				expression: Some(expression),
				backend: Some(backend),
				label: Some("not expressible on this backend".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},

			QueryError::EmptyGrouping {
				verb,
				backend,
			} => Diagnostic {
				code: "GROUP_001".to_string(),
				message,
				verb: Some(verb),
				expression: None,
				backend: Some(backend),
				label: None,
				help: Some("Pass at least one column, or use ungroup to drop the grouping".to_string()),
				notes: vec![],
				cause: None,
			},

			QueryError::DropsGroupingColumn {
				verb,
				backend,
				column,
			} => Diagnostic {
				code: "GROUP_002".to_string(),
				message,
				verb: Some(verb),
				expression: Some(column),
				backend: Some(backend),
				label: Some("grouping column".to_string()),
				help: Some("Call ungroup before removing a grouping column".to_string()),
				notes: vec![],
				cause: None,
			},

			QueryError::GroupingColumnNotFound {
				verb,
				backend,
				column,
				available,
			} => Diagnostic {
				code: "GROUP_003".to_string(),
				message,
				verb: Some(verb),
				expression: Some(column),
				backend: Some(backend),
				label: Some("unknown grouping column".to_string()),
				help: Some("Create the column with mutate, or name the key as group_by(name = expr)".to_string()),
				notes: if available.is_empty() {
					vec![]
				} else {
					vec![format!("available columns: {}", available.join(", "))]
				},
				cause: None,
			},

			QueryError::ExecutionFailed {
				verb,
				backend,
				sql,
				..
			} => Diagnostic {
				code: "BACKEND_001".to_string(),
				message,
				verb,
				expression: sql,
				backend: Some(backend),
				label: None,
				help: None,
				notes: vec![],
				cause: None,
			},

			QueryError::ConnectionFailed {
				..
			} => Diagnostic {
				code: "BACKEND_002".to_string(),
				message,
				verb: None,
				expression: None,
				backend: Some(BackendKind::Sql),
				label: None,
				help: Some("Check the database path and open flags".to_string()),
				notes: vec![],
				cause: None,
			},
		}
	}
}
