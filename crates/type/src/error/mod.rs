// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
};

mod diagnostic;
mod r#macro;
mod query;

pub use diagnostic::{DefaultRenderer, Diagnostic, ErrorKind};
pub use query::QueryError;

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
	fn into_diagnostic(self) -> Diagnostic {
		self
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let out = DefaultRenderer::render_string(&self.0);
		f.write_str(out.as_str())
	}
}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		self.0
	}
}

impl std::error::Error for Error {}

impl From<QueryError> for Error {
	fn from(err: QueryError) -> Self {
		Error(err.into_diagnostic())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{BackendKind, VerbKind};

	fn failing() -> crate::Result<()> {
		crate::return_error!(QueryError::EmptyGrouping {
			verb: VerbKind::GroupBy,
			backend: BackendKind::Eager,
		});
	}

	#[test]
	fn test_return_error_macro() {
		let err = failing().unwrap_err();
		assert_eq!(err.code, "GROUP_001");
		assert_eq!(err.kind(), ErrorKind::GroupingState);
	}

	#[test]
	fn test_question_mark_converts() {
		fn inner() -> crate::Result<()> {
			Err(QueryError::ConnectionFailed {
				reason: "no such file".to_string(),
			})?
		}
		assert_eq!(inner().unwrap_err().code, "BACKEND_002");
	}

	#[test]
	fn test_deref_mut_sets_verb() {
		let mut err = crate::error!(QueryError::ExecutionFailed {
			verb: None,
			backend: BackendKind::Sql,
			sql: None,
			reason: "x".to_string(),
		});
		err.verb = Some(VerbKind::Filter);
		assert_eq!(err.diagnostic().verb, Some(VerbKind::Filter));
	}
}
