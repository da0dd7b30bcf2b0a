// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::{BackendKind, VerbKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub verb: Option<VerbKind>,
	pub expression: Option<String>,
	pub backend: Option<BackendKind>,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

/// Coarse error taxonomy, derived from the diagnostic code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// An expression names a column or operation that cannot be resolved
	ExpressionResolution,
	/// No handler exists for a verb on a backend, or the dialect lacks a capability
	UnsupportedVerbOnBackend,
	/// A verb is invalid for the current grouping
	GroupingState,
	/// The engine or driver rejected the compiled operation
	BackendExecution,
	Internal,
}

impl Diagnostic {
	pub fn kind(&self) -> ErrorKind {
		match self.code.split('_').next() {
			Some("RESOLVE") => ErrorKind::ExpressionResolution,
			Some("DISPATCH") => ErrorKind::UnsupportedVerbOnBackend,
			Some("GROUP") => ErrorKind::GroupingState,
			Some("BACKEND") => ErrorKind::BackendExecution,
			_ => ErrorKind::Internal,
		}
	}

	pub fn with_verb(mut self, verb: VerbKind) -> Self {
		self.verb.get_or_insert(verb);
		self
	}

	pub fn with_backend(mut self, backend: BackendKind) -> Self {
		self.backend.get_or_insert(backend);
		self
	}
}

pub struct DefaultRenderer;

impl DefaultRenderer {
	pub fn render_string(diagnostic: &Diagnostic) -> String {
		let mut output = String::new();
		Self::render_nested(diagnostic, 0, &mut output);
		output
	}

	fn render_nested(d: &Diagnostic, depth: usize, output: &mut String) {
		let indent = "  ".repeat(depth);

		let _ = writeln!(output, "{indent}error[{}]: {}", d.code, d.message);

		if let Some(verb) = &d.verb {
			let _ = writeln!(output, "{indent}  --> verb: {verb}");
		}
		if let Some(backend) = &d.backend {
			let _ = writeln!(output, "{indent}  --> backend: {backend}");
		}
		if let Some(expression) = &d.expression {
			let _ = writeln!(output, "{indent}   |");
			let _ = writeln!(output, "{indent}   | {expression}");
			if let Some(label) = &d.label {
				let _ = writeln!(output, "{indent}   = {label}");
			}
		}

		if let Some(help) = &d.help {
			let _ = writeln!(output, "\n{indent}help: {help}");
		}

		for note in &d.notes {
			let _ = writeln!(output, "\n{indent}note: {note}");
		}

		if let Some(cause) = &d.cause {
			let _ = writeln!(output, "\n{indent}caused by:");
			Self::render_nested(cause, depth + 1, output);
		}
	}
}
