// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Deferred symbolic expressions over named columns.
//!
//! An [`Expr`] is built from the [`PLACEHOLDER`] and never evaluated here;
//! interpreters resolve it against a frame or compile it to SQL.

pub use classify::{Classification, Classifier, ClassifyError, ExprClass};
pub use expr::{BinaryOp, Expr, PLACEHOLDER, UnaryOp, col, lit};
pub use function::{
	FunctionMode, Signature, case_when, coalesce, desc, if_else, lookup, n, row_number,
};

mod classify;
mod expr;
mod function;
mod ops;
