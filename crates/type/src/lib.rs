// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

pub mod error;
mod kind;
pub mod value;

pub use error::{Diagnostic, Error, ErrorKind, IntoDiagnostic, QueryError};
pub use kind::{BackendKind, VerbKind};
pub use value::{OrderedF64, Type, Value};

pub type Result<T> = std::result::Result<T, Error>;
