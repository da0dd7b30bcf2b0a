// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Relational query trees, their rendering to SQL text and the SQLite
//! connection they run on.

pub use ast::{
	FromClause, JoinKind, OrderBy, Select, SqlBinaryOp, SqlColumn, SqlExpr, SqlUnaryOp, WindowFrame,
	is_aggregate_function,
};
pub use config::{DbPath, OpenFlags, SqliteConfig};
pub use connection::SqliteConnection;
pub use dialect::Dialect;
pub use render::Renderer;
pub use table::SqlTable;

mod ast;
mod config;
mod connection;
mod dialect;
mod render;
mod table;
