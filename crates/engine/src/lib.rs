// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Executes pipelines. Every verb is dispatched on the `(verb, backend)`
//! pair to a handler of the eager backend, which evaluates over in-memory
//! frames, or of the SQL backend, which grows a query for SQLite.

pub use dispatch::{Dispatcher, DispatcherBuilder, DispatcherInner, Handler};
pub use eager::EagerFrame;
pub use engine::{Collect, Engine, EngineConfig, collect, show_query};
pub use relation::Relation;
pub use sql::SqlQuery;

mod args;
mod check;
mod context;
mod dispatch;
mod eager;
mod engine;
mod join;
mod ops;
mod relation;
mod sql;

pub type Result<T> = tidyq_type::Result<T>;
