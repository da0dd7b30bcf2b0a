// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use once_cell::sync::Lazy;
use tidyq_frame::Frame;
use tidyq_type::BackendKind;
use tidyq_verb::Pipeline;
use tracing::{Span, field, instrument};

use crate::{Dispatcher, Relation};

#[derive(Debug, Clone)]
pub struct EngineConfig {
	pub dispatcher: Dispatcher,
}

impl EngineConfig {
	pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
		self.dispatcher = dispatcher;
		self
	}
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			dispatcher: Dispatcher::standard(),
		}
	}
}

/// Executes pipelines through a dispatch table.
#[derive(Debug, Clone)]
pub struct Engine {
	dispatcher: Dispatcher,
}

impl Engine {
	pub fn new(config: EngineConfig) -> Self {
		Self {
			dispatcher: config.dispatcher,
		}
	}

	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	/// Runs the pipeline to completion and returns its rows.
	#[instrument(name = "engine::collect", level = "debug", skip_all, fields(backend = %pipeline.backend(), rows = field::Empty))]
	pub fn collect(&self, pipeline: &Pipeline) -> crate::Result<Frame> {
		let frame = self.dispatcher.run(pipeline)?.materialize()?;
		Span::current().record("rows", frame.row_count());
		Ok(frame)
	}

	/// The SQL a SQL pipeline would run, without running it. An eager
	/// pipeline has no query text and renders as its DSL form.
	#[instrument(name = "engine::show_query", level = "debug", skip_all, fields(backend = %pipeline.backend()))]
	pub fn show_query(&self, pipeline: &Pipeline) -> crate::Result<String> {
		if pipeline.backend() == BackendKind::Eager {
			return Ok(pipeline.to_string());
		}
		match self.dispatcher.run(pipeline)? {
			Relation::Sql(query) => Ok(query.sql()),
			Relation::Eager(_) => Ok(pipeline.to_string()),
		}
	}
}

impl Default for Engine {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}

static ENGINE: Lazy<Engine> = Lazy::new(Engine::default);

/// Collects `pipeline` with the standard dispatch table.
pub fn collect(pipeline: &Pipeline) -> crate::Result<Frame> {
	ENGINE.collect(pipeline)
}

pub fn show_query(pipeline: &Pipeline) -> crate::Result<String> {
	ENGINE.show_query(pipeline)
}

/// `pipeline.collect()` and `pipeline.show_query()` on the standard engine.
pub trait Collect {
	fn collect(&self) -> crate::Result<Frame>;

	fn show_query(&self) -> crate::Result<String>;
}

impl Collect for Pipeline {
	fn collect(&self) -> crate::Result<Frame> {
		collect(self)
	}

	fn show_query(&self) -> crate::Result<String> {
		show_query(self)
	}
}
