// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	fmt::{self, Debug, Formatter},
	ops::Deref,
	sync::Arc,
};

use tidyq_type::{BackendKind, Error, VerbKind};
use tidyq_verb::{Pipeline, Verb};
use tracing::instrument;

use crate::{Relation, context::Context, eager, sql};

/// Runs one verb against a relation of the backend it was registered for.
/// The dispatcher is passed along so a handler can run nested pipelines,
/// such as the right-hand side of a join.
pub type Handler = fn(&Dispatcher, Relation, &Verb) -> crate::Result<Relation>;

/// The `(verb, backend)` dispatch table. Backends add rows; handlers never
/// branch on the backend they run for.
#[derive(Clone)]
pub struct Dispatcher(Arc<DispatcherInner>);

pub struct DispatcherInner {
	handlers: HashMap<(VerbKind, BackendKind), Handler>,
}

impl Deref for Dispatcher {
	type Target = DispatcherInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Debug for Dispatcher {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let mut rows: Vec<String> = self.handlers.keys().map(|(verb, backend)| format!("{verb}/{backend}")).collect();
		rows.sort();
		f.debug_struct("Dispatcher").field("handlers", &rows).finish()
	}
}

impl Dispatcher {
	pub fn empty() -> Dispatcher {
		Dispatcher::builder().build()
	}

	pub fn builder() -> DispatcherBuilder {
		DispatcherBuilder {
			handlers: HashMap::new(),
		}
	}

	/// Every verb on both the eager and the SQL backend.
	pub fn standard() -> Dispatcher {
		let builder = Dispatcher::builder();
		let builder = eager::register(builder);
		let builder = sql::register(builder);
		builder.build()
	}

	/// Runs every verb of `pipeline`, in order, starting from its source.
	#[instrument(name = "engine::run", level = "debug", skip_all, fields(backend = %pipeline.backend(), verbs = pipeline.verbs().len()))]
	pub fn run(&self, pipeline: &Pipeline) -> crate::Result<Relation> {
		let relation = Relation::from_source(pipeline.source());
		pipeline.verbs().iter().try_fold(relation, |relation, verb| self.dispatch(relation, verb))
	}

	/// Looks up the handler for the verb on the relation's backend, runs it
	/// and records the grouping the verb leaves behind.
	#[instrument(name = "engine::dispatch", level = "trace", skip_all, fields(verb = %verb.kind(), backend = %relation.backend()))]
	pub fn dispatch(&self, relation: Relation, verb: &Verb) -> crate::Result<Relation> {
		let kind = verb.kind();
		let backend = relation.backend();
		let handler = self.handler(kind, backend).ok_or_else(|| Context::new(kind, backend).unsupported_verb())?;

		let grouping = relation.grouping().after(verb);
		let mut relation = handler(self, relation, verb).map_err(|err| annotate(err, kind, backend))?;
		relation.set_grouping(grouping);
		Ok(relation)
	}
}

impl DispatcherInner {
	pub fn handler(&self, verb: VerbKind, backend: BackendKind) -> Option<Handler> {
		self.handlers.get(&(verb, backend)).copied()
	}

	pub fn supports(&self, verb: VerbKind, backend: BackendKind) -> bool {
		self.handlers.contains_key(&(verb, backend))
	}
}

// fills in whatever the handler's diagnostic left open
fn annotate(err: Error, verb: VerbKind, backend: BackendKind) -> Error {
	Error(err.diagnostic().with_verb(verb).with_backend(backend))
}

pub struct DispatcherBuilder {
	handlers: HashMap<(VerbKind, BackendKind), Handler>,
}

impl DispatcherBuilder {
	/// Registers `handler` for the verb on the backend, replacing any
	/// handler registered for the same row before.
	pub fn with_handler(mut self, verb: VerbKind, backend: BackendKind, handler: Handler) -> Self {
		self.handlers.insert((verb, backend), handler);
		self
	}

	/// Removes a row, so the verb fails on that backend.
	pub fn without_handler(mut self, verb: VerbKind, backend: BackendKind) -> Self {
		self.handlers.remove(&(verb, backend));
		self
	}

	pub fn build(self) -> Dispatcher {
		Dispatcher(Arc::new(DispatcherInner {
			handlers: self.handlers,
		}))
	}
}

#[cfg(test)]
mod tests {
	use tidyq_expr::col;
	use tidyq_frame::{Column, Frame};
	use tidyq_type::ErrorKind;
	use tidyq_verb::{distinct, mutate};

	use super::*;

	fn pipeline() -> Pipeline {
		let frame = Frame::new(vec![Column::int8("x", [1, 2, 2])]).unwrap();
		Pipeline::new(frame)
	}

	#[test]
	fn test_standard_covers_every_row() {
		let dispatcher = Dispatcher::standard();
		for verb in VerbKind::ALL {
			assert!(dispatcher.supports(verb, BackendKind::Eager), "{verb} on eager");
			assert!(dispatcher.supports(verb, BackendKind::Sql), "{verb} on sql");
		}
	}

	#[test]
	fn test_missing_row() {
		let dispatcher = Dispatcher::builder()
			.with_handler(VerbKind::Mutate, BackendKind::Eager, |_, relation, _| Ok(relation))
			.build();
		let err = dispatcher.run(&pipeline().then(distinct([col("x")]))).unwrap_err();
		assert_eq!(err.code, "DISPATCH_001");
		assert_eq!(err.kind(), ErrorKind::UnsupportedVerbOnBackend);
		assert_eq!(err.verb, Some(VerbKind::Distinct));
		assert_eq!(err.backend, Some(BackendKind::Eager));
	}

	#[test]
	fn test_without_handler() {
		let dispatcher = Dispatcher::builder()
			.with_handler(VerbKind::Mutate, BackendKind::Eager, |_, relation, _| Ok(relation))
			.without_handler(VerbKind::Mutate, BackendKind::Eager)
			.build();
		assert!(!dispatcher.supports(VerbKind::Mutate, BackendKind::Eager));
		assert!(Dispatcher::empty().handler(VerbKind::Mutate, BackendKind::Eager).is_none());
	}

	#[test]
	fn test_handler_errors_name_verb_and_backend() {
		let err = Dispatcher::standard().run(&pipeline().then(mutate([("y", col("nope") + 1)]))).unwrap_err();
		assert_eq!(err.code, "RESOLVE_001");
		assert_eq!(err.verb, Some(VerbKind::Mutate));
		assert_eq!(err.backend, Some(BackendKind::Eager));
	}
}
