// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tidyq_expr::{Expr, col};
use tidyq_frame::Frame;
use tidyq_sql::SqlTable;
use tidyq_type::BackendKind;

use crate::{Assignments, Chain, Verb};

/// The data a pipeline starts from.
#[derive(Debug, Clone)]
pub enum Source {
	Eager(Arc<Frame>),
	Sql(SqlTable),
}

impl Source {
	pub fn kind(&self) -> BackendKind {
		match self {
			Source::Eager(_) => BackendKind::Eager,
			Source::Sql(_) => BackendKind::Sql,
		}
	}

	pub fn column_names(&self) -> Vec<String> {
		match self {
			Source::Eager(frame) => frame.column_names(),
			Source::Sql(table) => table.schema().iter().map(|(name, _)| name.clone()).collect(),
		}
	}
}

impl PartialEq for Source {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Source::Eager(l), Source::Eager(r)) => Arc::ptr_eq(l, r) || l == r,
			(Source::Sql(l), Source::Sql(r)) => l.name() == r.name() && l.schema() == r.schema(),
			_ => false,
		}
	}
}

impl From<Frame> for Source {
	fn from(frame: Frame) -> Self {
		Source::Eager(Arc::new(frame))
	}
}

impl From<Arc<Frame>> for Source {
	fn from(frame: Arc<Frame>) -> Self {
		Source::Eager(frame)
	}
}

impl From<SqlTable> for Source {
	fn from(table: SqlTable) -> Self {
		Source::Sql(table)
	}
}

/// Grouping keys and the row order set by the last `arrange`, as they stand
/// after a verb.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
	pub groups: Vec<String>,
	pub order: Vec<Expr>,
}

impl Grouping {
	pub fn is_grouped(&self) -> bool {
		!self.groups.is_empty()
	}

	pub fn is_ordered(&self) -> bool {
		!self.order.is_empty()
	}

	/// The group names a `group_by` over `keys` leaves: the keys alone, or
	/// with `add` the current groups followed by the keys not among them.
	pub fn keys_after(&self, keys: &Assignments, add: bool) -> Vec<String> {
		let mut groups = if add { self.groups.clone() } else { vec![] };
		for (name, _) in keys {
			if !groups.contains(name) {
				groups.push(name.clone());
			}
		}
		groups
	}

	/// The grouping that holds once `verb` has run.
	pub fn after(&self, verb: &Verb) -> Grouping {
		match verb {
			Verb::GroupBy {
				keys,
				add,
			} => Grouping {
				groups: self.keys_after(keys, *add),
				order: self.order.clone(),
			},
			Verb::Ungroup => Grouping {
				groups: vec![],
				order: self.order.clone(),
			},
			Verb::Summarize(_)
			| Verb::Count {
				..
			} => Grouping::default(),
			Verb::Arrange(exprs) => Grouping {
				groups: self.groups.clone(),
				order: exprs.clone(),
			},
			Verb::Rename(pairs) => {
				let renamed = |name: &String| {
					pairs.iter().find(|(_, old)| old == name).map_or_else(|| name.clone(), |(new, _)| new.clone())
				};
				Grouping {
					groups: self.groups.iter().map(renamed).collect(),
					order: self
						.order
						.iter()
						.map(|expr| {
							expr.transform(&mut |node: &Expr| {
								node.column_name().and_then(|name| {
									pairs.iter().find(|(_, old)| old == name).map(|(new, _)| col(new.clone()))
								})
							})
						})
						.collect(),
				}
			}
			Verb::Join {
				..
			} => Grouping {
				groups: self.groups.clone(),
				order: vec![],
			},
			Verb::Select(_)
			| Verb::Mutate(_)
			| Verb::Transmute(_)
			| Verb::Filter(_)
			| Verb::Distinct {
				..
			}
			| Verb::Head(_)
			| Verb::SemiJoin {
				..
			}
			| Verb::AntiJoin {
				..
			} => self.clone(),
		}
	}
}

/// A source and the verbs applied to it, in order. Appending returns a new
/// pipeline; an existing one is never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
	source: Source,
	verbs: Vec<Verb>,
	grouping: Grouping,
}

impl Pipeline {
	pub fn new(source: impl Into<Source>) -> Self {
		Self {
			source: source.into(),
			verbs: vec![],
			grouping: Grouping::default(),
		}
	}

	pub fn source(&self) -> &Source {
		&self.source
	}

	pub fn verbs(&self) -> &[Verb] {
		&self.verbs
	}

	/// The grouping after the last verb.
	pub fn grouping(&self) -> &Grouping {
		&self.grouping
	}

	pub fn backend(&self) -> BackendKind {
		self.source.kind()
	}

	pub fn then(mut self, verb: Verb) -> Pipeline {
		self.grouping = self.grouping.after(&verb);
		self.verbs.push(verb);
		self
	}

	pub fn then_all(self, chain: Chain) -> Pipeline {
		chain.into_verbs().into_iter().fold(self, Pipeline::then)
	}
}

impl From<Source> for Pipeline {
	fn from(source: Source) -> Self {
		Pipeline::new(source)
	}
}

impl From<Frame> for Pipeline {
	fn from(frame: Frame) -> Self {
		Pipeline::new(frame)
	}
}

impl From<SqlTable> for Pipeline {
	fn from(table: SqlTable) -> Self {
		Pipeline::new(table)
	}
}

impl From<&Pipeline> for Pipeline {
	fn from(pipeline: &Pipeline) -> Self {
		pipeline.clone()
	}
}
