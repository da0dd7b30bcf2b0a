// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use tidyq_frame::Frame;
use tidyq_type::BackendKind;
use tidyq_verb::{Grouping, Source};

use crate::{eager::EagerFrame, sql::SqlQuery};

/// The intermediate result a pipeline carries from verb to verb.
#[derive(Debug, Clone)]
pub enum Relation {
	Eager(EagerFrame),
	Sql(SqlQuery),
}

impl Relation {
	pub fn from_source(source: &Source) -> Relation {
		match source {
			Source::Eager(frame) => Relation::Eager(EagerFrame::new(Arc::unwrap_or_clone(frame.clone()))),
			Source::Sql(table) => Relation::Sql(SqlQuery::new(table.clone())),
		}
	}

	pub fn backend(&self) -> BackendKind {
		match self {
			Relation::Eager(_) => BackendKind::Eager,
			Relation::Sql(_) => BackendKind::Sql,
		}
	}

	pub fn grouping(&self) -> &Grouping {
		match self {
			Relation::Eager(frame) => &frame.grouping,
			Relation::Sql(query) => &query.grouping,
		}
	}

	pub(crate) fn set_grouping(&mut self, grouping: Grouping) {
		match self {
			Relation::Eager(frame) => frame.grouping = grouping,
			Relation::Sql(query) => query.grouping = grouping,
		}
	}

	pub fn column_names(&self) -> Vec<String> {
		match self {
			Relation::Eager(frame) => frame.frame.column_names(),
			Relation::Sql(query) => query.select.column_names(),
		}
	}

	/// The rows of the relation. A SQL relation runs its query here.
	pub fn materialize(self) -> crate::Result<Frame> {
		match self {
			Relation::Eager(frame) => Ok(frame.frame),
			Relation::Sql(query) => query.fetch(),
		}
	}
}
