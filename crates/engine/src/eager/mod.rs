// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Verbs executed directly against an in-memory frame.

use tidyq_frame::{Frame, GroupByView};
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Grouping;

use crate::{DispatcherBuilder, context::Context};

mod arrange;
mod count;
mod evaluate;
mod filter;
mod group;
mod join;
mod mutate;
mod project;
mod summarize;

pub(crate) use evaluate::Evaluator;

/// A materialised frame and the grouping that applies to it.
#[derive(Debug, Clone, PartialEq)]
pub struct EagerFrame {
	pub frame: Frame,
	pub grouping: Grouping,
}

impl EagerFrame {
	pub fn new(frame: Frame) -> Self {
		Self {
			frame,
			grouping: Grouping::default(),
		}
	}

	/// Row indices per group, in first-appearance order. An ungrouped frame
	/// is one group holding every row.
	pub(crate) fn view(&self, ctx: &Context) -> crate::Result<GroupByView> {
		self.frame.group_by_view(&self.grouping.groups).map_err(|err| {
			ctx.frame_error(err, self.grouping.groups.join(", "), self.frame.column_names())
		})
	}
}

macro_rules! eager {
	($handler:path) => {
		|dispatcher: &$crate::Dispatcher,
		 relation: $crate::Relation,
		 verb: &tidyq_verb::Verb|
		 -> $crate::Result<$crate::Relation> {
			match relation {
				$crate::Relation::Eager(input) => $handler(dispatcher, input, verb).map($crate::Relation::Eager),
				other => Err($crate::context::Context::new(verb.kind(), other.backend()).unsupported_verb()),
			}
		}
	};
}

/// Registers the eager handler of every verb.
pub(crate) fn register(builder: DispatcherBuilder) -> DispatcherBuilder {
	let eager = BackendKind::Eager;
	builder.with_handler(VerbKind::Select, eager, eager!(project::select))
		.with_handler(VerbKind::Rename, eager, eager!(project::rename))
		.with_handler(VerbKind::Mutate, eager, eager!(mutate::mutate))
		.with_handler(VerbKind::Transmute, eager, eager!(mutate::transmute))
		.with_handler(VerbKind::Filter, eager, eager!(filter::filter))
		.with_handler(VerbKind::GroupBy, eager, eager!(group::group_by))
		.with_handler(VerbKind::Ungroup, eager, eager!(group::ungroup))
		.with_handler(VerbKind::Summarize, eager, eager!(summarize::summarize))
		.with_handler(VerbKind::Arrange, eager, eager!(arrange::arrange))
		.with_handler(VerbKind::Count, eager, eager!(count::count))
		.with_handler(VerbKind::Distinct, eager, eager!(project::distinct))
		.with_handler(VerbKind::Head, eager, eager!(project::head))
		.with_handler(VerbKind::Join, eager, eager!(join::join))
		.with_handler(VerbKind::SemiJoin, eager, eager!(join::semi_join))
		.with_handler(VerbKind::AntiJoin, eager, eager!(join::anti_join))
}
