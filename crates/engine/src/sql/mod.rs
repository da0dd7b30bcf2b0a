// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Verbs translated into a single growing `SELECT`. A verb that cannot be
//! expressed on the current query level first wraps it into a subquery.

use tidyq_expr::Expr;
use tidyq_frame::Frame;
use tidyq_sql::{FromClause, OrderBy, Renderer, Select, SqlColumn, SqlExpr, SqlTable};
use tidyq_type::{BackendKind, Type, VerbKind};
use tidyq_verb::Grouping;
use tracing::{Span, field, instrument};

use crate::{DispatcherBuilder, context::Context};

mod arrange;
mod compile;
mod count;
mod filter;
mod group;
mod join;
mod mutate;
mod project;
mod summarize;

pub(crate) use compile::{Compiler, Mode};

/// A query over a table and the grouping that applies to its rows. Nothing
/// runs until `fetch`.
#[derive(Debug, Clone)]
pub struct SqlQuery {
	table: SqlTable,
	pub select: Select,
	pub grouping: Grouping,
	// subquery aliases handed out so far
	aliases: usize,
}

impl SqlQuery {
	pub fn new(table: SqlTable) -> Self {
		Self {
			select: table.select(),
			table,
			grouping: Grouping::default(),
			aliases: 0,
		}
	}

	pub fn table(&self) -> &SqlTable {
		&self.table
	}

	/// The query text as it would run.
	pub fn sql(&self) -> String {
		Renderer::new(self.table.connection().dialect()).render(&self.select)
	}

	#[instrument(name = "engine::sql::fetch", level = "debug", skip_all, fields(table = self.table.name(), rows = field::Empty))]
	pub fn fetch(&self) -> crate::Result<Frame> {
		let frame = self.table.connection().query(&self.sql(), &self.select.types())?;
		Span::current().record("rows", frame.row_count());
		Ok(frame)
	}

	/// Moves the current query into `FROM (..) AS _qN` and projects every
	/// column by name. The inner `ORDER BY` only survives where a `LIMIT`
	/// depends on it; the outer query is ordered the same way.
	pub(crate) fn wrap(&mut self) {
		self.aliases += 1;
		let alias = format!("_q{}", self.aliases);
		let mut inner = self.select.clone();
		let (order, hidden) = carry_order(&mut inner);
		if inner.limit.is_none() {
			inner.order_by.clear();
		}
		self.select = inner.wrap(alias);
		for name in &hidden {
			self.select.columns.shift_remove(name);
		}
		self.select.order_by = order;
	}

	/// The select list holds a window function.
	pub(crate) fn is_windowed(&self) -> bool {
		self.select.columns.values().any(|c| c.expr.contains_window())
	}

	/// Rows are already reduced by `GROUP BY` or an aggregate.
	pub(crate) fn is_aggregated(&self) -> bool {
		!self.select.group_by.is_empty() || self.select.columns.values().any(|c| c.expr.contains_aggregate())
	}

	pub(crate) fn is_limited(&self) -> bool {
		self.select.limit.is_some()
	}

	pub(crate) fn is_distinct(&self) -> bool {
		self.select.distinct
	}

	/// True when `expr` holds a window that would have to nest another
	/// window: a column, grouping key or sort key it depends on is itself
	/// defined by one.
	pub(crate) fn needs_wrap(&self, expr: &Expr) -> bool {
		if !tidyq_expr::Classifier::contains_window(expr) {
			return false;
		}
		let windowed = |name: &String| self.select.columns.get(name).is_some_and(|c| c.expr.contains_window());
		expr.op_vars().iter().any(windowed)
			|| self.grouping.groups.iter().any(windowed)
			|| self.select.order_by.iter().any(|o| o.expr.contains_window())
	}

	/// A compiler over the current select list. Windows partition by the
	/// grouping keys and run in the query's current row order.
	pub(crate) fn compiler<'a>(&'a self, ctx: &'a Context, mode: Mode) -> crate::Result<Compiler<'a>> {
		let partition = match mode {
			Mode::Window => self
				.grouping
				.groups
				.iter()
				.map(|group| {
					self.select.columns.get(group).map(|c| c.expr.clone()).ok_or_else(|| {
						ctx.grouping_column_not_found(group.clone(), self.select.column_names())
					})
				})
				.collect::<crate::Result<Vec<_>>>()?,
			Mode::Aggregate => vec![],
		};
		let dialect = self.table.connection().dialect();
		Ok(Compiler::new(ctx, &self.select.columns, dialect, mode).with_window(partition, self.select.order_by.clone()))
	}
}

/// The `ORDER BY` of `inner` restated over its output names. A sort
/// expression that is no output column is projected as a hidden
/// `_order{i}` column, returned second so the outer query can drop it.
pub(crate) fn carry_order(inner: &mut Select) -> (Vec<OrderBy>, Vec<String>) {
	let mut order = Vec::with_capacity(inner.order_by.len());
	let mut hidden = Vec::new();
	for term in inner.order_by.clone() {
		let existing = inner.columns.iter().find(|(_, column)| column.expr == term.expr).map(|(name, _)| name.clone());
		let name = match existing {
			Some(name) => name,
			None => {
				let mut index = hidden.len();
				while inner.columns.contains_key(&format!("_order{index}")) {
					index += 1;
				}
				let name = format!("_order{index}");
				inner.columns.insert(name.clone(), SqlColumn::new(term.expr, Type::Undefined));
				hidden.push(name.clone());
				name
			}
		};
		order.push(OrderBy {
			expr: SqlExpr::column(name),
			descending: term.descending,
		});
	}
	(order, hidden)
}

/// `FROM (<select>) AS alias`, dropping an `ORDER BY` no `LIMIT` needs.
pub(crate) fn subquery(mut select: Select, alias: &str) -> FromClause {
	if select.limit.is_none() {
		select.order_by.clear();
	}
	FromClause::Subquery {
		query: Box::new(select),
		alias: alias.to_string(),
	}
}

macro_rules! sql {
	($handler:path) => {
		|dispatcher: &$crate::Dispatcher,
		 relation: $crate::Relation,
		 verb: &tidyq_verb::Verb|
		 -> $crate::Result<$crate::Relation> {
			match relation {
				$crate::Relation::Sql(input) => $handler(dispatcher, input, verb).map($crate::Relation::Sql),
				other => Err($crate::context::Context::new(verb.kind(), other.backend()).unsupported_verb()),
			}
		}
	};
}

/// Registers the SQL handler of every verb.
pub(crate) fn register(builder: DispatcherBuilder) -> DispatcherBuilder {
	let sql = BackendKind::Sql;
	builder.with_handler(VerbKind::Select, sql, sql!(project::select))
		.with_handler(VerbKind::Rename, sql, sql!(project::rename))
		.with_handler(VerbKind::Mutate, sql, sql!(mutate::mutate))
		.with_handler(VerbKind::Transmute, sql, sql!(mutate::transmute))
		.with_handler(VerbKind::Filter, sql, sql!(filter::filter))
		.with_handler(VerbKind::GroupBy, sql, sql!(group::group_by))
		.with_handler(VerbKind::Ungroup, sql, sql!(group::ungroup))
		.with_handler(VerbKind::Summarize, sql, sql!(summarize::summarize))
		.with_handler(VerbKind::Arrange, sql, sql!(arrange::arrange))
		.with_handler(VerbKind::Count, sql, sql!(count::count))
		.with_handler(VerbKind::Distinct, sql, sql!(project::distinct))
		.with_handler(VerbKind::Head, sql, sql!(project::head))
		.with_handler(VerbKind::Join, sql, sql!(join::join))
		.with_handler(VerbKind::SemiJoin, sql, sql!(join::semi_join))
		.with_handler(VerbKind::AntiJoin, sql, sql!(join::anti_join))
}
