// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The DSL form of verbs and pipelines, as a user would have written them.

use std::fmt::{self, Display, Formatter};

use tidyq_expr::col;

use crate::{Assignments, JoinHow, Pipeline, Selector, Source, Verb};

impl Display for Selector {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Selector::Column(name) => write!(f, "{}", col(name.clone())),
			Selector::Rename {
				new,
				old,
			} => write!(f, "{} == {}", col(new.clone()), col(old.clone())),
			Selector::Drop(name) => write!(f, "-{}", col(name.clone())),
			Selector::Range {
				from,
				to,
			} => write!(f, "col_range('{from}', '{to}')"),
			Selector::StartsWith(prefix) => write!(f, "starts_with('{prefix}')"),
			Selector::EndsWith(suffix) => write!(f, "ends_with('{suffix}')"),
			Selector::Contains(part) => write!(f, "contains('{part}')"),
			Selector::Expr(expr) => write!(f, "{expr}"),
		}
	}
}

impl Display for JoinHow {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			JoinHow::Inner => "inner_join",
			JoinHow::Left => "left_join",
			JoinHow::Right => "right_join",
			JoinHow::Full => "full_join",
		})
	}
}

impl Display for Verb {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Verb::Select(selectors) => write!(f, "select({})", list(selectors)),
			Verb::Mutate(items) => write!(f, "mutate({})", assignments(items)),
			Verb::Transmute(items) => write!(f, "transmute({})", assignments(items)),
			Verb::Filter(conditions) => write!(f, "filter({})", list(conditions)),
			Verb::GroupBy {
				keys,
				add: false,
			} => write!(f, "group_by({})", assignments(keys)),
			Verb::GroupBy {
				keys,
				add: true,
			} => write!(f, "group_by({}, add = true)", assignments(keys)),
			Verb::Ungroup => f.write_str("ungroup()"),
			Verb::Summarize(items) => write!(f, "summarize({})", assignments(items)),
			Verb::Arrange(keys) => write!(f, "arrange({})", list(keys)),
			Verb::Rename(pairs) => {
				let pairs: Vec<String> = pairs.iter().map(|(new, old)| format!("{new} = {}", col(old.clone()))).collect();
				write!(f, "rename({})", pairs.join(", "))
			}
			Verb::Count {
				keys,
				name,
				sort,
			} => {
				let mut args = vec![assignments(keys)];
				if name != "n" {
					args.push(format!("name = '{name}'"));
				}
				if *sort {
					args.push("sort = true".to_string());
				}
				args.retain(|arg| !arg.is_empty());
				write!(f, "count({})", args.join(", "))
			}
			Verb::Distinct {
				keys,
				keep_all,
			} => {
				let mut args = vec![assignments(keys)];
				if *keep_all {
					args.push("keep_all = true".to_string());
				}
				args.retain(|arg| !arg.is_empty());
				write!(f, "distinct({})", args.join(", "))
			}
			Verb::Head(n) => write!(f, "head({n})"),
			Verb::Join {
				right,
				on,
				how,
			} => write!(f, "{how}({right}, on = {})", keys(on)),
			Verb::SemiJoin {
				right,
				on,
			} => write!(f, "semi_join({right}, on = {})", keys(on)),
			Verb::AntiJoin {
				right,
				on,
			} => write!(f, "anti_join({right}, on = {})", keys(on)),
		}
	}
}

impl Display for Source {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Source::Eager(frame) => write!(f, "frame[{}]", frame.column_names().join(", ")),
			Source::Sql(table) => write!(f, "table['{}']", table.name()),
		}
	}
}

impl Display for Pipeline {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.source())?;
		for verb in self.verbs() {
			write!(f, " >> {verb}")?;
		}
		Ok(())
	}
}

fn list<T: Display>(items: &[T]) -> String {
	items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

// a key named after the column it reads prints as that column alone
fn assignments(items: &Assignments) -> String {
	items.iter()
		.map(|(name, expr)| match expr.column_name() {
			Some(column) if column == name => expr.to_string(),
			_ => format!("{name} = {expr}"),
		})
		.collect::<Vec<_>>()
		.join(", ")
}

fn keys(on: &[(String, String)]) -> String {
	let pairs: Vec<String> = on.iter().map(|(l, r)| format!("'{l}': '{r}'")).collect();
	format!("{{{}}}", pairs.join(", "))
}

#[cfg(test)]
mod tests {
	use tidyq_expr::{col, lit};
	use tidyq_frame::{Column, Frame};

	use crate::{
		arrange, count_with, distinct_keep_all, filter, group_by, group_by_add, group_by_named, head, inner_join, mutate,
		rename, select, starts_with, summarize,
	};

	use super::*;

	fn frame() -> Frame {
		Frame::new(vec![Column::int8("a", [1, 2]), Column::int8("b", [3, 4])]).unwrap()
	}

	#[test]
	fn test_verbs() {
		assert_eq!(filter([col("a").gt(1)]).to_string(), "filter(_.a > 1)");
		assert_eq!(mutate([("c", col("a") + col("b"))]).to_string(), "mutate(c = _.a + _.b)");
		assert_eq!(
			select([Selector::from(col("a")), Selector::from(-col("b")), starts_with("x")]).to_string(),
			"select(_.a, -_.b, starts_with('x'))"
		);
		assert_eq!(group_by([col("a")]).to_string(), "group_by(_.a)");
		assert_eq!(group_by_named([("odd", col("a") % 2)]).to_string(), "group_by(odd = _.a % 2)");
		assert_eq!(group_by_add([col("b")]).to_string(), "group_by(_.b, add = true)");
		assert_eq!(summarize([("m", col("a").mean())]).to_string(), "summarize(m = _.a.mean())");
		assert_eq!(arrange([-col("a")]).to_string(), "arrange(-_.a)");
		assert_eq!(rename([("x", "a")]).to_string(), "rename(x = _.a)");
		assert_eq!(count_with([col("a")], "total", true).to_string(), "count(_.a, name = 'total', sort = true)");
		assert_eq!(distinct_keep_all([col("a")]).to_string(), "distinct(_.a, keep_all = true)");
		assert_eq!(head(3).to_string(), "head(3)");
		assert_eq!(Verb::Mutate(vec![("one".to_string(), lit(1))]).to_string(), "mutate(one = 1)");
	}

	#[test]
	fn test_pipeline() {
		let pipeline = Pipeline::new(frame()) >> filter([col("a").gt(1)]) >> head(1);
		assert_eq!(pipeline.to_string(), "frame[a, b] >> filter(_.a > 1) >> head(1)");
	}

	#[test]
	fn test_join() {
		let verb = inner_join(Pipeline::new(frame()), [("a", "a")]);
		assert_eq!(verb.to_string(), "inner_join(frame[a, b], on = {'a': 'a'})");
	}
}
