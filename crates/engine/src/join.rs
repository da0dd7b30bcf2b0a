// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_frame::compute::comparable;
use tidyq_type::Type;

use crate::context::Context;

/// Output column of a join taken from the left input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LeftColumn {
	pub(crate) output: String,
	pub(crate) source: String,
	/// The right key matched against this column, when it is a join key.
	pub(crate) key: Option<String>,
}

/// Output column of a join taken from the right input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RightColumn {
	pub(crate) output: String,
	pub(crate) source: String,
}

/// Column layout of a join: every left column, then every right column that
/// is not a key. Names present on both sides get `_x` and `_y` suffixes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JoinLayout {
	pub(crate) left: Vec<LeftColumn>,
	pub(crate) right: Vec<RightColumn>,
}

impl JoinLayout {
	pub(crate) fn new(
		ctx: &Context,
		left: &[(String, Type)],
		right: &[(String, Type)],
		on: &[(String, String)],
	) -> crate::Result<Self> {
		if on.is_empty() {
			return Err(ctx.invalid_argument("on", "a join needs at least one pair of key columns"));
		}

		let names = |schema: &[(String, Type)]| schema.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>();
		let type_of = |schema: &[(String, Type)], name: &str| schema.iter().find(|(n, _)| n == name).map(|(_, t)| *t);

		for (l, r) in on {
			let lt = type_of(left, l).ok_or_else(|| ctx.column_not_found(l.clone(), names(left)))?;
			let rt = type_of(right, r).ok_or_else(|| ctx.column_not_found(r.clone(), names(right)))?;
			if !comparable(lt, rt) {
				return Err(ctx.type_mismatch(format!("_.{l} == _.{r}"), lt, rt));
			}
		}

		let right_rest: Vec<&String> =
			right.iter().map(|(n, _)| n).filter(|n| !on.iter().any(|(_, r)| r == *n)).collect();
		let collides = |name: &String| right_rest.contains(&name) && left.iter().any(|(n, _)| n == name);

		let left = left
			.iter()
			.map(|(name, _)| LeftColumn {
				output: if collides(name) { format!("{name}_x") } else { name.clone() },
				source: name.clone(),
				key: on.iter().find(|(l, _)| l == name).map(|(_, r)| r.clone()),
			})
			.collect();

		let right = right_rest
			.iter()
			.map(|name| RightColumn {
				output: if collides(name) { format!("{name}_y") } else { (*name).clone() },
				source: (*name).clone(),
			})
			.collect();

		Ok(Self {
			left,
			right,
		})
	}

	pub(crate) fn output_names(&self) -> Vec<String> {
		self.left.iter().map(|c| c.output.clone()).chain(self.right.iter().map(|c| c.output.clone())).collect()
	}
}
