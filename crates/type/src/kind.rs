// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

/// The kind of a verb call, independent of its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerbKind {
	Select,
	Mutate,
	Transmute,
	Filter,
	GroupBy,
	Ungroup,
	Summarize,
	Arrange,
	Rename,
	Count,
	Distinct,
	Head,
	Join,
	SemiJoin,
	AntiJoin,
}

impl VerbKind {
	pub const ALL: [VerbKind; 15] = [
		VerbKind::Select,
		VerbKind::Mutate,
		VerbKind::Transmute,
		VerbKind::Filter,
		VerbKind::GroupBy,
		VerbKind::Ungroup,
		VerbKind::Summarize,
		VerbKind::Arrange,
		VerbKind::Rename,
		VerbKind::Count,
		VerbKind::Distinct,
		VerbKind::Head,
		VerbKind::Join,
		VerbKind::SemiJoin,
		VerbKind::AntiJoin,
	];
}

impl Display for VerbKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			VerbKind::Select => f.write_str("select"),
			VerbKind::Mutate => f.write_str("mutate"),
			VerbKind::Transmute => f.write_str("transmute"),
			VerbKind::Filter => f.write_str("filter"),
			VerbKind::GroupBy => f.write_str("group_by"),
			VerbKind::Ungroup => f.write_str("ungroup"),
			VerbKind::Summarize => f.write_str("summarize"),
			VerbKind::Arrange => f.write_str("arrange"),
			VerbKind::Rename => f.write_str("rename"),
			VerbKind::Count => f.write_str("count"),
			VerbKind::Distinct => f.write_str("distinct"),
			VerbKind::Head => f.write_str("head"),
			VerbKind::Join => f.write_str("join"),
			VerbKind::SemiJoin => f.write_str("semi_join"),
			VerbKind::AntiJoin => f.write_str("anti_join"),
		}
	}
}

/// Where a pipeline executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
	// in-memory columnar frame
	Eager,
	// remote table, compiled to SQL text
	Sql,
}

impl Display for BackendKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			BackendKind::Eager => f.write_str("eager"),
			BackendKind::Sql => f.write_str("sql"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_verb_kind_display() {
		assert_eq!(VerbKind::GroupBy.to_string(), "group_by");
		assert_eq!(VerbKind::SemiJoin.to_string(), "semi_join");
		assert_eq!(BackendKind::Sql.to_string(), "sql");
	}

	#[test]
	fn test_all_is_unique() {
		let mut seen = std::collections::HashSet::new();
		for kind in VerbKind::ALL {
			assert!(seen.insert(kind));
		}
	}
}
