// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::ops::Shr;

use serde::{Deserialize, Serialize};
use tidyq_frame::Frame;
use tidyq_sql::SqlTable;

use crate::{Pipeline, Source, Verb};

/// Verbs composed without a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chain(Vec<Verb>);

impl Chain {
	pub fn new(verbs: Vec<Verb>) -> Self {
		Self(verbs)
	}

	pub fn verbs(&self) -> &[Verb] {
		&self.0
	}

	pub fn into_verbs(self) -> Vec<Verb> {
		self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Verb> for Chain {
	fn from(verb: Verb) -> Self {
		Chain(vec![verb])
	}
}

impl Shr<Verb> for Verb {
	type Output = Chain;

	fn shr(self, rhs: Verb) -> Chain {
		Chain(vec![self, rhs])
	}
}

impl Shr<Chain> for Verb {
	type Output = Chain;

	fn shr(self, rhs: Chain) -> Chain {
		let mut verbs = vec![self];
		verbs.extend(rhs.0);
		Chain(verbs)
	}
}

impl Shr<Verb> for Chain {
	type Output = Chain;

	fn shr(mut self, rhs: Verb) -> Chain {
		self.0.push(rhs);
		self
	}
}

impl Shr<Chain> for Chain {
	type Output = Chain;

	fn shr(mut self, rhs: Chain) -> Chain {
		self.0.extend(rhs.0);
		self
	}
}

impl Shr<Verb> for Pipeline {
	type Output = Pipeline;

	fn shr(self, rhs: Verb) -> Pipeline {
		self.then(rhs)
	}
}

impl Shr<Chain> for Pipeline {
	type Output = Pipeline;

	fn shr(self, rhs: Chain) -> Pipeline {
		self.then_all(rhs)
	}
}

impl Shr<Verb> for &Pipeline {
	type Output = Pipeline;

	fn shr(self, rhs: Verb) -> Pipeline {
		self.clone().then(rhs)
	}
}

impl Shr<Chain> for &Pipeline {
	type Output = Pipeline;

	fn shr(self, rhs: Chain) -> Pipeline {
		self.clone().then_all(rhs)
	}
}

macro_rules! impl_source_shr {
	($source:ty) => {
		impl Shr<Verb> for $source {
			type Output = Pipeline;

			fn shr(self, rhs: Verb) -> Pipeline {
				Pipeline::from(self).then(rhs)
			}
		}

		impl Shr<Chain> for $source {
			type Output = Pipeline;

			fn shr(self, rhs: Chain) -> Pipeline {
				Pipeline::from(self).then_all(rhs)
			}
		}
	};
}

impl_source_shr!(Source);
impl_source_shr!(Frame);
impl_source_shr!(SqlTable);

#[cfg(test)]
mod tests {
	use tidyq_expr::col;
	use tidyq_frame::Column;

	use super::*;
	use crate::{filter, group_by, mutate, select};

	fn frame() -> Frame {
		Frame::new(vec![Column::int8("a", [1, 2, 3])]).unwrap()
	}

	#[test]
	fn test_verbs_compose_into_chain() {
		let chain = mutate([("x", col("a") + 1)]) >> filter([col("x").gt(2)]) >> select([col("x")]);
		assert_eq!(chain.len(), 3);
		let nested = mutate([("x", col("a"))]) >> (filter([col("x").gt(1)]) >> select([col("x")]));
		assert_eq!(nested.len(), 3);
	}

	#[test]
	fn test_source_then_chain() {
		let pipeline = frame() >> (mutate([("x", col("a") + 1)]) >> group_by([col("x")]));
		assert_eq!(pipeline.verbs().len(), 2);
		assert_eq!(pipeline.grouping().groups, vec!["x".to_string()]);
	}

	#[test]
	fn test_branching_leaves_original_untouched() {
		let base = frame() >> mutate([("x", col("a") * 2)]);
		let left = &base >> filter([col("x").gt(2)]);
		let right = &base >> select([col("a")]);
		assert_eq!(base.verbs().len(), 1);
		assert_eq!(left.verbs().len(), 2);
		assert_eq!(right.verbs().len(), 2);
		assert_ne!(left, right);
	}

	#[test]
	fn test_chain_serialises() {
		let chain = mutate([("x", col("a") + 1)]) >> filter([col("x").gt(2)]);
		let json = serde_json::to_string(&chain).unwrap();
		assert_eq!(serde_json::from_str::<Chain>(&json).unwrap(), chain);
	}
}
