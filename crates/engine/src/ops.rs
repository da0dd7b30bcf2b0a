// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::BinaryOp;
use tidyq_frame::compute::{ArithOp, CompareOp};

/// A binary DSL operator, split by the kernel family that implements it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
	Arith(ArithOp),
	Compare(CompareOp),
	And,
	Or,
}

impl From<BinaryOp> for Operator {
	fn from(op: BinaryOp) -> Self {
		match op {
			BinaryOp::Add => Operator::Arith(ArithOp::Add),
			BinaryOp::Sub => Operator::Arith(ArithOp::Sub),
			BinaryOp::Mul => Operator::Arith(ArithOp::Mul),
			BinaryOp::Div => Operator::Arith(ArithOp::Div),
			BinaryOp::Rem => Operator::Arith(ArithOp::Rem),
			BinaryOp::Eq => Operator::Compare(CompareOp::Eq),
			BinaryOp::Ne => Operator::Compare(CompareOp::Ne),
			BinaryOp::Lt => Operator::Compare(CompareOp::Lt),
			BinaryOp::Le => Operator::Compare(CompareOp::Le),
			BinaryOp::Gt => Operator::Compare(CompareOp::Gt),
			BinaryOp::Ge => Operator::Compare(CompareOp::Ge),
			BinaryOp::And => Operator::And,
			BinaryOp::Or => Operator::Or,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_families() {
		assert_eq!(Operator::from(BinaryOp::Div), Operator::Arith(ArithOp::Div));
		assert_eq!(Operator::from(BinaryOp::Le), Operator::Compare(CompareOp::Le));
		assert_eq!(Operator::from(BinaryOp::Or), Operator::Or);
	}
}
