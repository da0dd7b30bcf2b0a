// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{BinaryOp, Expr, UnaryOp};
use tidyq_frame::{ColumnData, compute};

use super::Evaluator;
use crate::ops::Operator;

impl Evaluator<'_> {
	pub(super) fn binary(&self, expr: &Expr, op: BinaryOp, left: &Expr, right: &Expr) -> crate::Result<ColumnData> {
		let left = self.evaluate(left)?;
		let right = self.evaluate(right)?;
		let result = match Operator::from(op) {
			Operator::Arith(op) => compute::arith(op, &left, &right),
			Operator::Compare(op) => compute::compare(op, &left, &right),
			Operator::And => compute::and(&left, &right),
			Operator::Or => compute::or(&left, &right),
		};
		self.kernel(expr, result)
	}

	pub(super) fn unary(&self, expr: &Expr, op: UnaryOp, operand: &Expr) -> crate::Result<ColumnData> {
		let operand = self.evaluate(operand)?;
		let result = match op {
			UnaryOp::Neg => compute::negate(&operand),
			UnaryOp::Not => compute::not(&operand),
		};
		self.kernel(expr, result)
	}
}
