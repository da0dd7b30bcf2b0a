// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{BinaryOp, Expr, UnaryOp};
use tidyq_frame::compute::{ArithOp, CompareOp, comparable};
use tidyq_sql::{SqlBinaryOp, SqlColumn, SqlExpr, SqlUnaryOp};
use tidyq_type::Type;

use super::Compiler;
use crate::ops::Operator;

impl Compiler<'_> {
	pub(super) fn binary(&self, expr: &Expr, op: BinaryOp, left: &Expr, right: &Expr) -> crate::Result<SqlColumn> {
		let left = self.compile(left)?;
		let right = self.compile(right)?;
		let mismatch = || self.ctx.type_mismatch(expr, left.ty, right.ty);

		match Operator::from(op) {
			Operator::Arith(op) => {
				let ty = op.result_type(left.ty, right.ty).ok_or_else(mismatch)?;
				let compiled = match op {
					// integer division would truncate
					ArithOp::Div => left.expr.cast(Type::Float8).binary(SqlBinaryOp::Div, right.expr),
					ArithOp::Rem if ty == Type::Float8 => {
						return Err(self.ctx.unsupported_expression(
							expr,
							format!("'%' on floating point values is not available in {}", self.dialect.name()),
						));
					}
					ArithOp::Add => left.expr.binary(SqlBinaryOp::Add, right.expr),
					ArithOp::Sub => left.expr.binary(SqlBinaryOp::Sub, right.expr),
					ArithOp::Mul => left.expr.binary(SqlBinaryOp::Mul, right.expr),
					ArithOp::Rem => left.expr.binary(SqlBinaryOp::Rem, right.expr),
				};
				Ok(SqlColumn::new(compiled, ty))
			}
			Operator::Compare(op) => {
				if !comparable(left.ty, right.ty) {
					return Err(mismatch());
				}
				let op = match op {
					CompareOp::Eq => SqlBinaryOp::Eq,
					CompareOp::Ne => SqlBinaryOp::NotEq,
					CompareOp::Lt => SqlBinaryOp::Lt,
					CompareOp::Le => SqlBinaryOp::LtEq,
					CompareOp::Gt => SqlBinaryOp::Gt,
					CompareOp::Ge => SqlBinaryOp::GtEq,
				};
				Ok(SqlColumn::new(left.expr.binary(op, right.expr), Type::Boolean))
			}
			Operator::And | Operator::Or => {
				if !is_logical(left.ty) || !is_logical(right.ty) {
					return Err(mismatch());
				}
				let op = match Operator::from(op) {
					Operator::Or => SqlBinaryOp::Or,
					_ => SqlBinaryOp::And,
				};
				Ok(SqlColumn::new(left.expr.binary(op, right.expr), Type::Boolean))
			}
		}
	}

	pub(super) fn unary(&self, expr: &Expr, op: UnaryOp, operand: &Expr) -> crate::Result<SqlColumn> {
		let operand = self.compile(operand)?;
		match op {
			UnaryOp::Neg if operand.ty.is_number() || operand.ty == Type::Undefined => Ok(SqlColumn::new(
				SqlExpr::Unary {
					op: SqlUnaryOp::Neg,
					operand: Box::new(operand.expr),
				},
				operand.ty,
			)),
			UnaryOp::Not if is_logical(operand.ty) => Ok(SqlColumn::new(
				SqlExpr::Unary {
					op: SqlUnaryOp::Not,
					operand: Box::new(operand.expr),
				},
				Type::Boolean,
			)),
			UnaryOp::Neg => Err(self.ctx.unsupported_type(expr, "-", operand.ty)),
			UnaryOp::Not => Err(self.ctx.unsupported_type(expr, "~", operand.ty)),
		}
	}
}

fn is_logical(ty: Type) -> bool {
	ty == Type::Boolean || ty == Type::Undefined
}
