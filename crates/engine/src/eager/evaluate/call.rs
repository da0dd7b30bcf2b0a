// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{ClassifyError, Expr};
use tidyq_frame::{ColumnData, compute};

use super::Evaluator;
use crate::args::{int_argument, literal_values, str_argument, type_argument};

impl Evaluator<'_> {
	/// Scalar calls: elementwise over their arguments.
	pub(super) fn call(&self, expr: &Expr, name: &str, args: &[Expr]) -> crate::Result<ColumnData> {
		match name {
			"if_else" => {
				let condition = self.evaluate(self.argument(expr, args, 0)?)?;
				let then = self.evaluate(self.argument(expr, args, 1)?)?;
				let otherwise = self.evaluate(self.argument(expr, args, 2)?)?;
				self.kernel(expr, compute::if_else(&condition, &then, &otherwise))
			}
			"case_when" => {
				let Some((default, cases)) = args.split_last() else {
					return Err(self.ctx.invalid_argument(expr, "case_when needs a default"));
				};
				if cases.len() % 2 != 0 {
					return Err(self.ctx.invalid_argument(expr, "case_when needs (condition, value) pairs"));
				}
				let cases = cases
					.chunks(2)
					.map(|pair| Ok((self.evaluate(&pair[0])?, self.evaluate(&pair[1])?)))
					.collect::<crate::Result<Vec<_>>>()?;
				let default = self.evaluate(default)?;
				let refs: Vec<(&ColumnData, &ColumnData)> = cases.iter().map(|(c, v)| (c, v)).collect();
				self.kernel(expr, compute::case_when(&refs, &default))
			}
			"coalesce" => {
				let columns = args.iter().map(|arg| self.evaluate(arg)).collect::<crate::Result<Vec<_>>>()?;
				let refs: Vec<&ColumnData> = columns.iter().collect();
				self.kernel(expr, compute::coalesce(&refs))
			}
			"desc" => Err(self.ctx.invalid_argument(expr, "desc() only orders arrange keys")),
			_ => self.method(expr, name, args),
		}
	}

	fn method(&self, expr: &Expr, name: &str, args: &[Expr]) -> crate::Result<ColumnData> {
		let data = self.evaluate(self.argument(expr, args, 0)?)?;
		let result = match name {
			"abs" => compute::abs(&data),
			"round" => compute::round(&data, int_argument(self.ctx, expr, args, 1, 0)?),
			"astype" => compute::cast(&data, type_argument(self.ctx, expr, args)?),
			"is_null" => Ok(compute::is_null(&data)),
			"not_null" => Ok(compute::not_null(&data)),
			"isin" => compute::is_in(&data, &literal_values(self.ctx, expr, &args[1..])?),
			"upper" => compute::upper(&data),
			"lower" => compute::lower(&data),
			"len" => compute::length(&data),
			"startswith" => compute::starts_with(&data, str_argument(self.ctx, expr, args, 1)?),
			"endswith" => compute::ends_with(&data, str_argument(self.ctx, expr, args, 1)?),
			_ => {
				return Err(self.ctx.classify_error(ClassifyError::UnknownOperation {
					name: name.to_string(),
					expression: expr.to_string(),
				}));
			}
		};
		self.kernel(expr, result)
	}
}
