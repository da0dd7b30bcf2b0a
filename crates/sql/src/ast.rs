// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use tidyq_type::{Type, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
	Column {
		qualifier: Option<String>,
		name: String,
	},
	Literal(Value),
	Binary {
		op: SqlBinaryOp,
		left: Box<SqlExpr>,
		right: Box<SqlExpr>,
	},
	Unary {
		op: SqlUnaryOp,
		operand: Box<SqlExpr>,
	},
	Function {
		name: String,
		args: Vec<SqlExpr>,
		distinct: bool,
	},
	Window {
		function: Box<SqlExpr>,
		partition_by: Vec<SqlExpr>,
		order_by: Vec<OrderBy>,
		frame: Option<WindowFrame>,
	},
	Case {
		cases: Vec<(SqlExpr, SqlExpr)>,
		default: Option<Box<SqlExpr>>,
	},
	Cast {
		expr: Box<SqlExpr>,
		ty: Type,
	},
	IsNull {
		expr: Box<SqlExpr>,
		negated: bool,
	},
	InList {
		expr: Box<SqlExpr>,
		list: Vec<SqlExpr>,
	},
	Exists {
		query: Box<Select>,
		negated: bool,
	},
	/// `*`, only valid as a function argument (`COUNT(*)`).
	Star,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlBinaryOp {
	Add,
	Sub,
	Mul,
	Div,
	Rem,
	Eq,
	NotEq,
	Lt,
	LtEq,
	Gt,
	GtEq,
	And,
	Or,
}

impl SqlBinaryOp {
	pub fn as_str(&self) -> &'static str {
		match self {
			SqlBinaryOp::Add => "+",
			SqlBinaryOp::Sub => "-",
			SqlBinaryOp::Mul => "*",
			SqlBinaryOp::Div => "/",
			SqlBinaryOp::Rem => "%",
			SqlBinaryOp::Eq => "=",
			SqlBinaryOp::NotEq => "<>",
			SqlBinaryOp::Lt => "<",
			SqlBinaryOp::LtEq => "<=",
			SqlBinaryOp::Gt => ">",
			SqlBinaryOp::GtEq => ">=",
			SqlBinaryOp::And => "AND",
			SqlBinaryOp::Or => "OR",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlUnaryOp {
	Neg,
	Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
	pub expr: SqlExpr,
	pub descending: bool,
}

impl OrderBy {
	pub fn asc(expr: SqlExpr) -> Self {
		Self {
			expr,
			descending: false,
		}
	}

	pub fn desc(expr: SqlExpr) -> Self {
		Self {
			expr,
			descending: true,
		}
	}
}

/// The only frame the interpreters need: a running frame from the start of
/// the partition up to the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowFrame {
	RowsUnboundedPreceding,
}

/// One entry of the select list together with the type it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlColumn {
	pub expr: SqlExpr,
	pub ty: Type,
}

impl SqlColumn {
	pub fn new(expr: SqlExpr, ty: Type) -> Self {
		Self {
			expr,
			ty,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
	Inner,
	Left,
	Right,
	Full,
}

impl JoinKind {
	pub fn keyword(&self) -> &'static str {
		match self {
			JoinKind::Inner => "INNER JOIN",
			JoinKind::Left => "LEFT JOIN",
			JoinKind::Right => "RIGHT JOIN",
			JoinKind::Full => "FULL OUTER JOIN",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromClause {
	Table {
		name: String,
		alias: Option<String>,
	},
	Subquery {
		query: Box<Select>,
		alias: String,
	},
	Join {
		left: Box<FromClause>,
		right: Box<FromClause>,
		kind: JoinKind,
		on: Vec<(SqlExpr, SqlExpr)>,
	},
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
	/// Output name to definition, in output order.
	pub columns: IndexMap<String, SqlColumn>,
	pub from: FromClause,
	pub where_clause: Option<SqlExpr>,
	pub group_by: Vec<SqlExpr>,
	pub having: Option<SqlExpr>,
	pub order_by: Vec<OrderBy>,
	pub limit: Option<usize>,
	pub distinct: bool,
}

impl Select {
	pub fn new(from: FromClause) -> Self {
		Self {
			columns: IndexMap::new(),
			from,
			where_clause: None,
			group_by: vec![],
			having: None,
			order_by: vec![],
			limit: None,
			distinct: false,
		}
	}

	/// `SELECT "a", "b", .. FROM <table>` over the given schema.
	pub fn from_table(name: impl Into<String>, schema: &[(String, Type)]) -> Self {
		let mut select = Self::new(FromClause::Table {
			name: name.into(),
			alias: None,
		});
		for (column, ty) in schema {
			select.columns.insert(column.clone(), SqlColumn::new(SqlExpr::column(column), *ty));
		}
		select
	}

	/// Wraps `self` into `FROM (<self>) AS alias`, projecting every output
	/// column by name.
	pub fn wrap(self, alias: impl Into<String>) -> Self {
		let alias = alias.into();
		let schema: Vec<(String, Type)> = self.columns.iter().map(|(name, c)| (name.clone(), c.ty)).collect();
		let mut outer = Self::new(FromClause::Subquery {
			query: Box::new(self),
			alias,
		});
		for (name, ty) in schema {
			outer.columns.insert(name.clone(), SqlColumn::new(SqlExpr::column(&name), ty));
		}
		outer
	}

	pub fn column_names(&self) -> Vec<String> {
		self.columns.keys().cloned().collect()
	}

	pub fn types(&self) -> Vec<Type> {
		self.columns.values().map(|c| c.ty).collect()
	}

	pub fn and_where(&mut self, condition: SqlExpr) {
		self.where_clause = Some(match self.where_clause.take() {
			Some(existing) => existing.and(condition),
			None => condition,
		});
	}

	pub fn and_having(&mut self, condition: SqlExpr) {
		self.having = Some(match self.having.take() {
			Some(existing) => existing.and(condition),
			None => condition,
		});
	}
}

impl SqlExpr {
	pub fn column(name: impl Into<String>) -> Self {
		SqlExpr::Column {
			qualifier: None,
			name: name.into(),
		}
	}

	pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
		SqlExpr::Column {
			qualifier: Some(qualifier.into()),
			name: name.into(),
		}
	}

	pub fn literal(value: impl Into<Value>) -> Self {
		SqlExpr::Literal(value.into())
	}

	pub fn binary(self, op: SqlBinaryOp, right: SqlExpr) -> Self {
		SqlExpr::Binary {
			op,
			left: Box::new(self),
			right: Box::new(right),
		}
	}

	pub fn and(self, right: SqlExpr) -> Self {
		self.binary(SqlBinaryOp::And, right)
	}

	pub fn function(name: impl Into<String>, args: Vec<SqlExpr>) -> Self {
		SqlExpr::Function {
			name: name.into(),
			args,
			distinct: false,
		}
	}

	pub fn cast(self, ty: Type) -> Self {
		SqlExpr::Cast {
			expr: Box::new(self),
			ty,
		}
	}

	pub fn is_window(&self) -> bool {
		matches!(self, SqlExpr::Window { .. })
	}

	/// True when a window function occurs anywhere in the tree.
	pub fn contains_window(&self) -> bool {
		let mut found = false;
		self.visit(&mut |e| found |= e.is_window());
		found
	}

	/// True when an aggregate function call occurs outside any window.
	pub fn contains_aggregate(&self) -> bool {
		match self {
			SqlExpr::Window {
				..
			} => false,
			SqlExpr::Function {
				name,
				args,
				..
			} => is_aggregate_function(name) || args.iter().any(|a| a.contains_aggregate()),
			other => other.children().iter().any(|c| c.contains_aggregate()),
		}
	}

	/// A copy where every unqualified column `pick` accepts is qualified
	/// with `qualifier`. Subqueries keep their own scope.
	pub fn qualify(&self, qualifier: &str, pick: &impl Fn(&str) -> bool) -> SqlExpr {
		let q = |e: &SqlExpr| e.qualify(qualifier, pick);
		let boxed = |e: &SqlExpr| Box::new(e.qualify(qualifier, pick));
		match self {
			SqlExpr::Column {
				qualifier: None,
				name,
			} if pick(name.as_str()) => SqlExpr::qualified(qualifier, name.clone()),
			SqlExpr::Column {
				..
			}
			| SqlExpr::Literal(_)
			| SqlExpr::Star
			| SqlExpr::Exists {
				..
			} => self.clone(),
			SqlExpr::Binary {
				op,
				left,
				right,
			} => SqlExpr::Binary {
				op: *op,
				left: boxed(left),
				right: boxed(right),
			},
			SqlExpr::Unary {
				op,
				operand,
			} => SqlExpr::Unary {
				op: *op,
				operand: boxed(operand),
			},
			SqlExpr::Function {
				name,
				args,
				distinct,
			} => SqlExpr::Function {
				name: name.clone(),
				args: args.iter().map(q).collect(),
				distinct: *distinct,
			},
			SqlExpr::Window {
				function,
				partition_by,
				order_by,
				frame,
			} => SqlExpr::Window {
				function: boxed(function),
				partition_by: partition_by.iter().map(q).collect(),
				order_by: order_by
					.iter()
					.map(|o| OrderBy {
						expr: q(&o.expr),
						descending: o.descending,
					})
					.collect(),
				frame: *frame,
			},
			SqlExpr::Case {
				cases,
				default,
			} => SqlExpr::Case {
				cases: cases.iter().map(|(c, v)| (q(c), q(v))).collect(),
				default: default.as_deref().map(boxed),
			},
			SqlExpr::Cast {
				expr,
				ty,
			} => SqlExpr::Cast {
				expr: boxed(expr),
				ty: *ty,
			},
			SqlExpr::IsNull {
				expr,
				negated,
			} => SqlExpr::IsNull {
				expr: boxed(expr),
				negated: *negated,
			},
			SqlExpr::InList {
				expr,
				list,
			} => SqlExpr::InList {
				expr: boxed(expr),
				list: list.iter().map(q).collect(),
			},
		}
	}

	fn children(&self) -> Vec<&SqlExpr> {
		match self {
			SqlExpr::Column {
				..
			}
			| SqlExpr::Literal(_)
			| SqlExpr::Star
			| SqlExpr::Exists {
				..
			} => vec![],
			SqlExpr::Binary {
				left,
				right,
				..
			} => vec![left.as_ref(), right.as_ref()],
			SqlExpr::Unary {
				operand,
				..
			} => vec![operand.as_ref()],
			SqlExpr::Function {
				args,
				..
			} => args.iter().collect(),
			SqlExpr::Window {
				function,
				partition_by,
				order_by,
				..
			} => {
				let mut out = vec![function.as_ref()];
				out.extend(partition_by.iter());
				out.extend(order_by.iter().map(|o| &o.expr));
				out
			}
			SqlExpr::Case {
				cases,
				default,
			} => {
				let mut out: Vec<&SqlExpr> = cases.iter().flat_map(|(c, v)| [c, v]).collect();
				if let Some(default) = default {
					out.push(default.as_ref());
				}
				out
			}
			SqlExpr::Cast {
				expr,
				..
			}
			| SqlExpr::IsNull {
				expr,
				..
			} => vec![expr.as_ref()],
			SqlExpr::InList {
				expr,
				list,
			} => {
				let mut out = vec![expr.as_ref()];
				out.extend(list.iter());
				out
			}
		}
	}

	fn visit(&self, f: &mut impl FnMut(&SqlExpr)) {
		f(self);
		for child in self.children() {
			child.visit(f);
		}
	}
}

pub fn is_aggregate_function(name: &str) -> bool {
	matches!(
		name.to_ascii_uppercase().as_str(),
		"SUM" | "AVG" | "MIN" | "MAX" | "COUNT" | "MEDIAN" | "STDDEV_SAMP" | "VAR_SAMP" | "TOTAL"
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_wrap_projects_by_name() {
		let select = Select::from_table("t", &[("a".to_string(), Type::Int8), ("b".to_string(), Type::Utf8)]);
		let wrapped = select.clone().wrap("_q1");
		assert_eq!(wrapped.column_names(), vec!["a", "b"]);
		assert_eq!(wrapped.types(), vec![Type::Int8, Type::Utf8]);
		assert_eq!(
			wrapped.from,
			FromClause::Subquery {
				query: Box::new(select),
				alias: "_q1".to_string()
			}
		);
	}

	#[test]
	fn test_contains_window() {
		let window = SqlExpr::Window {
			function: Box::new(SqlExpr::function("SUM", vec![SqlExpr::column("x")])),
			partition_by: vec![],
			order_by: vec![],
			frame: None,
		};
		let expr = SqlExpr::column("x").binary(SqlBinaryOp::Sub, window);
		assert!(expr.contains_window());
		assert!(!expr.contains_aggregate());
		assert!(!SqlExpr::column("x").contains_window());
	}

	#[test]
	fn test_contains_aggregate() {
		let expr = SqlExpr::function("SUM", vec![SqlExpr::column("x")]).binary(SqlBinaryOp::Add, SqlExpr::literal(1));
		assert!(expr.contains_aggregate());
		assert!(!SqlExpr::function("ABS", vec![SqlExpr::column("x")]).contains_aggregate());
	}

	#[test]
	fn test_and_where_combines() {
		let mut select = Select::from_table("t", &[("a".to_string(), Type::Int8)]);
		select.and_where(SqlExpr::column("a").binary(SqlBinaryOp::Gt, SqlExpr::literal(1)));
		select.and_where(SqlExpr::column("a").binary(SqlBinaryOp::Lt, SqlExpr::literal(5)));
		assert!(matches!(
			select.where_clause,
			Some(SqlExpr::Binary {
				op: SqlBinaryOp::And,
				..
			})
		));
	}
}
