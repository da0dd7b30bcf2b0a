// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_type::Value;

use crate::{
	Dialect,
	ast::{FromClause, OrderBy, Select, SqlBinaryOp, SqlExpr, SqlUnaryOp, WindowFrame},
};

/// Renders query trees to SQL text. Literals are inlined.
pub struct Renderer<'a> {
	dialect: &'a Dialect,
}

impl<'a> Renderer<'a> {
	pub fn new(dialect: &'a Dialect) -> Self {
		Self {
			dialect,
		}
	}

	pub fn render(&self, select: &Select) -> String {
		let mut parts = Vec::new();

		let columns = select
			.columns
			.iter()
			.map(|(name, column)| match &column.expr {
				SqlExpr::Column {
					qualifier: None,
					name: source,
				} if source == name => self.ident(name),
				expr => format!("{} AS {}", self.expr(expr), self.ident(name)),
			})
			.collect::<Vec<_>>()
			.join(", ");

		if select.distinct {
			parts.push(format!("SELECT DISTINCT {columns}"));
		} else {
			parts.push(format!("SELECT {columns}"));
		}

		parts.push(format!("FROM {}", self.from(&select.from)));

		if let Some(condition) = &select.where_clause {
			parts.push(format!("WHERE {}", self.expr(condition)));
		}

		if !select.group_by.is_empty() {
			parts.push(format!("GROUP BY {}", self.list(&select.group_by)));
		}

		if let Some(condition) = &select.having {
			parts.push(format!("HAVING {}", self.expr(condition)));
		}

		if !select.order_by.is_empty() {
			parts.push(format!("ORDER BY {}", self.order_by(&sort_keys(select))));
		}

		if let Some(limit) = select.limit {
			parts.push(format!("LIMIT {limit}"));
		}

		parts.join(" ")
	}

	fn ident(&self, name: &str) -> String {
		self.dialect.quote_identifier(name)
	}

	fn list(&self, exprs: &[SqlExpr]) -> String {
		exprs.iter().map(|e| self.expr(e)).collect::<Vec<_>>().join(", ")
	}

	fn order_by(&self, order: &[OrderBy]) -> String {
		order.iter()
			.map(|o| {
				let direction = if o.descending { "DESC" } else { "ASC" };
				format!("{} {direction} NULLS LAST", self.expr(&o.expr))
			})
			.collect::<Vec<_>>()
			.join(", ")
	}

	fn from(&self, from: &FromClause) -> String {
		match from {
			FromClause::Table {
				name,
				alias,
			} => match alias {
				Some(alias) => format!("{} AS {}", self.ident(name), self.ident(alias)),
				None => self.ident(name),
			},
			FromClause::Subquery {
				query,
				alias,
			} => format!("({}) AS {}", self.render(query), self.ident(alias)),
			FromClause::Join {
				left,
				right,
				kind,
				on,
			} => {
				let condition = on
					.iter()
					.map(|(l, r)| format!("{} = {}", self.expr(l), self.expr(r)))
					.collect::<Vec<_>>()
					.join(" AND ");
				format!("{} {} {} ON {}", self.from(left), kind.keyword(), self.from(right), condition)
			}
		}
	}

	fn literal(&self, value: &Value) -> String {
		match value {
			Value::Undefined => "NULL".to_string(),
			Value::Boolean(b) => self.dialect.bool_literal(*b).to_string(),
			Value::Int8(i) => i.to_string(),
			Value::Float8(f) => format_float(f.value()),
			Value::Utf8(s) => self.dialect.quote_string(s),
		}
	}

	// binary operands are parenthesised unless they are atoms
	fn operand(&self, expr: &SqlExpr) -> String {
		match expr {
			SqlExpr::Binary {
				..
			}
			| SqlExpr::Case {
				..
			}
			| SqlExpr::InList {
				..
			} => format!("({})", self.expr(expr)),
			_ => self.expr(expr),
		}
	}

	pub fn expr(&self, expr: &SqlExpr) -> String {
		match expr {
			SqlExpr::Column {
				qualifier,
				name,
			} => match qualifier {
				Some(qualifier) => format!("{}.{}", self.ident(qualifier), self.ident(name)),
				None => self.ident(name),
			},
			SqlExpr::Literal(value) => self.literal(value),
			SqlExpr::Binary {
				op,
				left,
				right,
			} => format!("{} {} {}", self.operand(left), op.as_str(), self.operand(right)),
			SqlExpr::Unary {
				op: SqlUnaryOp::Neg,
				operand,
			} => format!("-({})", self.expr(operand)),
			SqlExpr::Unary {
				op: SqlUnaryOp::Not,
				operand,
			} => format!("NOT ({})", self.expr(operand)),
			SqlExpr::Function {
				name,
				args,
				distinct,
			} => {
				let distinct = if *distinct { "DISTINCT " } else { "" };
				format!("{name}({distinct}{})", self.list(args))
			}
			SqlExpr::Window {
				function,
				partition_by,
				order_by,
				frame,
			} => {
				let mut over = Vec::new();
				if !partition_by.is_empty() {
					over.push(format!("PARTITION BY {}", self.list(partition_by)));
				}
				if !order_by.is_empty() {
					over.push(format!("ORDER BY {}", self.order_by(order_by)));
				}
				if let Some(WindowFrame::RowsUnboundedPreceding) = frame {
					over.push("ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW".to_string());
				}
				format!("{} OVER ({})", self.expr(function), over.join(" "))
			}
			SqlExpr::Case {
				cases,
				default,
			} => {
				let mut out = String::from("CASE");
				for (condition, value) in cases {
					out.push_str(&format!(" WHEN {} THEN {}", self.expr(condition), self.expr(value)));
				}
				if let Some(default) = default {
					out.push_str(&format!(" ELSE {}", self.expr(default)));
				}
				out.push_str(" END");
				out
			}
			SqlExpr::Cast {
				expr,
				ty,
			} => format!("CAST({} AS {})", self.expr(expr), self.dialect.cast_type(*ty)),
			SqlExpr::IsNull {
				expr,
				negated,
			} => {
				let not = if *negated { "NOT " } else { "" };
				format!("({} IS {not}NULL)", self.expr(expr))
			}
			SqlExpr::InList {
				expr,
				list,
			} => format!("{} IN ({})", self.operand(expr), self.list(list)),
			SqlExpr::Exists {
				query,
				negated,
			} => {
				let not = if *negated { "NOT " } else { "" };
				format!("{not}EXISTS ({})", self.render(query))
			}
			SqlExpr::Star => "*".to_string(),
		}
	}
}

// sqlite binds a bare ORDER BY name to an output alias before a source
// column, so a source column hidden by an alias of another definition is
// qualified
fn sort_keys(select: &Select) -> Vec<OrderBy> {
	let qualifier = match &select.from {
		FromClause::Table {
			name,
			alias,
		} => alias.as_ref().unwrap_or(name),
		FromClause::Subquery {
			alias,
			..
		} => alias,
		FromClause::Join {
			..
		} => return select.order_by.clone(),
	};
	let shadowed = |name: &str| select.columns.get(name).is_some_and(|c| c.expr != SqlExpr::column(name));
	select.order_by
		.iter()
		.map(|order| OrderBy {
			expr: order.expr.qualify(qualifier, &shadowed),
			descending: order.descending,
		})
		.collect()
}

fn format_float(f: f64) -> String {
	if f.is_infinite() {
		return if f > 0.0 { "9e999".to_string() } else { "-9e999".to_string() };
	}
	let s = f.to_string();
	if s.contains('.') || s.contains('e') { s } else { format!("{s}.0") }
}
