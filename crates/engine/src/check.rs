// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Rules every backend enforces the same way, checked before a verb touches
//! any data.

use tidyq_expr::{Classification, Classifier, Expr, FunctionMode};
use tidyq_verb::{Assignments, Grouping};
use tracing::warn;

use crate::context::Context;

/// A `summarize` expression may only see columns that existed before the
/// call, never a name assigned earlier in the same call.
pub(crate) fn no_same_call_reference(ctx: &Context, items: &Assignments) -> crate::Result<()> {
	let mut assigned: Vec<&str> = Vec::with_capacity(items.len());
	for (name, expr) in items {
		if let Some(column) = expr.op_vars().into_iter().find(|v| assigned.contains(&v.as_str())) {
			return Err(ctx.same_call_reference(column, expr));
		}
		assigned.push(name);
	}
	Ok(())
}

/// A `summarize` expression must reduce each group to a single value: no
/// cumulative windows, and every column outside an aggregate is a group key.
pub(crate) fn reduces(
	ctx: &Context,
	expr: &Expr,
	classification: &Classification,
	groups: &[String],
) -> crate::Result<()> {
	if classification.has_cumulative() {
		return Err(ctx.invalid_argument(expr, "summarize needs expressions that reduce each group to one value"));
	}
	if let Some(column) = bare_columns(expr).into_iter().find(|c| !groups.contains(c)) {
		return Err(ctx.invalid_argument(
			expr,
			format!("column '{column}' is not reduced; wrap it in an aggregate such as mean()"),
		));
	}
	Ok(())
}

// columns referenced outside any aggregate or cumulative call
fn bare_columns(expr: &Expr) -> Vec<String> {
	if Classifier::is_window(expr) {
		return vec![];
	}
	if let Some(name) = expr.column_name() {
		return vec![name.to_string()];
	}
	expr.children().into_iter().flat_map(bare_columns).collect()
}

/// `select` may neither drop nor rename a grouping column. `selection` holds
/// `(output, source)` pairs.
pub(crate) fn keeps_groups(ctx: &Context, selection: &[(String, String)], groups: &[String]) -> crate::Result<()> {
	for group in groups {
		match selection.iter().find(|(_, source)| source == group) {
			Some((output, _)) if output == group => {}
			_ => return Err(ctx.drops_grouping_column(group.clone())),
		}
	}
	Ok(())
}

/// Logs windows whose result depends on row order when no `arrange` has set
/// one. The result is still computed in whatever order the backend yields.
pub(crate) fn warn_unordered(ctx: &Context, expr: &Expr, classification: &Classification, grouping: &Grouping) {
	if grouping.is_ordered() || !classification.windows.iter().any(order_dependent) {
		return;
	}
	warn!(
		verb = %ctx.verb,
		backend = %ctx.backend,
		expression = %expr,
		"order dependent window without a prior arrange; row order is not guaranteed"
	);
}

fn order_dependent(window: &Expr) -> bool {
	let Expr::Call {
		name,
		args,
	} = window
	else {
		return false;
	};
	match name.as_str() {
		"rank" | "min_rank" | "dense_rank" | "percent_rank" => false,
		"row_number" => matches!(args.first(), Some(Expr::Placeholder)),
		_ => Classifier::mode_of(window) == Some(FunctionMode::Cumulative),
	}
}

/// Keys given as expressions rather than as a reference to a column of the
/// same name. They are computed as a `mutate` before the verb runs.
pub(crate) fn computed_keys(keys: &Assignments) -> Assignments {
	keys.iter().filter(|(name, expr)| expr.column_name() != Some(name.as_str())).cloned().collect()
}

/// Group keys followed by `names`, each once.
pub(crate) fn with_groups<'a>(groups: &[String], names: impl IntoIterator<Item = &'a String>) -> Vec<String> {
	let mut result = groups.to_vec();
	for name in names {
		if !result.contains(name) {
			result.push(name.clone());
		}
	}
	result
}

#[cfg(test)]
mod tests {
	use tidyq_expr::{PLACEHOLDER, col, lit, n, row_number};
	use tidyq_type::{BackendKind, VerbKind};

	use super::*;

	fn ctx() -> Context {
		Context::new(VerbKind::Summarize, BackendKind::Eager)
	}

	fn items(pairs: &[(&str, Expr)]) -> Assignments {
		pairs.iter().map(|(n, e)| (n.to_string(), e.clone())).collect()
	}

	#[test]
	fn test_same_call_reference() {
		let ok = items(&[("m", col("x").mean()), ("s", col("x").sum())]);
		assert!(no_same_call_reference(&ctx(), &ok).is_ok());

		let bad = items(&[("m", col("x").mean()), ("d", col("m") * 2)]);
		let err = no_same_call_reference(&ctx(), &bad).unwrap_err();
		assert_eq!(err.code, "RESOLVE_003");
		assert_eq!(err.expression.as_deref(), Some("_.m * 2"));
	}

	#[test]
	fn test_reduces() {
		let groups = vec!["g".to_string()];
		let check = |expr: Expr| {
			let classification = Classifier::classify(&expr, &groups).unwrap();
			reduces(&ctx(), &expr, &classification, &groups)
		};
		assert!(check(col("x").mean() - col("x").min()).is_ok());
		assert!(check(col("g") * 10).is_ok());
		assert!(check(lit(1)).is_ok());
		assert!(check(n(PLACEHOLDER)).is_ok());
		assert_eq!(check(col("x") + 1).unwrap_err().code, "RESOLVE_006");
		assert_eq!(check(col("x").cumsum()).unwrap_err().code, "RESOLVE_006");
	}

	#[test]
	fn test_keeps_groups() {
		let groups = vec!["g".to_string()];
		let pairs = |items: &[(&str, &str)]| -> Vec<(String, String)> {
			items.iter().map(|(o, s)| (o.to_string(), s.to_string())).collect()
		};
		assert!(keeps_groups(&ctx(), &pairs(&[("g", "g"), ("x", "x")]), &groups).is_ok());
		assert_eq!(keeps_groups(&ctx(), &pairs(&[("x", "x")]), &groups).unwrap_err().code, "GROUP_002");
		assert_eq!(keeps_groups(&ctx(), &pairs(&[("h", "g")]), &groups).unwrap_err().code, "GROUP_002");
	}

	#[test]
	fn test_order_dependent() {
		assert!(order_dependent(&col("x").cumsum()));
		assert!(order_dependent(&row_number(PLACEHOLDER)));
		assert!(!order_dependent(&row_number(col("x"))));
		assert!(!order_dependent(&col("x").rank()));
		assert!(!order_dependent(&col("x").mean()));
	}

	#[test]
	fn test_computed_keys() {
		let keys = items(&[("g", col("g")), ("h", col("x") % 2)]);
		assert_eq!(computed_keys(&keys), items(&[("h", col("x") % 2)]));
		assert_eq!(
			with_groups(&["g".to_string()], &["h".to_string(), "g".to_string()]),
			vec!["g".to_string(), "h".to_string()]
		);
	}
}
