// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use crate::{Column, Frame};

/// Escape newlines and tabs for single-line display.
fn escape_control_chars(s: &str) -> String {
	s.replace('\n', "\\n").replace('\t', "\\t")
}

fn cell(col: &Column, row: usize) -> String {
	escape_control_chars(&col.data.get(row).to_string())
}

impl Display for Frame {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let row_count = self.row_count();

		let mut col_widths: Vec<usize> = self.columns.iter().map(|c| c.name.chars().count()).collect();
		for row in 0..row_count {
			for (idx, col) in self.columns.iter().enumerate() {
				col_widths[idx] = col_widths[idx].max(cell(col, row).chars().count());
			}
		}

		let sep = format!("+{}+", col_widths.iter().map(|w| "-".repeat(*w + 2)).collect::<Vec<_>>().join("+"));
		writeln!(f, "{}", sep)?;

		let header = self
			.columns
			.iter()
			.zip(&col_widths)
			.map(|(col, w)| format!(" {:^width$} ", col.name, width = *w))
			.collect::<Vec<_>>();
		writeln!(f, "|{}|", header.join("|"))?;
		writeln!(f, "{}", sep)?;

		for row in 0..row_count {
			let line = self
				.columns
				.iter()
				.zip(&col_widths)
				.map(|(col, w)| format!(" {:>width$} ", cell(col, row), width = *w))
				.collect::<Vec<_>>();
			writeln!(f, "|{}|", line.join("|"))?;
		}

		writeln!(f, "{}", sep)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display() {
		let frame = Frame::new(vec![Column::int8("x", [1, 10]), Column::utf8("name", ["a", "b\nc"])]).unwrap();
		let expected = "\
+----+------+
| x  | name |
+----+------+
|  1 |    a |
| 10 | b\\nc |
+----+------+
";
		assert_eq!(frame.to_string(), expected);
	}
}
