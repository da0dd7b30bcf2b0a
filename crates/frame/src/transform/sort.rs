// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{ColumnData, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
	Asc,
	Desc,
}

/// Stable sort of `indices` by the given key columns. Undefined sorts last
/// in either direction.
pub fn sort_indices(keys: &[(&ColumnData, SortDirection)], indices: &mut [usize]) {
	indices.sort_by(|&a, &b| {
		for (col, dir) in keys {
			let va = col.get(a);
			let vb = col.get(b);
			let ord = match (va.is_undefined(), vb.is_undefined()) {
				(true, true) => Ordering::Equal,
				(true, false) => Ordering::Greater,
				(false, true) => Ordering::Less,
				(false, false) => {
					let ord = va.cmp_undefined_last(&vb);
					match dir {
						SortDirection::Asc => ord,
						SortDirection::Desc => ord.reverse(),
					}
				}
			};
			if ord != Ordering::Equal {
				return ord;
			}
		}
		Ordering::Equal
	});
}

impl Frame {
	/// The row permutation that sorts this frame by `keys`.
	pub fn sort_permutation(&self, keys: &[(&ColumnData, SortDirection)]) -> Vec<usize> {
		let mut indices: Vec<usize> = (0..self.row_count()).collect();
		sort_indices(keys, &mut indices);
		indices
	}

	pub fn sort(&self, keys: &[(String, SortDirection)]) -> crate::Result<Frame> {
		let key_refs = keys
			.iter()
			.map(|(name, dir)| self.try_column(name).map(|c| (&c.data, *dir)))
			.collect::<crate::Result<Vec<_>>>()?;
		let indices = self.sort_permutation(&key_refs);
		Ok(self.take(&indices))
	}
}
