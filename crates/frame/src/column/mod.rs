// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub use data::ColumnData;
use serde::{Deserialize, Serialize};
use tidyq_type::Value;

use crate::FrameError;

mod data;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
	pub name: String,
	pub data: ColumnData,
}

impl Column {
	pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
		Self {
			name: name.into(),
			data,
		}
	}

	pub fn bool(name: &str, values: impl IntoIterator<Item = bool>) -> Self {
		Self::new(name, ColumnData::bool(values))
	}

	pub fn int8(name: &str, values: impl IntoIterator<Item = i64>) -> Self {
		Self::new(name, ColumnData::int8(values))
	}

	pub fn float8(name: &str, values: impl IntoIterator<Item = f64>) -> Self {
		Self::new(name, ColumnData::float8(values))
	}

	pub fn utf8<'a>(name: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
		Self::new(name, ColumnData::utf8(values))
	}

	pub fn undefined(name: &str, len: usize) -> Self {
		Self::new(name, ColumnData::undefined(len))
	}

	pub fn from_values(name: &str, values: impl IntoIterator<Item = Value>) -> Result<Self, FrameError> {
		Ok(Self::new(name, ColumnData::from_values(values)?))
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn renamed(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}
}
