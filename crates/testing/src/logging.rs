// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: OnceCell<()> = OnceCell::new();

/// Installs a test writer subscriber once per process. `RUST_LOG` selects
/// what is shown; nothing is printed by default.
pub fn init_tracing() {
	INIT.get_or_init(|| {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
		let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
	});
}
