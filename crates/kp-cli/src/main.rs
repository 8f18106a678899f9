// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use kp_cli::{Cli, Parser, COMPONENT};
use kp_secret_service::DbusSecretStore;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    cli.logging.init(COMPONENT)?;

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let report = runtime.block_on(cli.execute(Arc::new(DbusSecretStore::new())));
    // A daemon call that outlived the timeout must not hold up the exit
    runtime.shutdown_background();

    print!("{}", cli.render(&report));
    Ok(ExitCode::from(report.exit_code()))
}
