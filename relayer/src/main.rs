/*
 * Copyright 2025 by Ideal Labs, LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Drand bridge relayer.

use clap::Parser;

mod cli;
mod service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = cli::Cli::parse();

	// also captures records emitted through the `log` facade
	tracing_subscriber::fmt().with_max_level(cli.log_level).init();

	service::run(cli).await
}
