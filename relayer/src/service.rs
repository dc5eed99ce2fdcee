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

//! Wires the relayer together: the header subscription feeds block numbers into a channel
//! and the pulse worker drains it, one cycle at a time.

use anyhow::{anyhow, Context};
use futures::StreamExt;
use sc_drand_bridge::{
	chain::RpcChainClient, fetcher::EndpointFetcher, gate::SubmissionGate, worker::PulseWorker,
};
use sp_core::{sr25519, Pair};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::cli::Cli;

const LOG_TARGET: &str = "drand-relayer";

pub async fn run(cli: Cli) -> anyhow::Result<()> {
	let pair = sr25519::Pair::from_string(&cli.suri, None)
		.map_err(|e| anyhow!("invalid secret URI: {:?}", e))?;
	log::info!(target: LOG_TARGET, "Relaying as {}", pair.public());

	let chain = Arc::new(
		RpcChainClient::connect(cli.chain_config())
			.await
			.context("failed to connect to the node")?,
	);
	let fetcher = EndpointFetcher::new(cli.beacon_config())?;
	let worker =
		PulseWorker::new(chain.clone(), fetcher, SubmissionGate::new(cli.max_pulses), pair);

	// notifications queue here while a cycle is in flight
	let (tx, rx) = mpsc::unbounded_channel();
	let mut block_numbers = chain.block_numbers().await?;
	let feed = tokio::spawn(async move {
		while let Some(block_number) = block_numbers.next().await {
			match block_number {
				Ok(block_number) => {
					if tx.send(block_number).is_err() {
						break;
					}
				},
				Err(e) => log::warn!(target: LOG_TARGET, "Skipping block header: {}", e),
			}
		}
		log::warn!(target: LOG_TARGET, "Block header subscription ended");
	});

	tokio::select! {
		_ = worker.run(rx) => {},
		_ = tokio::signal::ctrl_c() => {
			log::info!(target: LOG_TARGET, "Shutting down");
		},
	}

	feed.abort();
	Ok(())
}
