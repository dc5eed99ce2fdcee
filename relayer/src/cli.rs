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

use clap::Parser;
use sc_drand_bridge::config::{
	BeaconConfig, ChainConfig, DRAND_ENDPOINTS, DRAND_PALLET, HTTP_FETCH_TIMEOUT,
	QUICKNET_CHAIN_HASH, WRITE_PULSE_CALL_INDEX,
};
use sp_drand_bridge::MAX_PULSES_TO_FETCH;
use std::time::Duration;
use tracing::Level;

/// Relay drand pulses to the Drand pallet as unsigned extrinsics.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
	/// The websocket RPC address of the node
	#[arg(long, default_value = "ws://127.0.0.1:9944")]
	pub node_url: String,

	/// The secret URI of the sr25519 key that signs payloads, e.g. `//Bob`
	#[arg(long)]
	pub suri: String,

	/// Drand HTTP endpoints, tried in the given order
	#[arg(long, value_delimiter = ',', default_values_t = DRAND_ENDPOINTS.iter().map(|e| e.to_string()))]
	pub endpoints: Vec<String>,

	/// The chain hash of the drand network
	#[arg(long, default_value = QUICKNET_CHAIN_HASH)]
	pub chain_hash: String,

	/// The budget for fetching one beacon response across all endpoints, in milliseconds
	#[arg(long, default_value_t = HTTP_FETCH_TIMEOUT)]
	pub fetch_timeout_ms: u64,

	/// The timeout of a single beacon request, in milliseconds
	#[arg(long, default_value_t = HTTP_FETCH_TIMEOUT)]
	pub request_timeout_ms: u64,

	/// The maximum number of pulses relayed per block
	#[arg(long, default_value_t = MAX_PULSES_TO_FETCH)]
	pub max_pulses: u64,

	/// The name of the pallet storing pulses
	#[arg(long, default_value = DRAND_PALLET)]
	pub pallet: String,

	/// The index of the pallet in the runtime
	#[arg(long)]
	pub pallet_index: u8,

	/// The index of `write_pulse` in the pallet
	#[arg(long, default_value_t = WRITE_PULSE_CALL_INDEX)]
	pub call_index: u8,

	/// The log level. opts: (error, warn, info, debug, trace)
	#[arg(long, default_value_t = Level::INFO)]
	pub log_level: Level,
}

impl Cli {
	pub fn beacon_config(&self) -> BeaconConfig {
		BeaconConfig {
			endpoints: self.endpoints.clone(),
			chain_hash: self.chain_hash.clone(),
			total_timeout: Duration::from_millis(self.fetch_timeout_ms),
			request_timeout: Duration::from_millis(self.request_timeout_ms),
		}
	}

	pub fn chain_config(&self) -> ChainConfig {
		ChainConfig {
			url: self.node_url.clone(),
			pallet: self.pallet.clone(),
			pallet_index: self.pallet_index,
			call_index: self.call_index,
		}
	}
}
