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

//! Configuration of the beacon and chain collaborators.
//! The defaults target drand's quicknet and a local node.

use std::time::Duration;

/// The chain hash of drand's quicknet
/// https://api.drand.sh/52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971/info
pub const QUICKNET_CHAIN_HASH: &str =
	"52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971";

/// Public drand HTTP endpoints, tried in order
pub const DRAND_ENDPOINTS: &[&str] = &[
	"https://api.drand.sh",
	"https://api2.drand.sh",
	"https://api3.drand.sh",
	"https://drand.cloudflare.com",
	"https://api.drand.secureweb3.com:6875",
];

/// The overall budget for fetching a single beacon response, in milliseconds
pub const HTTP_FETCH_TIMEOUT: u64 = 10_000;

/// The name of the pallet that stores pulses
pub const DRAND_PALLET: &str = "Drand";

/// The call index of `write_pulse` within the pallet
pub const WRITE_PULSE_CALL_INDEX: u8 = 1;

/// Where and how pulses are fetched
#[derive(Clone, Debug, PartialEq)]
pub struct BeaconConfig {
	/// Endpoint base URIs in failover order
	pub endpoints: Vec<String>,
	/// The hex chain hash identifying the drand network
	pub chain_hash: String,
	/// The budget for one fetch across all endpoints
	pub total_timeout: Duration,
	/// The bound on a single HTTP request
	pub request_timeout: Duration,
}

impl Default for BeaconConfig {
	fn default() -> Self {
		Self {
			endpoints: DRAND_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
			chain_hash: QUICKNET_CHAIN_HASH.to_string(),
			total_timeout: Duration::from_millis(HTTP_FETCH_TIMEOUT),
			request_timeout: Duration::from_millis(HTTP_FETCH_TIMEOUT),
		}
	}
}

/// Where pulses are written
#[derive(Clone, Debug, PartialEq)]
pub struct ChainConfig {
	/// The websocket RPC address of the node
	pub url: String,
	/// The name of the pallet, used to derive storage keys
	pub pallet: String,
	/// The index of the pallet in the runtime
	pub pallet_index: u8,
	/// The index of `write_pulse` in the pallet
	pub call_index: u8,
}

impl ChainConfig {
	pub fn new(url: impl Into<String>, pallet_index: u8) -> Self {
		Self {
			url: url.into(),
			pallet: DRAND_PALLET.to_string(),
			pallet_index,
			call_index: WRITE_PULSE_CALL_INDEX,
		}
	}
}
