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

//! Fetches pulses from the drand HTTP API.
//!
//! Endpoints are tried one after another in the configured order and the first `200` wins.
//! There is no racing and no cross-checking between endpoints: a fetch touches as few beacon
//! servers as possible at the cost of a higher worst-case latency.

use reqwest::StatusCode;
use serde_json::Value;
use sp_drand_bridge::{DrandResponseBody, InvalidPulseError, Pulse, RoundNumber};
use std::{fmt, time::Duration};
use tokio::time::Instant;

use crate::{config::BeaconConfig, error::Error};

const LOG_TARGET: &str = "drand-fetcher";

/// The round to request from the beacon
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeaconRound {
	Latest,
	At(RoundNumber),
}

impl fmt::Display for BeaconRound {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BeaconRound::Latest => write!(f, "latest"),
			BeaconRound::At(round) => write!(f, "{}", round),
		}
	}
}

/// Sequential failover over a fixed list of beacon endpoints
pub struct EndpointFetcher {
	http: reqwest::Client,
	config: BeaconConfig,
}

impl EndpointFetcher {
	pub fn new(config: BeaconConfig) -> Result<Self, Error> {
		let http = reqwest::Client::builder()
			.build()
			.map_err(|e| Error::HttpClient(e.to_string()))?;
		Ok(Self { http, config })
	}

	/// The path of a round relative to an endpoint
	pub fn path(&self, round: BeaconRound) -> String {
		format!("/{}/public/{}", self.config.chain_hash, round)
	}

	/// Fetch the raw JSON response for `round` from the first endpoint that serves it.
	///
	/// Each endpoint is attempted at most once. The whole fetch shares a single deadline
	/// derived from the total timeout; no endpoint is attempted once it has passed.
	pub async fn fetch(&self, round: BeaconRound) -> Result<Value, Error> {
		let path = self.path(round);
		let deadline = Instant::now() + self.config.total_timeout;

		for endpoint in &self.config.endpoints {
			let now = Instant::now();
			if now >= deadline {
				log::warn!(target: LOG_TARGET, "Fetch budget exhausted before trying {}", endpoint);
				break;
			}

			let uri = format!("{}{}", endpoint.trim_end_matches('/'), path);
			let timeout = self.config.request_timeout.min(deadline - now);
			match self.try_endpoint(&uri, timeout).await {
				Ok(body) => return Ok(body),
				Err(reason) => {
					log::debug!(target: LOG_TARGET, "Endpoint {} failed: {}", uri, reason)
				},
			}
		}

		Err(Error::NoEndpointAvailable(path))
	}

	async fn try_endpoint(&self, uri: &str, timeout: Duration) -> Result<Value, String> {
		let response =
			self.http.get(uri).timeout(timeout).send().await.map_err(|e| e.to_string())?;

		if response.status() != StatusCode::OK {
			return Err(format!("unexpected status {}", response.status()));
		}

		response.json::<Value>().await.map_err(|e| e.to_string())
	}

	/// Fetch and validate the pulse for `round`
	pub async fn fetch_pulse(&self, round: BeaconRound) -> Result<Pulse, Error> {
		let raw = self.fetch(round).await?;
		Ok(validate(raw)?)
	}
}

/// Turn a raw beacon response into a pulse
pub fn validate(raw: Value) -> Result<Pulse, InvalidPulseError> {
	let body: DrandResponseBody = serde_json::from_value(raw)
		.map_err(|e| InvalidPulseError::MalformedResponse(e.to_string()))?;
	body.try_into_pulse()
}
