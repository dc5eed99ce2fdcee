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

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use sp_core::sr25519;
use sp_drand_bridge::{ChainState, Pulse, PulsesPayload, RoundNumber};
use std::ops::RangeInclusive;
use wiremock::{
	matchers::{method, path},
	Mock, MockServer, ResponseTemplate,
};

use crate::{
	chain::{ChainApi, TransactionOutcome, WritePulseCall},
	error::Error,
};

pub(crate) const MOCK_CHAIN_HASH: &str = "deadbeef";

/// An in-memory chain recording every submission.
/// Included calls store their rounds unless dispatch is set to fail.
pub(crate) struct MockChain {
	state: Mutex<ChainState>,
	outcome: Mutex<TransactionOutcome>,
	dispatch_fails: Mutex<bool>,
	submitted: Mutex<Vec<WritePulseCall>>,
}

impl Default for MockChain {
	fn default() -> Self {
		Self::new(ChainState::default())
	}
}

impl MockChain {
	pub(crate) fn new(state: ChainState) -> Self {
		Self {
			state: Mutex::new(state),
			outcome: Mutex::new(TransactionOutcome::InBlock("0x01".into())),
			dispatch_fails: Mutex::new(false),
			submitted: Mutex::new(Vec::new()),
		}
	}

	pub(crate) fn set_outcome(&self, outcome: TransactionOutcome) {
		*self.outcome.lock() = outcome;
	}

	pub(crate) fn fail_dispatch(&self) {
		*self.dispatch_fails.lock() = true;
	}

	pub(crate) fn last_stored_round(&self) -> RoundNumber {
		self.state.lock().last_stored_round
	}

	pub(crate) fn submitted(&self) -> Vec<WritePulseCall> {
		self.submitted.lock().clone()
	}
}

#[async_trait]
impl ChainApi for MockChain {
	async fn next_unsigned_at(&self) -> Result<u32, Error> {
		Ok(self.state.lock().next_unsigned_at)
	}

	async fn last_stored_round(&self) -> Result<RoundNumber, Error> {
		Ok(self.state.lock().last_stored_round)
	}

	async fn last_stored_round_at(&self, _block_hash: &str) -> Result<RoundNumber, Error> {
		Ok(self.state.lock().last_stored_round)
	}

	async fn submit_unsigned(&self, call: WritePulseCall) -> Result<TransactionOutcome, Error> {
		let outcome = self.outcome.lock().clone();
		if matches!(outcome, TransactionOutcome::InBlock(_)) && !*self.dispatch_fails.lock() {
			let mut state = self.state.lock();
			state.last_stored_round = state.last_stored_round.max(*call.payload.rounds().end());
		}
		self.submitted.lock().push(call);
		Ok(outcome)
	}
}

pub(crate) fn mock_pulse(round: RoundNumber) -> Pulse {
	Pulse { round, randomness: [round as u8; 32], signature: vec![0xbb; 48] }
}

pub(crate) fn mock_payload(
	block_number: u32,
	rounds: RangeInclusive<RoundNumber>,
	public: sr25519::Public,
) -> PulsesPayload {
	PulsesPayload::new(block_number, rounds.map(mock_pulse).collect(), public).unwrap()
}

/// The JSON body a drand endpoint serves for `round`
pub(crate) fn mock_response(round: RoundNumber) -> Value {
	let pulse = mock_pulse(round);
	json!({
		"round": pulse.round,
		"randomness": hex::encode(pulse.randomness),
		"signature": hex::encode(pulse.signature),
	})
}

/// Serve `response` for `route` (a round number or `latest`), expecting `calls` requests
pub(crate) async fn mount_beacon(
	server: &MockServer,
	route: &str,
	response: ResponseTemplate,
	calls: u64,
) {
	Mock::given(method("GET"))
		.and(path(format!("/{}/public/{}", MOCK_CHAIN_HASH, route)))
		.respond_with(response)
		.expect(calls)
		.mount(server)
		.await;
}
