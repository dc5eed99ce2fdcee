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

//! The per-block cycle: read chain state, consult the gate, fetch and validate the missing
//! pulses, then sign and submit them.
//!
//! Cycles are independent. A failure anywhere aborts the cycle without submitting a partial
//! batch, and since the chain state is unchanged the next block retries the same rounds.

use sp_core::sr25519;
use sp_drand_bridge::{InvalidPulseError, PulsesPayload};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
	chain::ChainApi,
	error::Error,
	fetcher::{BeaconRound, EndpointFetcher},
	gate::{Decision, SkipReason, SubmissionGate},
	submitter::{SubmissionResult, Submitter},
};

const LOG_TARGET: &str = "drand-worker";

/// The result of one cycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
	Skipped(SkipReason),
	Submitted(SubmissionResult),
}

/// The worker responsible for relaying pulses to the runtime
pub struct PulseWorker<C> {
	chain: Arc<C>,
	fetcher: EndpointFetcher,
	gate: SubmissionGate,
	submitter: Submitter<C>,
}

impl<C: ChainApi> PulseWorker<C> {
	pub fn new(
		chain: Arc<C>,
		fetcher: EndpointFetcher,
		gate: SubmissionGate,
		pair: sr25519::Pair,
	) -> Self {
		let submitter = Submitter::new(chain.clone(), pair);
		Self { chain, fetcher, gate, submitter }
	}

	/// Run a full cycle for a newly imported block
	pub async fn run_cycle(&self, block_number: u32) -> Result<CycleOutcome, Error> {
		let state = self.chain.chain_state().await?;
		if let Err(reason) = self.gate.check_threshold(block_number, &state) {
			return Ok(CycleOutcome::Skipped(reason));
		}

		let latest = self.fetcher.fetch_pulse(BeaconRound::Latest).await?;
		let rounds = match self.gate.decide(block_number, &state, latest.round) {
			Decision::Skip(reason) => return Ok(CycleOutcome::Skipped(reason)),
			Decision::Fetch(rounds) => rounds,
		};

		log::debug!(
			target: LOG_TARGET,
			"Fetching rounds {}-{} for block {}",
			rounds.start(),
			rounds.end(),
			block_number
		);

		// sequential, so the payload keeps ascending order
		let mut pulses = Vec::with_capacity(self.gate.max_pulses() as usize);
		for round in rounds {
			let pulse = self.fetcher.fetch_pulse(BeaconRound::At(round)).await?;
			if pulse.round != round {
				let found = pulse.round;
				return Err(InvalidPulseError::UnexpectedRound { requested: round, found }.into());
			}
			pulses.push(pulse);
		}

		let payload = PulsesPayload::new(block_number, pulses, self.submitter.public())?;
		let result = self.submitter.submit(payload).await?;
		Ok(CycleOutcome::Submitted(result))
	}

	/// Process block numbers one at a time until the sender is dropped
	pub async fn run(self, mut blocks: UnboundedReceiver<u32>) {
		log::info!(target: LOG_TARGET, "🎲 Starting drand pulse worker");

		while let Some(block_number) = blocks.recv().await {
			match self.run_cycle(block_number).await {
				Ok(CycleOutcome::Submitted(SubmissionResult::Included { block_hash, rounds })) => {
					log::info!(
						target: LOG_TARGET,
						"✅ Submitted pulses from round {} up to {} in block {}",
						rounds.start(),
						rounds.end(),
						block_hash
					);
				},
				Ok(CycleOutcome::Submitted(SubmissionResult::Rejected { rounds, reason })) => {
					log::warn!(
						target: LOG_TARGET,
						"❌ Rounds {}-{} were rejected: {}",
						rounds.start(),
						rounds.end(),
						reason
					);
				},
				Ok(CycleOutcome::Skipped(reason)) => {
					log::debug!(target: LOG_TARGET, "Block {}: skipped, {:?}", block_number, reason);
				},
				Err(e) => {
					log::error!(target: LOG_TARGET, "Block {}: cycle failed: {}", block_number, e);
				},
			}
		}

		log::info!(target: LOG_TARGET, "Block feed closed, stopping the pulse worker");
	}
}
