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

//! Decides whether a block should trigger a submission and which rounds it should carry.
//! The gate keeps no memory: every decision is derived from freshly read chain state.

use sp_drand_bridge::{ChainState, RoundNumber, MAX_PULSES_TO_FETCH};
use std::ops::RangeInclusive;

/// Why a cycle submits nothing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
	/// The runtime does not accept unsigned submissions before `next_unsigned_at`
	BelowThreshold { current_block: u32, next_unsigned_at: u32 },
	/// The chain already holds the latest round
	NoNewRounds { latest_round: RoundNumber, last_stored_round: RoundNumber },
}

/// The outcome of the gate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
	Skip(SkipReason),
	/// Fetch these rounds, in ascending order
	Fetch(RangeInclusive<RoundNumber>),
}

#[derive(Clone, Copy, Debug)]
pub struct SubmissionGate {
	max_pulses: u64,
}

impl Default for SubmissionGate {
	fn default() -> Self {
		Self { max_pulses: MAX_PULSES_TO_FETCH }
	}
}

impl SubmissionGate {
	/// A gate fetching at most `max_pulses` per cycle, capped at [`MAX_PULSES_TO_FETCH`]
	pub fn new(max_pulses: u64) -> Self {
		Self { max_pulses: max_pulses.clamp(1, MAX_PULSES_TO_FETCH) }
	}

	pub fn max_pulses(&self) -> u64 {
		self.max_pulses
	}

	/// Check the block threshold. This needs no beacon data, so a closed gate costs no fetch.
	pub fn check_threshold(&self, current_block: u32, state: &ChainState) -> Result<(), SkipReason> {
		if current_block < state.next_unsigned_at {
			return Err(SkipReason::BelowThreshold {
				current_block,
				next_unsigned_at: state.next_unsigned_at,
			});
		}
		Ok(())
	}

	/// Decide which rounds to relay given the latest round published by the beacon
	pub fn decide(
		&self,
		current_block: u32,
		state: &ChainState,
		latest_round: RoundNumber,
	) -> Decision {
		if let Err(reason) = self.check_threshold(current_block, state) {
			return Decision::Skip(reason);
		}

		// nothing stored yet: only the latest round counts as new
		let last_stored_round = match state.last_stored_round {
			0 => latest_round.saturating_sub(1),
			round => round,
		};

		if latest_round <= last_stored_round {
			return Decision::Skip(SkipReason::NoNewRounds { latest_round, last_stored_round });
		}

		let rounds_to_fetch = (latest_round - last_stored_round).min(self.max_pulses);
		Decision::Fetch(last_stored_round + 1..=last_stored_round + rounds_to_fetch)
	}
}
