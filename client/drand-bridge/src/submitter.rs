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

use sp_core::{sr25519, Pair};
use sp_drand_bridge::{PulsesPayload, RoundNumber};
use std::{ops::RangeInclusive, sync::Arc};

use crate::{
	chain::{ChainApi, TransactionOutcome, WritePulseCall},
	error::Error,
};

const LOG_TARGET: &str = "drand-submitter";

/// What happened to a submitted payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionResult {
	Included { block_hash: String, rounds: RangeInclusive<RoundNumber> },
	Rejected { rounds: RangeInclusive<RoundNumber>, reason: String },
}

/// Signs payloads and submits them as unsigned `write_pulse` extrinsics.
///
/// The extrinsic carries no transaction signature. The runtime authorizes it by checking the
/// detached signature over the encoded payload against the public key inside the payload.
pub struct Submitter<C> {
	chain: Arc<C>,
	pair: sr25519::Pair,
}

impl<C: ChainApi> Submitter<C> {
	pub fn new(chain: Arc<C>, pair: sr25519::Pair) -> Self {
		Self { chain, pair }
	}

	/// The public key that must appear in submitted payloads
	pub fn public(&self) -> sr25519::Public {
		self.pair.public()
	}

	/// Sign and submit `payload`, then wait for inclusion or rejection. There is no retry.
	///
	/// An included extrinsic only counts once the block's state holds the payload's last round.
	pub async fn submit(&self, payload: PulsesPayload) -> Result<SubmissionResult, Error> {
		if payload.public != self.public() {
			return Err(Error::SignerMismatch);
		}

		let encoded = payload.encode_payload()?;
		let signature = self.pair.sign(&encoded);
		let rounds = payload.rounds();

		log::info!(
			target: LOG_TARGET,
			"Submitting rounds {}-{} at block {}",
			rounds.start(),
			rounds.end(),
			payload.block_number
		);

		let outcome = self.chain.submit_unsigned(WritePulseCall { payload, signature }).await?;
		let block_hash = match outcome {
			TransactionOutcome::InBlock(block_hash) => block_hash,
			TransactionOutcome::Rejected(reason) => {
				return Ok(SubmissionResult::Rejected { rounds, reason })
			},
		};

		// a call that fails at dispatch is still included, but leaves storage untouched
		let stored = self.chain.last_stored_round_at(&block_hash).await?;
		if stored < *rounds.end() {
			return Ok(SubmissionResult::Rejected {
				reason: format!(
					"write_pulse failed at dispatch in block {}: last stored round is {}",
					block_hash, stored
				),
				rounds,
			});
		}

		Ok(SubmissionResult::Included { block_hash, rounds })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mock::{mock_payload, MockChain};
	use sp_drand_bridge::ChainState;

	fn submitter(chain: Arc<MockChain>) -> Submitter<MockChain> {
		Submitter::new(chain, sr25519::Pair::from_string("//Bob", None).unwrap())
	}

	#[tokio::test]
	async fn signs_the_encoded_payload() {
		let chain = Arc::new(MockChain::default());
		let submitter = submitter(chain.clone());
		let payload = mock_payload(4, 10..=12, submitter.public());

		let result = submitter.submit(payload.clone()).await.unwrap();
		assert_eq!(
			result,
			SubmissionResult::Included { block_hash: "0x01".into(), rounds: 10..=12 }
		);

		let submitted = chain.submitted();
		assert_eq!(submitted.len(), 1);
		assert_eq!(submitted[0].payload, payload);
		assert!(sr25519::Pair::verify(
			&submitted[0].signature,
			payload.encode_payload().unwrap(),
			&submitter.public()
		));
	}

	#[tokio::test]
	async fn reports_rejections() {
		let chain = Arc::new(MockChain::default());
		chain.set_outcome(TransactionOutcome::Rejected("Invalid Transaction: BadProof".into()));
		let submitter = submitter(chain.clone());

		let result = submitter.submit(mock_payload(4, 1..=1, submitter.public())).await.unwrap();
		assert_eq!(
			result,
			SubmissionResult::Rejected {
				rounds: 1..=1,
				reason: "Invalid Transaction: BadProof".into()
			}
		);
		assert_eq!(chain.submitted().len(), 1);
	}

	#[tokio::test]
	async fn reports_included_calls_that_failed_at_dispatch() {
		let chain = Arc::new(MockChain::new(ChainState { next_unsigned_at: 0, last_stored_round: 9 }));
		chain.fail_dispatch();
		let submitter = submitter(chain.clone());

		let result = submitter.submit(mock_payload(4, 10..=12, submitter.public())).await.unwrap();
		assert_eq!(
			result,
			SubmissionResult::Rejected {
				rounds: 10..=12,
				reason: "write_pulse failed at dispatch in block 0x01: last stored round is 9"
					.into()
			}
		);
		assert_eq!(chain.submitted().len(), 1);
	}

	#[tokio::test]
	async fn refuses_payloads_for_another_key() {
		let chain = Arc::new(MockChain::default());
		let submitter = submitter(chain.clone());
		let payload = mock_payload(4, 1..=2, sr25519::Public::from_raw([9; 32]));

		assert_eq!(submitter.submit(payload).await, Err(Error::SignerMismatch));
		assert!(chain.submitted().is_empty());
	}
}
