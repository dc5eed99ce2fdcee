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

//! The payload carried by `Drand::write_pulse`.
//!
//! Its encoding is the preimage of the detached signature that authorizes the unsigned
//! extrinsic, and also the SCALE encoding of the call's first argument. The layout is:
//!
//! ```text
//! block_number (u32 LE)
//! compact(pulses.len())
//! for each pulse: round (u64 LE) ++ compact(32) ++ randomness ++ compact(len) ++ signature
//! 0x01 (MultiSigner::Sr25519) ++ public key (32 bytes)
//! ```

use alloc::vec::Vec;
use core::ops::RangeInclusive;
use sp_core::sr25519;

use crate::{
	compact::{self, EncodingError},
	types::{Pulse, RoundNumber},
	MAX_PULSES_TO_FETCH,
};

/// The `MultiSigner` discriminant of the sr25519 variant
pub const SR25519_SIGNER_TAG: u8 = 0x01;

/// Reasons a payload cannot be assembled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
	/// There are no pulses to relay
	Empty,
	/// More pulses than a single payload may carry
	TooManyPulses(usize),
	/// The rounds are not strictly consecutive
	NonContiguous { expected: RoundNumber, found: RoundNumber },
}

impl core::fmt::Display for PayloadError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::Empty => write!(f, "a payload needs at least one pulse"),
			Self::TooManyPulses(count) => {
				write!(f, "{} pulses exceed the limit of {}", count, MAX_PULSES_TO_FETCH)
			},
			Self::NonContiguous { expected, found } => {
				write!(f, "expected round {} but found round {}", expected, found)
			},
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for PayloadError {}

/// A batch of consecutive pulses to be written at some block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PulsesPayload {
	/// The block at which the submission is attempted
	pub block_number: u32,
	/// Pulses with strictly consecutive rounds
	pub pulses: Vec<Pulse>,
	/// The public key of the relayer that signs the payload
	pub public: sr25519::Public,
}

impl PulsesPayload {
	/// Build a payload, checking that the pulses are non-empty, bounded and consecutive
	pub fn new(
		block_number: u32,
		pulses: Vec<Pulse>,
		public: sr25519::Public,
	) -> Result<Self, PayloadError> {
		if pulses.is_empty() {
			return Err(PayloadError::Empty);
		}
		if pulses.len() as u64 > MAX_PULSES_TO_FETCH {
			return Err(PayloadError::TooManyPulses(pulses.len()));
		}

		for pair in pulses.windows(2) {
			let (previous, pulse) = (&pair[0], &pair[1]);
			if previous.round.checked_add(1) != Some(pulse.round) {
				return Err(PayloadError::NonContiguous {
					expected: previous.round.saturating_add(1),
					found: pulse.round,
				});
			}
		}

		Ok(Self { block_number, pulses, public })
	}

	/// The inclusive range of rounds carried by the payload
	pub fn rounds(&self) -> RangeInclusive<RoundNumber> {
		let first = self.pulses.first().map(|p| p.round).unwrap_or_default();
		let last = self.pulses.last().map(|p| p.round).unwrap_or_default();
		first..=last
	}

	/// Encode the payload into the bytes that are signed and submitted
	pub fn encode_payload(&self) -> Result<Vec<u8>, EncodingError> {
		let mut encoded = Vec::with_capacity(self.size_hint());
		encoded.extend_from_slice(&self.block_number.to_le_bytes());
		compact::encode_len_to(self.pulses.len(), &mut encoded)?;
		for pulse in &self.pulses {
			pulse.encode_to(&mut encoded)?;
		}
		encoded.push(SR25519_SIGNER_TAG);
		encoded.extend_from_slice(self.public.as_ref());
		Ok(encoded)
	}

	fn size_hint(&self) -> usize {
		let pulses: usize =
			self.pulses.iter().map(|p| 8 + 1 + p.randomness.len() + 2 + p.signature.len()).sum();
		4 + 5 + pulses + 1 + 32
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use codec::Encode;
	use hex_literal::hex;
	use sp_runtime::MultiSigner;

	const PUBLIC: [u8; 32] = [0x11; 32];

	fn pulse(round: RoundNumber) -> Pulse {
		Pulse { round, randomness: [round as u8; 32], signature: vec![0xbb; 48] }
	}

	fn payload(rounds: RangeInclusive<RoundNumber>) -> PulsesPayload {
		PulsesPayload::new(7, rounds.map(pulse).collect(), sr25519::Public::from_raw(PUBLIC))
			.unwrap()
	}

	#[test]
	fn encodes_a_single_pulse_to_a_fixed_vector() {
		let payload = PulsesPayload::new(
			7,
			vec![Pulse { round: 1, randomness: [0xaa; 32], signature: vec![0xbb, 0xcc] }],
			sr25519::Public::from_raw(PUBLIC),
		)
		.unwrap();

		let mut expected = hex!("07000000 04 0100000000000000 80").to_vec();
		expected.extend_from_slice(&[0xaa; 32]);
		expected.extend_from_slice(&hex!("08 bbcc 01"));
		expected.extend_from_slice(&PUBLIC);

		assert_eq!(payload.encode_payload().unwrap(), expected);
	}

	#[test]
	fn matches_the_scale_encoding_of_the_call_argument() {
		let payload = payload(10..=12);
		let pulses: Vec<(u64, Vec<u8>, Vec<u8>)> = payload
			.pulses
			.iter()
			.map(|p| (p.round, p.randomness.to_vec(), p.signature.clone()))
			.collect();
		let expected =
			(payload.block_number, pulses, MultiSigner::Sr25519(payload.public)).encode();

		assert_eq!(payload.encode_payload().unwrap(), expected);
	}

	#[test]
	fn encoding_is_deterministic() {
		let payload = payload(1..=3);
		assert_eq!(payload.encode_payload().unwrap(), payload.clone().encode_payload().unwrap());
	}

	#[test]
	fn every_field_changes_the_encoding() {
		let base = payload(1..=3);
		let encoded = base.encode_payload().unwrap();

		let mut changed = base.clone();
		changed.block_number = 8;
		assert_ne!(changed.encode_payload().unwrap(), encoded);

		let mut changed = base.clone();
		changed.pulses[1].round = 99;
		assert_ne!(changed.encode_payload().unwrap(), encoded);

		let mut changed = base.clone();
		changed.pulses[0].randomness[31] ^= 1;
		assert_ne!(changed.encode_payload().unwrap(), encoded);

		let mut changed = base.clone();
		changed.pulses[2].signature.pop();
		assert_ne!(changed.encode_payload().unwrap(), encoded);

		let mut changed = base.clone();
		changed.public = sr25519::Public::from_raw([0x22; 32]);
		assert_ne!(changed.encode_payload().unwrap(), encoded);
	}

	#[test]
	fn reports_the_round_range() {
		assert_eq!(payload(101..=150).rounds(), 101..=150);
	}

	#[test]
	fn cannot_build_empty_payload() {
		let result = PulsesPayload::new(1, vec![], sr25519::Public::from_raw(PUBLIC));
		assert_eq!(result, Err(PayloadError::Empty));
	}

	#[test]
	fn cannot_build_payload_above_the_cap() {
		let pulses = (1..=MAX_PULSES_TO_FETCH + 1).map(pulse).collect();
		let result = PulsesPayload::new(1, pulses, sr25519::Public::from_raw(PUBLIC));
		assert_eq!(result, Err(PayloadError::TooManyPulses(51)));
	}

	#[test]
	fn cannot_build_payload_with_a_gap() {
		let pulses = vec![pulse(4), pulse(5), pulse(7)];
		let result = PulsesPayload::new(1, pulses, sr25519::Public::from_raw(PUBLIC));
		assert_eq!(result, Err(PayloadError::NonContiguous { expected: 6, found: 7 }));
	}

	#[test]
	fn accepts_rounds_up_to_the_last_representable_one() {
		let public = sr25519::Public::from_raw(PUBLIC);
		let last = PulsesPayload::new(1, vec![pulse(u64::MAX)], public).unwrap();
		assert_eq!(last.rounds(), u64::MAX..=u64::MAX);

		let tail = PulsesPayload::new(1, vec![pulse(u64::MAX - 1), pulse(u64::MAX)], public);
		assert_eq!(tail.map(|p| p.rounds()), Ok(u64::MAX - 1..=u64::MAX));
	}
}
