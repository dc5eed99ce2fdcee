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

use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

use crate::compact::{self, EncodingError};

/// the round number to track rounds of the beacon
pub type RoundNumber = u64;
/// the randomness carried by a pulse
pub type RandomValue = [u8; 32];

/// The body returned by `GET /{chain_hash}/public/{round}` on a drand HTTP endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrandResponseBody {
	/// the drand round number
	pub round: RoundNumber,
	/// hex encoded randomness, the sha256 of the signature
	pub randomness: String,
	/// hex encoded threshold BLS signature over the round
	pub signature: String,
}

/// A validated pulse from the randomness beacon
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pulse {
	/// The round of the beacon protocol
	pub round: RoundNumber,
	/// The randomness derived from the signature
	pub randomness: RandomValue,
	/// The beacon's attestation over the round, its length is not fixed
	pub signature: Vec<u8>,
}

/// Reasons a beacon response is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPulseError {
	/// The response lacks a required field or has one of the wrong type
	MalformedResponse(String),
	/// A field is not valid hex
	InvalidHex { field: &'static str },
	/// The randomness must decode to exactly 32 bytes
	InvalidRandomnessLength(usize),
	/// The beacon answered with a different round than the one requested
	UnexpectedRound { requested: RoundNumber, found: RoundNumber },
}

impl core::fmt::Display for InvalidPulseError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::MalformedResponse(reason) => write!(f, "malformed beacon response: {}", reason),
			Self::InvalidHex { field } => write!(f, "the {} field is not valid hex", field),
			Self::InvalidRandomnessLength(len) => {
				write!(f, "randomness must be 32 bytes but has {}", len)
			},
			Self::UnexpectedRound { requested, found } => {
				write!(f, "requested round {} but the beacon served round {}", requested, found)
			},
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidPulseError {}

impl DrandResponseBody {
	/// Decode the hex fields and check the randomness width
	pub fn try_into_pulse(self) -> Result<Pulse, InvalidPulseError> {
		let randomness = decode_hex(&self.randomness, "randomness")?;
		let randomness: RandomValue = randomness
			.try_into()
			.map_err(|bytes: Vec<u8>| InvalidPulseError::InvalidRandomnessLength(bytes.len()))?;
		let signature = decode_hex(&self.signature, "signature")?;

		Ok(Pulse { round: self.round, randomness, signature })
	}
}

impl TryFrom<DrandResponseBody> for Pulse {
	type Error = InvalidPulseError;

	fn try_from(body: DrandResponseBody) -> Result<Self, Self::Error> {
		body.try_into_pulse()
	}
}

fn decode_hex(value: &str, field: &'static str) -> Result<Vec<u8>, InvalidPulseError> {
	let value = value.strip_prefix("0x").unwrap_or(value);
	hex::decode(value).map_err(|_| InvalidPulseError::InvalidHex { field })
}

impl Pulse {
	/// Append `round ++ compact(len) ++ randomness ++ compact(len) ++ signature` to `dest`
	pub fn encode_to(&self, dest: &mut Vec<u8>) -> Result<(), EncodingError> {
		dest.extend_from_slice(&self.round.to_le_bytes());
		compact::encode_len_to(self.randomness.len(), dest)?;
		dest.extend_from_slice(&self.randomness);
		compact::encode_len_to(self.signature.len(), dest)?;
		dest.extend_from_slice(&self.signature);
		Ok(())
	}
}

/// The on-chain state the relayer observes once per block.
/// It is owned by the runtime and never mutated by the relayer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainState {
	/// Submissions are not accepted before this block
	pub next_unsigned_at: u32,
	/// The highest round accepted on-chain, 0 when nothing has been stored
	pub last_stored_round: RoundNumber,
}
