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

//! Compact (variable length) integer encoding used for every length prefix in a payload.
//!
//! The value is shifted left by two bits and the low two bits carry the width tag:
//!
//! | range             | tag    | width   |
//! |-------------------|--------|---------|
//! | `[0, 2^6)`        | `0b00` | 1 byte  |
//! | `[2^6, 2^14)`     | `0b01` | 2 bytes |
//! | `[2^14, 2^30)`    | `0b10` | 4 bytes |
//! | `[2^30, 2^32)`    | `0b11` | 5 bytes |
//!
//! The encoder is total over the `u32` domain, which covers every length prefix. Inputs above
//! [`MAX_COMPACT_VALUE`] fail with [`EncodingError::ValueOutOfRange`] and nothing is written.

use alloc::vec::Vec;

/// The largest value accepted by the encoder
pub const MAX_COMPACT_VALUE: u64 = u32::MAX as u64;

const SINGLE_BYTE_LIMIT: u64 = 1 << 6;
const TWO_BYTE_LIMIT: u64 = 1 << 14;
const FOUR_BYTE_LIMIT: u64 = 1 << 30;

/// Errors raised while encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
	/// The value lies outside of the compact u32 domain
	ValueOutOfRange(u64),
}

impl core::fmt::Display for EncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::ValueOutOfRange(value) => {
				write!(f, "{} exceeds the maximum compact value {}", value, MAX_COMPACT_VALUE)
			},
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for EncodingError {}

/// Compact-encode `value` into a fresh buffer
pub fn encode(value: u64) -> Result<Vec<u8>, EncodingError> {
	let mut dest = Vec::with_capacity(5);
	encode_to(value, &mut dest)?;
	Ok(dest)
}

/// Compact-encode `value`, appending the bytes to `dest`.
/// Nothing is written when the value is out of range.
pub fn encode_to(value: u64, dest: &mut Vec<u8>) -> Result<(), EncodingError> {
	if value < SINGLE_BYTE_LIMIT {
		dest.push((value as u8) << 2);
	} else if value < TWO_BYTE_LIMIT {
		dest.extend_from_slice(&(((value as u16) << 2) | 0b01).to_le_bytes());
	} else if value < FOUR_BYTE_LIMIT {
		dest.extend_from_slice(&(((value as u32) << 2) | 0b10).to_le_bytes());
	} else if value <= MAX_COMPACT_VALUE {
		// (2^32 - 1) << 2 still fits in 34 bits, so the low five bytes hold everything
		dest.extend_from_slice(&((value << 2) | 0b11).to_le_bytes()[..5]);
	} else {
		return Err(EncodingError::ValueOutOfRange(value));
	}
	Ok(())
}

/// Compact-encode a length prefix
pub fn encode_len_to(len: usize, dest: &mut Vec<u8>) -> Result<(), EncodingError> {
	encode_to(len as u64, dest)
}
