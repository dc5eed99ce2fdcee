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

//! Primitives shared by the drand bridge relayer and the runtime it writes to.
//!
//! The types here describe pulses as they arrive from the drand HTTP API, the payload that is
//! signed and submitted to the `Drand` pallet, and the byte layout of that payload.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod compact;
pub mod payload;
pub mod types;

pub use compact::EncodingError;
pub use payload::{PayloadError, PulsesPayload, SR25519_SIGNER_TAG};
pub use types::*;

/// The maximum number of pulses relayed in a single payload
pub const MAX_PULSES_TO_FETCH: u64 = 50;
