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

//! # Drand Bridge Client
//!
//! Relays pulses from [drand](https://drand.love)'s HTTP API to the `Drand` pallet.
//!
//! ## Overview
//!
//! For every new block the [`worker::PulseWorker`] reads `NextUnsignedAt` and
//! `LastStoredRound` from the chain, asks the [`gate::SubmissionGate`] which rounds are
//! missing, fetches them through the [`fetcher::EndpointFetcher`] and submits them in a single
//! `write_pulse` call. The call is an unsigned extrinsic: the payload carries the relayer's
//! public key and a detached sr25519 signature, which the runtime verifies instead of a
//! transaction signature.

pub mod chain;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod gate;
pub mod submitter;
pub mod worker;

pub use error::Error;

#[cfg(test)]
mod mock;
