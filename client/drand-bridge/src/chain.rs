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

//! Access to the chain that stores pulses: two storage reads, one unsigned extrinsic and the
//! stream of new block headers.

use async_trait::async_trait;
use codec::{Decode, Encode};
use futures::{stream::BoxStream, StreamExt};
use jsonrpsee::{
	core::{
		client::{ClientT, Subscription, SubscriptionClientT},
		ClientError,
	},
	rpc_params,
	ws_client::{WsClient, WsClientBuilder},
};
use serde::Deserialize;
use sp_core::{hashing::twox_128, sr25519};
use sp_drand_bridge::{compact, ChainState, EncodingError, PulsesPayload, RoundNumber};
use sp_runtime::MultiSignature;

use crate::{config::ChainConfig, error::Error};

const LOG_TARGET: &str = "drand-chain";

/// Version byte of an extrinsic without a signature
pub const UNSIGNED_EXTRINSIC_VERSION: u8 = 0x04;

/// The arguments of `Drand::write_pulse`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WritePulseCall {
	pub payload: PulsesPayload,
	/// The relayer's signature over the encoded payload
	pub signature: sr25519::Signature,
}

impl WritePulseCall {
	/// SCALE-encode the call arguments: the payload followed by a `MultiSignature`
	pub fn encode_args(&self) -> Result<Vec<u8>, EncodingError> {
		let mut args = self.payload.encode_payload()?;
		MultiSignature::Sr25519(self.signature).encode_to(&mut args);
		Ok(args)
	}
}

/// Wrap call arguments into an unsigned extrinsic:
/// `compact(len) ++ version ++ pallet_index ++ call_index ++ args`
pub fn encode_unsigned_extrinsic(
	pallet_index: u8,
	call_index: u8,
	args: &[u8],
) -> Result<Vec<u8>, EncodingError> {
	let mut body = Vec::with_capacity(args.len() + 3);
	body.push(UNSIGNED_EXTRINSIC_VERSION);
	body.push(pallet_index);
	body.push(call_index);
	body.extend_from_slice(args);

	let mut extrinsic = compact::encode(body.len() as u64)?;
	extrinsic.extend(body);
	Ok(extrinsic)
}

/// How the chain dealt with a submitted extrinsic
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionOutcome {
	/// Included in the block with this hash. Inclusion alone does not mean the call succeeded.
	InBlock(String),
	/// Refused by the pool or evicted before inclusion
	Rejected(String),
}

/// The chain as seen by the relayer
#[async_trait]
pub trait ChainApi: Send + Sync {
	/// The block before which unsigned submissions are refused, 0 if unset
	async fn next_unsigned_at(&self) -> Result<u32, Error>;

	/// The highest round stored on-chain, 0 if none
	async fn last_stored_round(&self) -> Result<RoundNumber, Error>;

	/// The highest round stored in the state of the block with the given hash
	async fn last_stored_round_at(&self, block_hash: &str) -> Result<RoundNumber, Error>;

	/// Submit an unsigned `write_pulse` extrinsic and wait until it is included or rejected
	async fn submit_unsigned(&self, call: WritePulseCall) -> Result<TransactionOutcome, Error>;

	/// Read a fresh snapshot of the relevant storage
	async fn chain_state(&self) -> Result<ChainState, Error> {
		Ok(ChainState {
			next_unsigned_at: self.next_unsigned_at().await?,
			last_stored_round: self.last_stored_round().await?,
		})
	}
}

/// Transaction pool status notifications of `author_submitAndWatchExtrinsic`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionStatus {
	Future,
	Ready,
	Broadcast(Vec<String>),
	InBlock(String),
	Retracted(String),
	FinalityTimeout(String),
	Finalized(String),
	Usurped(String),
	Dropped,
	Invalid,
}

impl TransactionStatus {
	/// The final outcome, if this status settles it
	pub fn outcome(&self) -> Option<TransactionOutcome> {
		match self {
			Self::InBlock(hash) | Self::Finalized(hash) => {
				Some(TransactionOutcome::InBlock(hash.clone()))
			},
			Self::Usurped(hash) => {
				Some(TransactionOutcome::Rejected(format!("usurped by {}", hash)))
			},
			Self::Dropped => Some(TransactionOutcome::Rejected("dropped from the pool".into())),
			Self::Invalid => Some(TransactionOutcome::Rejected("invalid".into())),
			_ => None,
		}
	}
}

/// The part of a header the relayer needs
#[derive(Clone, Debug, Deserialize)]
pub struct Header {
	/// hex encoded block number
	pub number: String,
}

impl Header {
	pub fn block_number(&self) -> Result<u32, Error> {
		let digits = self.number.trim_start_matches("0x");
		u32::from_str_radix(digits, 16).map_err(|_| Error::InvalidHeader(self.number.clone()))
	}
}

/// A [`ChainApi`] over a node's websocket RPC
pub struct RpcChainClient {
	client: WsClient,
	config: ChainConfig,
}

impl RpcChainClient {
	pub async fn connect(config: ChainConfig) -> Result<Self, Error> {
		let client = WsClientBuilder::default().build(&config.url).await?;
		log::info!(target: LOG_TARGET, "Connected to {}", config.url);
		Ok(Self { client, config })
	}

	/// The storage key of a plain storage value of the pallet
	pub fn storage_key(&self, item: &str) -> String {
		storage_value_key(&self.config.pallet, item)
	}

	/// Read a storage value at the best block, or at `at` when given
	async fn storage<T: Decode + Default>(&self, item: &str, at: Option<&str>) -> Result<T, Error> {
		let raw: Option<String> = self
			.client
			.request("state_getStorage", rpc_params![self.storage_key(item), at])
			.await?;

		let Some(raw) = raw else { return Ok(T::default()) };
		let bytes = hex::decode(raw.trim_start_matches("0x"))
			.map_err(|_| Error::StorageDecode(item.to_string()))?;
		T::decode(&mut &bytes[..]).map_err(|_| Error::StorageDecode(item.to_string()))
	}

	/// Stream the numbers of newly imported blocks
	pub async fn block_numbers(&self) -> Result<BoxStream<'static, Result<u32, Error>>, Error> {
		let headers: Subscription<Header> = self
			.client
			.subscribe("chain_subscribeNewHeads", rpc_params![], "chain_unsubscribeNewHeads")
			.await?;

		Ok(headers
			.map(|header| {
				header.map_err(|e| Error::InvalidHeader(e.to_string()))?.block_number()
			})
			.boxed())
	}
}

/// `twox128(pallet) ++ twox128(item)`, hex encoded with a `0x` prefix
pub fn storage_value_key(pallet: &str, item: &str) -> String {
	let mut key = twox_128(pallet.as_bytes()).to_vec();
	key.extend_from_slice(&twox_128(item.as_bytes()));
	format!("0x{}", hex::encode(key))
}

#[async_trait]
impl ChainApi for RpcChainClient {
	async fn next_unsigned_at(&self) -> Result<u32, Error> {
		self.storage("NextUnsignedAt", None).await
	}

	async fn last_stored_round(&self) -> Result<RoundNumber, Error> {
		self.storage("LastStoredRound", None).await
	}

	async fn last_stored_round_at(&self, block_hash: &str) -> Result<RoundNumber, Error> {
		self.storage("LastStoredRound", Some(block_hash)).await
	}

	async fn submit_unsigned(&self, call: WritePulseCall) -> Result<TransactionOutcome, Error> {
		let extrinsic = encode_unsigned_extrinsic(
			self.config.pallet_index,
			self.config.call_index,
			&call.encode_args()?,
		)?;
		let extrinsic = format!("0x{}", hex::encode(extrinsic));

		let subscription: Result<Subscription<TransactionStatus>, _> = self
			.client
			.subscribe(
				"author_submitAndWatchExtrinsic",
				rpc_params![extrinsic],
				"author_unwatchExtrinsic",
			)
			.await;

		let mut statuses = match subscription {
			Ok(statuses) => statuses,
			// the pool refused the extrinsic outright
			Err(ClientError::Call(e)) => {
				return Ok(TransactionOutcome::Rejected(match e.data() {
					Some(data) => format!("{}: {}", e.message(), data.get()),
					None => e.message().to_string(),
				}))
			},
			Err(e) => return Err(e.into()),
		};

		while let Some(status) = statuses.next().await {
			let status = status.map_err(|e| Error::Rpc(e.to_string()))?;
			log::debug!(target: LOG_TARGET, "Transaction status: {:?}", status);
			if let Some(outcome) = status.outcome() {
				return Ok(outcome);
			}
		}

		Err(Error::StatusStreamClosed)
	}
}
