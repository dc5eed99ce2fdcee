use sp_drand_bridge::{EncodingError, InvalidPulseError, PayloadError};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("No beacon endpoint returned a valid response for {0}.")]
	NoEndpointAvailable(String),
	#[error("The beacon returned an invalid pulse: {0}.")]
	InvalidPulse(#[from] InvalidPulseError),
	#[error("The payload could not be encoded: {0}.")]
	Encoding(#[from] EncodingError),
	#[error("The payload could not be built: {0}.")]
	InvalidPayload(#[from] PayloadError),
	#[error("The payload public key does not belong to the signer.")]
	SignerMismatch,
	#[error("The HTTP client could not be built: {0}.")]
	HttpClient(String),
	#[error("The chain RPC request failed: {0}.")]
	Rpc(String),
	#[error("The storage value {0} could not be decoded.")]
	StorageDecode(String),
	#[error("The block header could not be parsed: {0}.")]
	InvalidHeader(String),
	#[error("The transaction status stream ended before the outcome was known.")]
	StatusStreamClosed,
}

impl From<jsonrpsee::core::ClientError> for Error {
	fn from(e: jsonrpsee::core::ClientError) -> Self {
		Error::Rpc(e.to_string())
	}
}
