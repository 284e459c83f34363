//! Binding for the deployed WavePortal contract.

use crate::{
    Result,
    provider::WalletProvider,
    wave::{Wave, WaveList},
};
use alloy_primitives::{Address, Bytes, TxHash, U256, address};
use alloy_rpc_types::{Filter, Log, TransactionInput, TransactionRequest};
use alloy_sol_types::{SolCall, SolEvent, sol};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IWavePortal {
        struct Wave {
            address waver;
            string message;
            uint256 timestamp;
        }

        event NewWave(address indexed from, uint256 timestamp, string message);

        function wave(string memory _message) external;
        function getAllWaves() external view returns (Wave[] memory);
        function getTotalWaves() external view returns (uint256);
    }
}

/// Address the portal is deployed at.
pub const WAVE_PORTAL_ADDRESS: Address = address!("0x86Dd3813A3B7B90c135f2e4c5c2cD2B249bA2674");

/// Gas ceiling attached to every `wave` transaction.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// Encodes calls to, and decodes results from, a WavePortal deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavePortal {
    address: Address,
    gas_limit: u64,
}

impl Default for WavePortal {
    fn default() -> Self {
        Self::new(WAVE_PORTAL_ADDRESS)
    }
}

impl WavePortal {
    pub const fn new(address: Address) -> Self {
        Self { address, gas_limit: DEFAULT_GAS_LIMIT }
    }

    pub const fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub const fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// Reads every wave ever stored, in contract order.
    pub async fn all_waves(&self, provider: &dyn WalletProvider) -> Result<WaveList> {
        let out =
            provider.call(self.read_request(IWavePortal::getAllWavesCall {}.abi_encode())).await?;
        let records = IWavePortal::getAllWavesCall::abi_decode_returns(&out)?;
        records.into_iter().map(Wave::try_from).collect()
    }

    pub async fn total_waves(&self, provider: &dyn WalletProvider) -> Result<U256> {
        let out =
            provider.call(self.read_request(IWavePortal::getTotalWavesCall {}.abi_encode())).await?;
        Ok(IWavePortal::getTotalWavesCall::abi_decode_returns(&out)?)
    }

    /// Sends `wave(message)` from `from` and returns the transaction hash without waiting for it
    /// to be mined.
    pub async fn wave(
        &self,
        provider: &dyn WalletProvider,
        from: Address,
        message: &str,
    ) -> Result<TxHash> {
        provider.send_transaction(self.wave_request(from, message)).await
    }

    /// Builds the `wave(message)` transaction, capped at the configured gas limit.
    pub fn wave_request(&self, from: Address, message: &str) -> TransactionRequest {
        let calldata = IWavePortal::waveCall { _message: message.to_string() }.abi_encode();
        self.read_request(calldata).from(from).gas_limit(self.gas_limit)
    }

    /// Log filter matching `NewWave` events of this deployment.
    pub fn new_wave_filter(&self) -> Filter {
        Filter::new().address(self.address).event_signature(IWavePortal::NewWave::SIGNATURE_HASH)
    }

    /// Decodes a `NewWave` log into a wave, using the event's own fields.
    pub fn decode_new_wave(log: &Log) -> Result<Wave> {
        let event = IWavePortal::NewWave::decode_log_data(log.data())?;
        Wave::try_from(event)
    }

    fn read_request(&self, calldata: Vec<u8>) -> TransactionRequest {
        TransactionRequest::default()
            .to(self.address)
            .input(TransactionInput::both(Bytes::from(calldata)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{LogData, hex};

    const WAVER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    #[test]
    fn wave_request_carries_message_and_gas_limit() {
        let portal = WavePortal::default();
        let tx = portal.wave_request(WAVER, "gm");

        assert_eq!(tx.from, Some(WAVER));
        assert_eq!(tx.gas, Some(DEFAULT_GAS_LIMIT));
        assert_eq!(tx.to, Some(WAVE_PORTAL_ADDRESS.into()));

        let input = tx.input.input().expect("calldata");
        let call = IWavePortal::waveCall::abi_decode(input).unwrap();
        assert_eq!(call._message, "gm");
    }

    #[test]
    fn selectors_match_deployed_abi() {
        assert_eq!(hex::encode(IWavePortal::getAllWavesCall::SELECTOR), "bd43a908");
        assert_eq!(hex::encode(IWavePortal::getTotalWavesCall::SELECTOR), "9a2cdc08");
        assert_eq!(hex::encode(IWavePortal::waveCall::SELECTOR), "449d46c0");
        assert_eq!(IWavePortal::NewWave::SIGNATURE, "NewWave(address,uint256,string)");
    }

    #[test]
    fn filter_targets_new_wave_topic() {
        let portal = WavePortal::new(WAVER);
        let filter = portal.new_wave_filter();
        assert!(filter.address.matches(&WAVER));
        assert!(filter.topics[0].matches(&IWavePortal::NewWave::SIGNATURE_HASH));
    }

    #[test]
    fn decodes_new_wave_log() {
        let event = IWavePortal::NewWave {
            from: WAVER,
            timestamp: U256::from(1_640_995_200u64),
            message: "hello".to_string(),
        };
        let data: LogData = event.encode_log_data();
        let log = Log {
            inner: alloy_primitives::Log { address: WAVE_PORTAL_ADDRESS, data },
            ..Default::default()
        };

        let wave = WavePortal::decode_new_wave(&log).unwrap();
        assert_eq!(wave.address, WAVER);
        assert_eq!(wave.message, "hello");
        assert_eq!(wave.timestamp.timestamp(), 1_640_995_200);
    }
}
