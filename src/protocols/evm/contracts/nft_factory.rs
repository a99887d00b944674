/// NFT factory and collection reads
use crate::error::Error;
use crate::protocols::evm::client::EvmClient;
use crate::protocols::evm::contracts::to_u64;
use crate::records::{NftLaunchRecord, SaleSetting};
use alloy_primitives::{Address, U256};
use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface INftFactory {
        function totalProjects() external view returns (uint256);
        function contractIndex(uint256 index) external view returns (address);
        function contractFee() external view returns (uint256);
    }

    #[derive(Debug)]
    interface INftCollection {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function totalSupply() external view returns (uint256);
        function saleSetting() external view returns (
            uint256 maxSupply,
            uint256 mintPrice,
            uint256 startTime,
            uint256 endTime,
            uint256 referralPercent
        );
        function owner() external view returns (address);
        function ipfsuri() external view returns (string);
        function adminfeeWallet() external view returns (address);
    }
}

/// Factory and registry of NFT collections
#[derive(Debug, Clone)]
pub struct NftFactory {
    client: EvmClient,
    address: Address,
}

impl NftFactory {
    pub fn new(client: EvmClient, address: Address) -> Self {
        Self { client, address }
    }

    pub async fn total_projects(&self) -> Result<u64, Error> {
        let result = self
            .client
            .call_contract(self.address, INftFactory::totalProjectsCall {})
            .await?;
        to_u64(result._0, "totalProjects")
    }

    /// Collection deployed at position `index`
    pub async fn contract_at(&self, index: u64) -> Result<Address, Error> {
        let result = self
            .client
            .call_contract(
                self.address,
                INftFactory::contractIndexCall {
                    index: U256::from(index),
                },
            )
            .await?;
        Ok(result._0)
    }

    /// Fee in wei for deploying a collection
    pub async fn contract_fee(&self) -> Result<U256, Error> {
        let result = self
            .client
            .call_contract(self.address, INftFactory::contractFeeCall {})
            .await?;
        Ok(result._0)
    }

    /// Every collection address in deployment order
    pub async fn collections(&self) -> Result<Vec<Address>, Error> {
        let total = self.total_projects().await?;
        let lookups = (0..total).map(|index| self.contract_at(index));
        futures::future::try_join_all(lookups).await
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// A deployed NFT collection with a presale
#[derive(Debug, Clone)]
pub struct NftCollection {
    client: EvmClient,
    address: Address,
}

impl NftCollection {
    pub fn new(client: EvmClient, address: Address) -> Self {
        Self { client, address }
    }

    pub async fn sale_setting(&self) -> Result<SaleSetting, Error> {
        let result = self
            .client
            .call_contract(self.address, INftCollection::saleSettingCall {})
            .await?;
        SaleSetting::try_from(result)
    }

    /// All launch fields, read concurrently
    pub async fn launch(&self) -> Result<NftLaunchRecord, Error> {
        let c = &self.client;
        let a = self.address;
        let (name, symbol, total_supply, sale, owner, base_uri, fee_wallet) = tokio::try_join!(
            c.call_contract(a, INftCollection::nameCall {}),
            c.call_contract(a, INftCollection::symbolCall {}),
            c.call_contract(a, INftCollection::totalSupplyCall {}),
            self.sale_setting(),
            c.call_contract(a, INftCollection::ownerCall {}),
            c.call_contract(a, INftCollection::ipfsuriCall {}),
            c.call_contract(a, INftCollection::adminfeeWalletCall {}),
        )?;
        Ok(NftLaunchRecord {
            address: a,
            name: name._0,
            symbol: symbol._0,
            total_supply: to_u64(total_supply._0, "totalSupply")?,
            sale,
            owner: owner._0,
            base_uri: base_uri._0,
            fee_wallet: fee_wallet._0,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl TryFrom<INftCollection::saleSettingReturn> for SaleSetting {
    type Error = Error;

    fn try_from(r: INftCollection::saleSettingReturn) -> Result<Self, Error> {
        Ok(Self {
            max_supply: r.maxSupply,
            mint_price: r.mintPrice,
            start_time: to_u64(r.startTime, "startTime")?,
            end_time: to_u64(r.endTime, "endTime")?,
            referral_percent: r.referralPercent,
        })
    }
}
