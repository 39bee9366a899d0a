//! Registry of well-known contracts.
//!
//! Attached to a resolution when the queried address matches, so callers can
//! show a name and category even when only bytecode is available.

use serde::{Deserialize, Serialize};

/// Static description of a famous contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownContract {
    pub name: String,
    pub category: String,
    pub description: String,
}

struct Entry {
    address: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
}

const KNOWN: &[Entry] = &[
    Entry {
        address: "0x00000000000000adc04c56bf30ac9d3c0aaf14dc",
        name: "OpenSea Seaport",
        category: "NFT Marketplace Protocol",
        description: "OpenSea's marketplace protocol. Matches orders and settles NFT and token trades, including auctions, bundles and criteria-based offers.",
    },
    Entry {
        address: "0x7a250d5630b4cf539739df2c5dacb4c659f2488d",
        name: "Uniswap V2 Router",
        category: "DEX Router",
        description: "Main entry point for trading on Uniswap V2. Finds the swap path between tokens, quotes prices and executes trades.",
    },
    Entry {
        address: "0x68b3465833fb72a70ecdf485e0e4c7bd8665fc45",
        name: "Uniswap V3 Router 2",
        category: "DEX Router",
        description: "Router for Uniswap V3 with multi-hop swaps across concentrated liquidity pools.",
    },
    Entry {
        address: "0x1f98431c8ad98523631ae4a59f267346ea31f984",
        name: "Uniswap V3 Factory",
        category: "DEX Factory",
        description: "Deploys new Uniswap V3 pools for token pairs and fee tiers.",
    },
    Entry {
        address: "0x87870bca3f3fd6335c3f4ce8392d69350b4fa4e2",
        name: "Aave V3 Pool",
        category: "Lending Protocol",
        description: "Core Aave V3 contract. Users supply assets to earn interest or borrow against their deposits.",
    },
    Entry {
        address: "0x00000000000c2e074ec69a0dfb2997ba6c7d2e1e",
        name: "ENS Registry",
        category: "Domain Name Registry",
        description: "Ethereum Name Service registry. Tracks who owns each .eth name and which resolver it points to.",
    },
    Entry {
        address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
        name: "USDC",
        category: "Stablecoin (ERC-20)",
        description: "USD Coin, a dollar-backed stablecoin issued by Circle. Upgradeable proxy contract.",
    },
    Entry {
        address: "0xdac17f958d2ee523a2206206994597c13d831ec7",
        name: "USDT (Tether)",
        category: "Stablecoin (ERC-20)",
        description: "Tether USD, a dollar-pegged stablecoin. Upgradeable by Tether.",
    },
    Entry {
        address: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
        name: "Wrapped Ether (WETH)",
        category: "Wrapped Native Token (ERC-20)",
        description: "Wraps native ETH 1:1 into an ERC-20 token so it can be traded like any other token.",
    },
    Entry {
        address: "0x514910771af9ca656af840dff83e8264ecf986ca",
        name: "Chainlink Token (LINK)",
        category: "ERC-20 Token",
        description: "Utility token used to pay Chainlink oracle node operators.",
    },
    Entry {
        address: "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d",
        name: "Bored Ape Yacht Club (BAYC)",
        category: "NFT Collection (ERC-721)",
        description: "10,000 unique ape NFTs. Manages ownership, transfers and metadata.",
    },
    Entry {
        address: "0xed5af388653567af2f388e6224dc7c4b3241c544",
        name: "Azuki",
        category: "NFT Collection (ERC-721A)",
        description: "Anime-inspired collection using ERC-721A for gas-efficient batch minting.",
    },
    Entry {
        address: "0xb47e3cd837ddf8e4c57f05d70ab865de6e193bbb",
        name: "CryptoPunks",
        category: "NFT Collection (pre-ERC-721)",
        description: "The original punk collection. Custom contract that predates the ERC-721 standard.",
    },
    Entry {
        address: "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913",
        name: "USDC (Base)",
        category: "Stablecoin (ERC-20)",
        description: "USD Coin deployed natively on Base.",
    },
    Entry {
        address: "0x3c499c542cef5e3811e1192ce70d8cc03d5c3359",
        name: "USDC (Polygon)",
        category: "Stablecoin (ERC-20)",
        description: "USD Coin deployed natively on Polygon PoS.",
    },
];

/// Look up an address (any casing).
pub fn lookup(address: &str) -> Option<KnownContract> {
    KNOWN
        .iter()
        .find(|e| e.address.eq_ignore_ascii_case(address))
        .map(|e| KnownContract {
            name: e.name.to_string(),
            category: e.category.to_string(),
            description: e.description.to_string(),
        })
}

/// Number of registry entries.
pub fn len() -> usize {
    KNOWN.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let weth = lookup("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();
        assert_eq!(weth.name, "Wrapped Ether (WETH)");
        assert!(lookup("0x0000000000000000000000000000000000000001").is_none());
    }

    #[test]
    fn addresses_are_canonical() {
        for e in KNOWN {
            assert_eq!(e.address.len(), 42, "{}", e.name);
            assert_eq!(e.address, e.address.to_ascii_lowercase(), "{}", e.name);
        }
        assert_eq!(len(), 15);
    }
}
