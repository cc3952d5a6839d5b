//! Upstream data providers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An upstream intraday data provider.
///
/// The string form doubles as the provider subfolder of the output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    /// Line-oriented CSV scrape endpoint.
    #[serde(rename = "google_finance")]
    GoogleFinance,
    /// Alpha Vantage equity intraday series.
    #[serde(rename = "alpha_vantage")]
    AlphaVantage,
    /// Alpha Vantage digital currency intraday series.
    #[serde(rename = "avantage_crypto")]
    AlphaVantageCrypto,
}

impl Provider {
    /// Returns the provider identifier, also used as its output subfolder.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleFinance => "google_finance",
            Self::AlphaVantage => "alpha_vantage",
            Self::AlphaVantageCrypto => "avantage_crypto",
        }
    }

    /// Returns a human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::GoogleFinance => "Google Finance",
            Self::AlphaVantage => "Alpha Vantage",
            Self::AlphaVantageCrypto => "Alpha Vantage (crypto)",
        }
    }

    /// Returns true if the provider requires an API key.
    #[must_use]
    pub const fn requires_api_key(&self) -> bool {
        matches!(self, Self::AlphaVantage | Self::AlphaVantageCrypto)
    }

    /// Returns all providers.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::GoogleFinance, Self::AlphaVantage, Self::AlphaVantageCrypto]
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "google_finance" | "google" => Ok(Self::GoogleFinance),
            "alpha_vantage" | "alphavantage" | "av" => Ok(Self::AlphaVantage),
            "avantage_crypto" | "alpha_vantage_crypto" | "crypto" => Ok(Self::AlphaVantageCrypto),
            _ => Err(ProviderParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown provider name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderParseError(String);

impl std::fmt::Display for ProviderParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid provider '{}', expected one of: google_finance, alpha_vantage, avantage_crypto",
            self.0
        )
    }
}

impl std::error::Error for ProviderParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::GoogleFinance);
        assert_eq!(
            "Alpha-Vantage".parse::<Provider>().unwrap(),
            Provider::AlphaVantage
        );
        assert_eq!(
            "avantage_crypto".parse::<Provider>().unwrap(),
            Provider::AlphaVantageCrypto
        );
        assert!("yahoo".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_round_trips_through_folder_name() {
        for provider in Provider::all() {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), *provider);
        }
    }

    #[test]
    fn test_provider_serde_uses_folder_name() {
        let json = serde_json::to_string(&Provider::AlphaVantageCrypto).unwrap();
        assert_eq!(json, "\"avantage_crypto\"");
    }

    #[test]
    fn test_api_key_requirement() {
        assert!(!Provider::GoogleFinance.requires_api_key());
        assert!(Provider::AlphaVantage.requires_api_key());
    }
}
