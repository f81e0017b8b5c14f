use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Validates and normalizes an Ethereum address
pub fn validate_address(address: &str) -> Result<Address> {
    let address = address.trim();

    if address.is_empty() {
        return Err(anyhow!("Address cannot be empty"));
    }

    if !address.starts_with("0x") && !address.starts_with("0X") {
        return Err(anyhow!(
            "Invalid address format: '{}'. Ethereum addresses must start with '0x'",
            address
        ));
    }

    if address.len() != 42 {
        return Err(anyhow!(
            "Invalid address length: '{}'. Ethereum addresses must be exactly 42 characters (0x + 40 hex characters)",
            address
        ));
    }

    let hex_part = &address[2..];
    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(anyhow!(
            "Invalid address format: '{}'. Contains non-hexadecimal characters",
            address
        ));
    }

    Address::from_str(address)
        .map_err(|e| anyhow!("Invalid Ethereum address: '{}'. Error: {}", address, e))
}

/// Validates call data shape before it reaches the decoder.
pub fn validate_call_data(call_data: &str) -> Result<()> {
    let call_data = call_data.trim();

    if call_data.is_empty() {
        return Err(anyhow!("Call data cannot be empty"));
    }

    let hex_part = call_data
        .strip_prefix("0x")
        .or_else(|| call_data.strip_prefix("0X"))
        .unwrap_or(call_data);

    if hex_part.len() % 2 != 0 {
        return Err(anyhow!(
            "Invalid call data: odd number of hex digits ({})",
            hex_part.len()
        ));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(anyhow!("Invalid call data: contains non-hexadecimal characters"));
    }

    Ok(())
}

/// Creates user-friendly error messages for explorer API failures
pub fn interpret_explorer_error(error: &str, contract_address: &str) -> String {
    if error.contains("404") || error.contains("not found") {
        format!(
            "Contract verification not found: the contract at {} is not verified on the explorer. Verified contracts are required for transaction explanations.",
            contract_address
        )
    } else if error.contains("rate limit") || error.contains("429") {
        "API rate limit: too many requests to the explorer API. Try again in a few moments or provide your own ETHERSCAN_API_KEY.".to_string()
    } else if error.contains("invalid API key") || error.contains("403") {
        "API authentication error: invalid explorer API key. Check your ETHERSCAN_API_KEY environment variable.".to_string()
    } else if error.contains("network") || error.contains("connection") {
        "Network error: cannot connect to the explorer API. Check your internet connection.".to_string()
    } else if error.contains("timeout") {
        "Timeout error: request to the explorer API timed out. Try again in a few moments.".to_string()
    } else {
        format!("Contract metadata error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address() {
        // Valid addresses
        assert!(validate_address("0x742d35Cc6435C9c1c72c5E7b18BaB7e1DB7a5d6e").is_ok());
        assert!(validate_address("0x0000000000000000000000000000000000000000").is_ok());

        // Invalid addresses
        assert!(validate_address("").is_err());
        assert!(validate_address("not_an_address").is_err());
        assert!(validate_address("0x123").is_err()); // Too short
        assert!(validate_address("742d35Cc6435C9c1c72c5E7b18BaB7e1DB7a5d6e").is_err()); // Missing 0x
        assert!(validate_address("0xgg2d35Cc6435C9c1c72c5E7b18BaB7e1DB7a5d6e").is_err());
        // Invalid hex
    }

    #[test]
    fn test_validate_call_data() {
        assert!(validate_call_data("0xa9059cbb").is_ok());
        assert!(validate_call_data("a9059cbb").is_ok());

        assert!(validate_call_data("").is_err());
        assert!(validate_call_data("0xa9f").is_err()); // Odd length
        assert!(validate_call_data("0xzzzz").is_err()); // Invalid hex
    }

    #[test]
    fn test_interpret_explorer_error() {
        let msg = interpret_explorer_error("404 not found", "0xABC");
        assert!(msg.contains("0xABC"));

        let msg = interpret_explorer_error("rate limit exceeded", "0xABC");
        assert!(msg.contains("ETHERSCAN_API_KEY"));
    }
}
