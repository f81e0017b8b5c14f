use crate::explorer::ContractLookup;

use super::{resolver::resolve_function_call, snippet::extract_source_snippet, DecodedCall};

/// Returned instead of a summary when the explorer has no verified source.
pub const UNVERIFIED_CONTRACT_WARNING: &str =
    "This contract's source code has not been verified, so we cannot explain what this \
     transaction will do. Proceed with caution.";

/// Returned when the call data matches nothing in the verified ABI.
pub const UNRECOGNIZED_CALL_WARNING: &str =
    "The transaction data does not match any function in this contract's ABI, so we cannot \
     confirm what it will do.";

/// Placeholder used in the prompt when snippet extraction found nothing.
const SOURCE_UNAVAILABLE: &str = "(source unavailable)";

const INSTRUCTION: &str =
    "Explain in plain English what executing this function call with these arguments will do. \
     Keep the explanation short and do not speculate beyond the provided source.";

/// What the pipeline should do for a given contract lookup and call data.
#[derive(Debug)]
pub enum SummaryRequest {
    /// Return the warning verbatim; the completion service must not be called.
    Degraded { warning: &'static str },
    /// Submit the prompt to the completion service.
    Complete {
        prompt: String,
        decoded: DecodedCall,
    },
}

/// Pure planning step of the summarization pipeline.
///
/// Unverified contracts and unrecognized or undecodable call data degrade to
/// a fixed warning; decode failures are logged but otherwise treated exactly
/// like an unmatched selector.
pub fn prepare_request(
    contract_address: &str,
    lookup: &ContractLookup,
    call_data: &str,
) -> SummaryRequest {
    let ContractLookup::Verified(descriptor) = lookup else {
        return SummaryRequest::Degraded {
            warning: UNVERIFIED_CONTRACT_WARNING,
        };
    };

    let decoded = match resolve_function_call(call_data, &descriptor.abi) {
        Ok(call) if call.is_matched() => call,
        Ok(_) => {
            return SummaryRequest::Degraded {
                warning: UNRECOGNIZED_CALL_WARNING,
            };
        }
        Err(e) => {
            tracing::debug!("call data decode failed for {}: {}", contract_address, e);
            return SummaryRequest::Degraded {
                warning: UNRECOGNIZED_CALL_WARNING,
            };
        }
    };

    let snippet = extract_source_snippet(&descriptor.source_text, &decoded.function_name);
    let prompt =
        build_summarization_prompt(contract_address, &descriptor.name, &snippet, &decoded);

    SummaryRequest::Complete { prompt, decoded }
}

/// Assemble the fixed-field summarization prompt.
pub fn build_summarization_prompt(
    contract_address: &str,
    contract_name: &str,
    snippet: &str,
    decoded: &DecodedCall,
) -> String {
    let arguments =
        serde_json::to_string(&decoded.arguments).unwrap_or_else(|_| "[]".to_string());
    let fragment = decoded
        .fragment
        .as_ref()
        .and_then(|f| serde_json::to_string(f).ok())
        .unwrap_or_else(|| "{}".to_string());
    let source = if snippet.is_empty() {
        SOURCE_UNAVAILABLE
    } else {
        snippet
    };

    format!(
        "ContractAddress: {}\nContractName: {}\nFunctionName: {}\nArguments: {}\nAbiFragment: {}\nSourceCode:\n{}\n\n{}",
        contract_address, contract_name, decoded.function_name, arguments, fragment, source,
        INSTRUCTION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::{ContractDescriptor, ContractLookup};
    use crate::insight::CallArgument;

    const TRANSFER_CALLDATA: &str = "0xa9059cbb000000000000000000000000742d35cc6634c0532925a3b844bc9e7595f0beb000000000000000000000000000000000000000000000000000000000000f4240";

    fn verified_token() -> ContractLookup {
        let abi = serde_json::from_str(
            r#"[{
                "type": "function",
                "name": "transfer",
                "inputs": [
                    {"name": "to", "type": "address"},
                    {"name": "amount", "type": "uint256"}
                ],
                "outputs": [{"name": "", "type": "bool"}],
                "stateMutability": "nonpayable"
            }]"#,
        )
        .unwrap();

        ContractLookup::Verified(ContractDescriptor {
            name: "Token".to_string(),
            source_text: "contract Token { function transfer(address to, uint256 amount) public { _move(to, amount); } }".to_string(),
            abi,
        })
    }

    #[test]
    fn test_unverified_contract_degrades_without_prompt() {
        let request = prepare_request("0xABC", &ContractLookup::NotVerified, TRANSFER_CALLDATA);

        match request {
            SummaryRequest::Degraded { warning } => {
                assert_eq!(warning, UNVERIFIED_CONTRACT_WARNING)
            }
            SummaryRequest::Complete { .. } => panic!("unverified lookup must not build a prompt"),
        }
    }

    #[test]
    fn test_unrecognized_selector_degrades() {
        let request = prepare_request("0xABC", &verified_token(), "0xdeadbeef");

        match request {
            SummaryRequest::Degraded { warning } => {
                assert_eq!(warning, UNRECOGNIZED_CALL_WARNING)
            }
            SummaryRequest::Complete { .. } => panic!("unknown selector must not build a prompt"),
        }
    }

    #[test]
    fn test_undecodable_body_degrades_like_no_match() {
        // transfer selector with a truncated body
        let request = prepare_request("0xABC", &verified_token(), "0xa9059cbb00");

        assert!(matches!(
            request,
            SummaryRequest::Degraded {
                warning: UNRECOGNIZED_CALL_WARNING
            }
        ));
    }

    #[test]
    fn test_complete_request_carries_prompt_and_call() {
        let request = prepare_request("0xABC", &verified_token(), TRANSFER_CALLDATA);

        let SummaryRequest::Complete { prompt, decoded } = request else {
            panic!("expected a complete summarization request");
        };

        assert_eq!(decoded.function_name, "transfer");
        assert_eq!(decoded.arguments.len(), 2);
        assert!(prompt.contains("FunctionName: transfer"));
        assert!(prompt.contains("ContractAddress: 0xABC"));
        assert!(prompt.contains("ContractName: Token"));
        assert!(prompt.contains("_move(to, amount);"));
    }

    #[test]
    fn test_prompt_marks_missing_source() {
        let decoded = DecodedCall {
            function_name: "transfer".to_string(),
            arguments: vec![CallArgument::Uint("1".to_string())],
            fragment: None,
        };
        let prompt = build_summarization_prompt("0xABC", "Token", "", &decoded);

        assert!(prompt.contains("SourceCode:\n(source unavailable)"));
        assert!(prompt.contains("Arguments: [{\"kind\":\"uint\",\"value\":\"1\"}]"));
    }
}
