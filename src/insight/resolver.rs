use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt},
    json_abi::JsonAbi,
};

use super::{CallArgument, DecodedCall, InsightError};

/// Resolve raw call data against a contract ABI.
///
/// The first four bytes of the call data select the function; the remainder
/// is decoded per the matched fragment's input types. When no fragment's
/// selector matches (or the data is too short to carry a selector) the
/// result is an unmatched [`DecodedCall`], never an error. A matching
/// fragment whose body cannot be decoded yields [`InsightError::Decode`];
/// callers treat that the same as "no match".
pub fn resolve_function_call(call_data: &str, abi: &JsonAbi) -> Result<DecodedCall, InsightError> {
    let raw = decode_call_data(call_data)?;

    if raw.len() < 4 {
        return Ok(DecodedCall::unmatched());
    }

    let selector = &raw[..4];
    let Some(function) = abi
        .functions()
        .find(|f| f.selector().as_slice() == selector)
    else {
        return Ok(DecodedCall::unmatched());
    };

    let values = function
        .abi_decode_input(&raw[4..], false)
        .map_err(|e| InsightError::Decode(e.to_string()))?;

    let arguments = values
        .iter()
        .map(dyn_sol_value_to_argument)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedCall {
        function_name: function.name.clone(),
        arguments,
        fragment: Some(function.clone()),
    })
}

/// Strip a single 0x prefix and decode the hex payload.
fn decode_call_data(call_data: &str) -> Result<Vec<u8>, InsightError> {
    let trimmed = call_data.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    hex::decode(hex_part).map_err(|e| InsightError::Decode(format!("invalid hex call data: {}", e)))
}

/// Map a decoded ABI value into the tagged argument type.
fn dyn_sol_value_to_argument(value: &DynSolValue) -> Result<CallArgument, InsightError> {
    match value {
        DynSolValue::Address(addr) => Ok(CallArgument::Address(format!("0x{:x}", addr))),
        DynSolValue::Uint(num, _) => Ok(CallArgument::Uint(num.to_string())),
        DynSolValue::Int(num, _) => Ok(CallArgument::Int(num.to_string())),
        DynSolValue::Bool(b) => Ok(CallArgument::Bool(*b)),
        DynSolValue::Bytes(bytes) => Ok(CallArgument::Bytes(format!("0x{}", hex::encode(bytes)))),
        DynSolValue::FixedBytes(word, size) => {
            Ok(CallArgument::Bytes(format!("0x{}", hex::encode(&word[..*size]))))
        }
        DynSolValue::String(s) => Ok(CallArgument::String(s.clone())),
        DynSolValue::Array(values) | DynSolValue::FixedArray(values) => Ok(CallArgument::Array(
            values
                .iter()
                .map(dyn_sol_value_to_argument)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        DynSolValue::Tuple(values) => Ok(CallArgument::Tuple(
            values
                .iter()
                .map(dyn_sol_value_to_argument)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        other => Err(InsightError::Decode(format!(
            "unsupported ABI value: {:?}",
            other
        ))),
    }
}
