/// Best-effort extraction of a function's source text.
///
/// Splits the source on the literal `"function "` keyword and keeps every
/// segment that starts with the requested name and reaches an opening brace.
/// All matches are concatenated, so overloads (and declarations whose name
/// merely starts with the requested name) are included. This is a heuristic,
/// not a parser: nested braces, comments containing the keyword, and string
/// literals are not accounted for. An empty result means "source
/// unavailable", not failure.
pub fn extract_source_snippet(source_text: &str, function_name: &str) -> String {
    if function_name.is_empty() {
        return String::new();
    }

    let mut snippet = String::new();

    for segment in source_text.split("function ").skip(1) {
        if segment.starts_with(function_name) && segment.contains('{') {
            snippet.push_str("function ");
            snippet.push_str(segment);
        }
    }

    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
contract Token {
    mapping(address => uint256) balances;

    function transfer(address to, uint256 amount) public returns (bool) {
        balances[msg.sender] -= amount;
        balances[to] += amount;
        return true;
    }

    function balanceOf(address owner) public view returns (uint256) {
        return balances[owner];
    }
}
"#;

    #[test]
    fn test_extracts_declared_function() {
        let snippet = extract_source_snippet(SOURCE, "balanceOf");

        assert!(snippet.starts_with("function balanceOf(address owner)"));
        assert!(snippet.contains("return balances[owner];"));
        assert!(!snippet.contains("transfer(address to"));
    }

    #[test]
    fn test_overloads_are_concatenated() {
        let source = r#"
    function transfer(address to, uint256 amount) public returns (bool) {
        return _move(msg.sender, to, amount);
    }

    function transfer(address to, uint256 amount, bytes calldata data) public returns (bool) {
        return _move(msg.sender, to, amount);
    }
"#;
        let snippet = extract_source_snippet(source, "transfer");

        assert_eq!(snippet.matches("function transfer(").count(), 2);
        assert!(snippet.contains("bytes calldata data"));
    }

    #[test]
    fn test_missing_function_yields_empty_string() {
        assert_eq!(extract_source_snippet(SOURCE, "approve"), "");
        assert_eq!(extract_source_snippet("", "transfer"), "");
        assert_eq!(extract_source_snippet(SOURCE, ""), "");
    }

    #[test]
    fn test_idempotent() {
        let first = extract_source_snippet(SOURCE, "transfer");
        let second = extract_source_snippet(SOURCE, "transfer");

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_declaration_without_body_is_skipped() {
        // Interface declarations end in a semicolon; no opening brace follows
        // in the segment, so they do not count as an implementation.
        let source = "interface IToken { function transfer(address to, uint256 amount) external returns (bool); }";
        assert_eq!(extract_source_snippet(source, "transfer"), "");
    }
}
