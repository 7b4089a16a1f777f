use super::*;

fn kinds(text: &str) -> Vec<SyntaxKind> {
    let mut scanner = ScannerState::new(text);
    let mut out = Vec::new();
    loop {
        let kind = scanner.scan();
        out.push(kind);
        if kind == SyntaxKind::EndOfFileToken {
            return out;
        }
    }
}

#[test]
fn test_scan_punctuation_and_identifiers() {
    assert_eq!(
        kinds("Omit<User, 'id'>[] | null"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::CommaToken,
            SyntaxKind::StringLiteral,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            SyntaxKind::BarToken,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_scan_token_values() {
    let mut scanner = ScannerState::new("  $user_2 \"a\\\"b\" -1.25");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "$user_2");
    assert_eq!(scanner.token_start(), 2);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "a\"b");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.token_value(), "-1.25");
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_unterminated_string() {
    let mut scanner = ScannerState::new("'abc");
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.error(), Some("unterminated string literal"));
}

#[test]
fn test_unknown_character() {
    let mut scanner = ScannerState::new("#");
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.token_value(), "#");
    assert_eq!(scanner.error(), None);
}
