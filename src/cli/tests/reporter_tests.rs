use super::reporter::Reporter;
use formtree_common::Diagnostic;

#[test]
fn renders_plain_diagnostics() {
    let reporter = Reporter::new(false).with_file("models.json");
    let diagnostic =
        Diagnostic::from_code("/models/User/address", 3002, &["Adress"]);
    assert_eq!(
        reporter.format_diagnostic(&diagnostic),
        format!(
            "models.json:/models/User/address - error FT3002: {}",
            diagnostic.message_text
        )
    );
}

#[test]
fn empty_location_uses_file_name() {
    let reporter = Reporter::new(false).with_file("models.json");
    let diagnostic = Diagnostic::error("", "broken", 3007);
    assert_eq!(
        reporter.format_diagnostic(&diagnostic),
        "models.json - error FT3007: broken"
    );

    let anonymous = Reporter::new(false);
    assert_eq!(
        anonymous.format_diagnostic(&diagnostic),
        "<unknown> - error FT3007: broken"
    );
}

#[test]
fn render_adds_summary_for_several_errors() {
    let reporter = Reporter::new(false);
    let diagnostics = vec![
        Diagnostic::error("a", "first", 4001),
        Diagnostic::error("b", "second", 4002),
    ];
    let output = reporter.render(&diagnostics);
    assert_eq!(
        output,
        "a - error FT4001: first\nb - error FT4002: second\nFound 2 errors.\n"
    );
    assert_eq!(reporter.render(&diagnostics[..1]), "a - error FT4001: first\n");
}
