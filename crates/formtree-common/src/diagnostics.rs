//! Numbered diagnostics shared across the workspace.
//!
//! Library crates report typed errors; every error maps onto one of the codes
//! below so the CLI can print stable, greppable messages.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    // Mode configuration
    pub const CONFLICTING_MODE_FLAGS: u32 = 1001;
    pub const UNKNOWN_MODE_FLAG: u32 = 1002;

    // Form tree derivation
    pub const ROOT_NOT_OBJECT: u32 = 2001;
    pub const UNRESOLVED_DEFINITION: u32 = 2002;
    pub const UNKNOWN_HINT_FIELD: u32 = 2003;
    pub const HINT_MISMATCH: u32 = 2004;
    pub const CYCLIC_MODEL: u32 = 2005;
    pub const DEPTH_EXCEEDED: u32 = 2006;

    // Model documents
    pub const INVALID_TYPE_EXPRESSION: u32 = 3001;
    pub const UNKNOWN_TYPE_NAME: u32 = 3002;
    pub const DUPLICATE_MODEL: u32 = 3003;
    pub const INVALID_MODEL_ENTRY: u32 = 3004;
    pub const INVALID_HINT: u32 = 3005;
    pub const MISSING_ROOT: u32 = 3006;
    pub const INVALID_DOCUMENT: u32 = 3007;
    pub const CIRCULAR_COMPOSITION: u32 = 3008;

    // Runtime conformance
    pub const MISSING_CONTROL: u32 = 4001;
    pub const UNEXPECTED_CONTROL: u32 = 4002;
    pub const CONTROL_KIND_MISMATCH: u32 = 4003;
    pub const NULLABLE_CONTROL: u32 = 4004;
    pub const VALUE_TYPE_MISMATCH: u32 = 4005;
}

pub mod diagnostic_messages {
    pub const CONFLICTING_MODE_FLAGS: &str = "Mode flags '{0}' and '{1}' cannot be combined.";
    pub const UNKNOWN_MODE_FLAG: &str = "Unknown mode flag '{0}'.";
    pub const ROOT_NOT_OBJECT: &str = "Form root must be an object model, found '{0}'.";
    pub const UNRESOLVED_DEFINITION: &str = "Model '{0}' is referenced but never defined.";
    pub const UNKNOWN_HINT_FIELD: &str = "Hint at '{0}' names field '{1}' which does not exist on the model.";
    pub const HINT_MISMATCH: &str = "Hint '{0}' at '{1}' cannot be applied to type '{2}'.";
    pub const CYCLIC_MODEL: &str = "Model '{0}' references itself at '{1}' without a hint that stops the expansion.";
    pub const DEPTH_EXCEEDED: &str = "Form tree at '{0}' exceeds the maximum nesting depth of {1}.";
    pub const INVALID_TYPE_EXPRESSION: &str = "Invalid type expression '{0}': {1}.";
    pub const UNKNOWN_TYPE_NAME: &str = "Cannot find type '{0}'.";
    pub const DUPLICATE_MODEL: &str = "Model '{0}' is defined more than once.";
    pub const INVALID_MODEL_ENTRY: &str = "Invalid model entry at '{0}': {1}.";
    pub const INVALID_HINT: &str = "Invalid hint at '{0}': {1}.";
    pub const MISSING_ROOT: &str = "No root model selected and the document defines {0} models.";
    pub const INVALID_DOCUMENT: &str = "Invalid model document: {0}.";
    pub const CIRCULAR_COMPOSITION: &str = "Model '{0}' is composed from itself.";
    pub const MISSING_CONTROL: &str = "Control '{0}' is required but missing.";
    pub const UNEXPECTED_CONTROL: &str = "Control '{0}' is not part of the form model.";
    pub const CONTROL_KIND_MISMATCH: &str = "Expected a {0} at '{1}', found a {2}.";
    pub const NULLABLE_CONTROL: &str = "Control at '{0}' must be non-nullable.";
    pub const VALUE_TYPE_MISMATCH: &str = "Value at '{0}' is not assignable to '{1}'.";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    msg(diagnostic_codes::CONFLICTING_MODE_FLAGS, diagnostic_messages::CONFLICTING_MODE_FLAGS),
    msg(diagnostic_codes::UNKNOWN_MODE_FLAG, diagnostic_messages::UNKNOWN_MODE_FLAG),
    msg(diagnostic_codes::ROOT_NOT_OBJECT, diagnostic_messages::ROOT_NOT_OBJECT),
    msg(diagnostic_codes::UNRESOLVED_DEFINITION, diagnostic_messages::UNRESOLVED_DEFINITION),
    msg(diagnostic_codes::UNKNOWN_HINT_FIELD, diagnostic_messages::UNKNOWN_HINT_FIELD),
    msg(diagnostic_codes::HINT_MISMATCH, diagnostic_messages::HINT_MISMATCH),
    msg(diagnostic_codes::CYCLIC_MODEL, diagnostic_messages::CYCLIC_MODEL),
    msg(diagnostic_codes::DEPTH_EXCEEDED, diagnostic_messages::DEPTH_EXCEEDED),
    msg(diagnostic_codes::INVALID_TYPE_EXPRESSION, diagnostic_messages::INVALID_TYPE_EXPRESSION),
    msg(diagnostic_codes::UNKNOWN_TYPE_NAME, diagnostic_messages::UNKNOWN_TYPE_NAME),
    msg(diagnostic_codes::DUPLICATE_MODEL, diagnostic_messages::DUPLICATE_MODEL),
    msg(diagnostic_codes::INVALID_MODEL_ENTRY, diagnostic_messages::INVALID_MODEL_ENTRY),
    msg(diagnostic_codes::INVALID_HINT, diagnostic_messages::INVALID_HINT),
    msg(diagnostic_codes::MISSING_ROOT, diagnostic_messages::MISSING_ROOT),
    msg(diagnostic_codes::INVALID_DOCUMENT, diagnostic_messages::INVALID_DOCUMENT),
    msg(diagnostic_codes::CIRCULAR_COMPOSITION, diagnostic_messages::CIRCULAR_COMPOSITION),
    msg(diagnostic_codes::MISSING_CONTROL, diagnostic_messages::MISSING_CONTROL),
    msg(diagnostic_codes::UNEXPECTED_CONTROL, diagnostic_messages::UNEXPECTED_CONTROL),
    msg(diagnostic_codes::CONTROL_KIND_MISMATCH, diagnostic_messages::CONTROL_KIND_MISMATCH),
    msg(diagnostic_codes::NULLABLE_CONTROL, diagnostic_messages::NULLABLE_CONTROL),
    msg(diagnostic_codes::VALUE_TYPE_MISMATCH, diagnostic_messages::VALUE_TYPE_MISMATCH),
];

const fn msg(code: u32, message: &'static str) -> DiagnosticMessage {
    DiagnosticMessage {
        code,
        category: DiagnosticCategory::Error,
        message,
    }
}

/// A rendered diagnostic: a code, its category, the formatted message and the
/// location it applies to (a field path, JSON location or file name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub location: String,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(location: impl Into<String>, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            location: location.into(),
            message_text: message.into(),
        }
    }

    /// Build an error diagnostic from a registered code and its arguments.
    pub fn from_code(location: impl Into<String>, code: u32, args: &[&str]) -> Self {
        let template = get_message_template(code).unwrap_or("{0}");
        Self::error(location, format_message(template, args), code)
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
