use super::error::EmitError;

/// Reserved CTF role names that pass through identifier escaping unchanged
/// (§4.4.1). Historical consumers depend on these never gaining a leading
/// underscore.
const RESERVED_IDENTIFIERS: &[&str] = &[
    "stream_id",
    "packet_size",
    "content_size",
    "id",
    "v",
    "timestamp",
    "events_discarded",
    "packet_seq_num",
    "timestamp_begin",
    "timestamp_end",
    "cpu_id",
    "magic",
    "uuid",
    "stream_instance_id",
];

/// Escapes an arbitrary field/identifier name into a valid TSDL identifier
/// (§4.4.1). Whitelisted names pass through unchanged; everything else is
/// prefixed with `_` and has every non-alphanumeric, non-`_` byte replaced
/// with `_`.
///
/// This rule is stable on purpose: historical consumers rely on the
/// leading-underscore prefix to disambiguate tracer-provided names from
/// CTF's own reserved fields.
pub fn escape_tsdl_identifier(name: &str) -> Result<String, EmitError> {
    if name.is_empty() {
        return Err(EmitError::InvalidIdentifier(name.to_string()));
    }
    if RESERVED_IDENTIFIERS.contains(&name) {
        return Ok(name.to_string());
    }
    let mut escaped = String::with_capacity(name.len() + 1);
    escaped.push('_');
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            escaped.push(c);
        } else {
            escaped.push('_');
        }
    }
    Ok(escaped)
}

/// Escapes a string value for use inside an `env { KEY = "VALUE"; }` entry
/// (§4.4.2). Per OQ-1, `"` is escaped to `\"` here; the historical source's
/// no-op on that character is not reproduced.
pub fn escape_tsdl_env_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_illegal_characters_with_a_leading_underscore() {
        assert_eq!(escape_tsdl_identifier("my field!").unwrap(), "_my_field_");
    }

    #[test]
    fn reserved_identifiers_pass_through_unchanged() {
        assert_eq!(escape_tsdl_identifier("uuid").unwrap(), "uuid");
        assert_eq!(escape_tsdl_identifier("stream_id").unwrap(), "stream_id");
    }

    #[test]
    fn empty_identifier_is_an_error() {
        assert!(matches!(
            escape_tsdl_identifier(""),
            Err(EmitError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn escaped_output_only_contains_allowed_characters() {
        for input in ["a.b", "foo-bar", "$weird\tname", "caf\u{e9}"] {
            let result = escape_tsdl_identifier(input).unwrap();
            if RESERVED_IDENTIFIERS.contains(&input) {
                assert_eq!(result, input);
            } else {
                assert!(result.starts_with('_'));
                assert!(result
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_'));
            }
        }
    }

    #[test]
    fn env_string_escapes_backslash_newline_and_quote() {
        assert_eq!(escape_tsdl_env_string("a\\b\nc\"d"), "a\\\\b\\nc\\\"d");
    }
}
