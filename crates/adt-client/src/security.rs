//! Escaping and validation helpers shared by every ADT crate.
//!
//! Object names end up in URL paths, query strings and XML attributes.
//! Use these helpers for every caller-provided value:
//!
//! ```rust
//! use abap_adt_client::security::{names, url, xml};
//!
//! assert!(names::is_valid_object_name("/DMO/CL_FLIGHT"));
//! assert_eq!(url::object_segment("/DMO/CL_FLIGHT"), "%2fdmo%2fcl_flight");
//! assert_eq!(xml::escape("a < b"), "a &lt; b");
//! ```

/// ABAP repository object name rules.
pub mod names {
    /// Maximum length of any repository object name.
    pub const MAX_OBJECT_NAME_LENGTH: usize = 40;

    /// Check that a name is a plausible ABAP repository object name.
    ///
    /// Accepts letters, digits and underscores, optionally preceded by a
    /// namespace in slashes (`/DMO/`). Case is not significant.
    #[must_use]
    pub fn is_valid_object_name(name: &str) -> bool {
        if name.is_empty() || name.len() > MAX_OBJECT_NAME_LENGTH {
            return false;
        }

        let rest = match name.strip_prefix('/') {
            Some(after) => match after.split_once('/') {
                Some((namespace, rest)) if !namespace.is_empty() && is_word(namespace) => rest,
                _ => return false,
            },
            None => name,
        };

        !rest.is_empty() && is_word(rest)
    }

    /// Like [`is_valid_object_name`], but also accepts local packages
    /// (`$TMP`, `$ZLOCAL`).
    #[must_use]
    pub fn is_valid_package_name(name: &str) -> bool {
        is_valid_object_name(name.strip_prefix('$').unwrap_or(name))
    }

    fn is_word(part: &str) -> bool {
        part.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Check that a transport request number looks like `SIDK900123`.
    #[must_use]
    pub fn is_valid_transport(transport: &str) -> bool {
        transport.len() == 10
            && transport.is_ascii()
            && transport[..3].chars().all(|c| c.is_ascii_alphanumeric())
            && transport.as_bytes()[3].is_ascii_alphabetic()
            && transport[4..].chars().all(|c| c.is_ascii_digit())
    }

    /// Normalize an object name for display and XML payloads.
    #[must_use]
    pub fn normalize(name: &str) -> String {
        name.trim().to_ascii_uppercase()
    }
}

/// URL encoding helpers.
pub mod url {
    /// Percent-encode a value for a path segment or query parameter.
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }

    /// Encode an object name as it appears in an ADT object URI:
    /// lowercased, then percent-encoded (`/` becomes `%2f`).
    #[must_use]
    pub fn object_segment(name: &str) -> String {
        encode_param(&name.trim().to_lowercase()).replace("%2F", "%2f")
    }
}

/// XML escaping for request payloads.
pub mod xml {
    /// Escape text for element content and attribute values.
    #[must_use]
    pub fn escape(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 8);
        for ch in value.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_names() {
        assert!(names::is_valid_object_name("ZCL_DEMO"));
        assert!(names::is_valid_object_name("zcl_demo"));
        assert!(names::is_valid_object_name("/DMO/CL_FLIGHT_AMDP"));
        assert!(!names::is_valid_object_name(""));
        assert!(!names::is_valid_object_name("ZCL DEMO"));
        assert!(!names::is_valid_object_name("ZCL_X'; DROP"));
        assert!(!names::is_valid_object_name("//X"));
        assert!(!names::is_valid_object_name("/DMO/"));
        assert!(!names::is_valid_object_name("../etc"));
        assert!(!names::is_valid_object_name(&"Z".repeat(41)));
    }

    #[test]
    fn test_package_names() {
        assert!(names::is_valid_package_name("$TMP"));
        assert!(names::is_valid_package_name("ZDEMO"));
        assert!(names::is_valid_package_name("/DMO/FLIGHT"));
        assert!(!names::is_valid_package_name("$"));
        assert!(!names::is_valid_package_name("$$TMP"));
        assert!(!names::is_valid_object_name("$TMP"));
    }

    #[test]
    fn test_transport_numbers() {
        assert!(names::is_valid_transport("DEVK900123"));
        assert!(names::is_valid_transport("S4HK000001"));
        assert!(!names::is_valid_transport("DEVK90012"));
        assert!(!names::is_valid_transport("DEV9900123"));
        assert!(!names::is_valid_transport("DEVK90012X"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(names::normalize("  zcl_demo "), "ZCL_DEMO");
    }

    #[test]
    fn test_object_segment() {
        assert_eq!(url::object_segment("ZCL_DEMO"), "zcl_demo");
        assert_eq!(url::object_segment("/DMO/CL_X"), "%2fdmo%2fcl_x");
        assert_eq!(url::encode_param("a b&c"), "a%20b%26c");
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(
            xml::escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
        assert_eq!(xml::escape("plain"), "plain");
    }
}
