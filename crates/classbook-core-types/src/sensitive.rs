//! Sensitive data marker for automatic redaction
//!
//! Person records carry phone numbers, e-mail and home addresses. Anything
//! that ends up in a log line goes through `Sensitive<T>` first.

use std::fmt;

/// Wrapper for personal data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use classbook_core_types::Sensitive;
///
/// let phone = Sensitive::new("91234567");
/// assert_eq!(format!("{:?}", phone), "***REDACTED***");
/// assert_eq!(format!("{}", phone), "***REDACTED***");
///
/// assert_eq!(phone.expose(), &"91234567");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_debug_redaction() {
        let email = Sensitive::new("alex@example.com");
        let debug_str = format!("{:?}", email);
        assert_eq!(debug_str, "***REDACTED***");
        assert!(!debug_str.contains("alex"));
    }

    #[test]
    fn test_sensitive_display_redaction() {
        let phone = Sensitive::new("98765432");
        assert_eq!(format!("{}", phone), "***REDACTED***");
    }

    #[test]
    fn test_sensitive_into_inner() {
        let address = Sensitive::new(String::from("Blk 30 Geylang St 29"));
        assert_eq!(address.into_inner(), "Blk 30 Geylang St 29");
    }

    #[test]
    fn test_sensitive_inside_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Contact {
            name: String,
            phone: Sensitive<String>,
        }

        let contact = Contact {
            name: "Alex Yeoh".to_string(),
            phone: Sensitive::new("87438807".to_string()),
        };

        let debug_str = format!("{:?}", contact);
        assert!(debug_str.contains("Alex Yeoh"));
        assert!(debug_str.contains("***REDACTED***"));
        assert!(!debug_str.contains("87438807"));
    }
}
