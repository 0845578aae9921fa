//! Common types used across secret lookup operations.
//!
//! This module defines the shared data structures passed between secret
//! stores and their consumers.

use std::collections::HashMap;

use zeroize::Zeroizing;

/// Macro to define a newtype wrapper around `String` with standard trait
/// implementations.
///
/// Each generated type:
/// - Is a transparent wrapper around `String`
/// - Derives `Clone`, `Debug`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Derives `Serialize` and `Deserialize` (transparent)
/// - Implements `From<String>`, `From<&str>`, and `Into<String>`
/// - Implements `Display` that outputs the inner value
macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Returns the inner value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> Self {
                name.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_name!(
    /// Namespace a secret lookup is scoped to.
    ///
    /// Secrets live inside a namespace, and every lookup names one
    /// explicitly. Wrapping the raw `String` prevents accidental misuse —
    /// passing a [`SecretName`] where a `Namespace` is expected is a
    /// compile-time error.
    ///
    /// # Examples
    ///
    /// ```
    /// use certkit_secrets::Namespace;
    ///
    /// let ns = Namespace::from("sandbox");
    /// assert_eq!(ns.as_str(), "sandbox");
    /// assert_eq!(ns.to_string(), "sandbox");
    /// ```
    Namespace
);

define_name!(
    /// Name of a secret within a namespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use certkit_secrets::SecretName;
    ///
    /// let name = SecretName::from("tpp-credentials");
    /// assert_eq!(name.as_str(), "tpp-credentials");
    /// ```
    SecretName
);

/// Reference to a secret, optionally narrowed to a single entry.
///
/// When `key` is `None` the consumer falls back to its own well-known entry
/// names; when set, only that entry is read.
///
/// # Examples
///
/// ```
/// use certkit_secrets::SecretSelector;
///
/// let whole = SecretSelector::new("tpp-credentials");
/// assert!(whole.key.is_none());
///
/// let entry = SecretSelector::with_key("cloud-token", "token");
/// assert_eq!(entry.key.as_deref(), Some("token"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SecretSelector {
    /// Name of the referenced secret.
    pub name: SecretName,

    /// Entry inside the secret, if the consumer should not use its default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl SecretSelector {
    /// Creates a selector for a whole secret.
    #[must_use]
    pub fn new(name: impl Into<SecretName>) -> Self {
        Self { name: name.into(), key: None }
    }

    /// Creates a selector narrowed to a single entry.
    #[must_use]
    pub fn with_key(name: impl Into<SecretName>, key: impl Into<String>) -> Self {
        Self { name: name.into(), key: Some(key.into()) }
    }
}

/// Opaque credential material returned from a lookup.
///
/// A secret is a flat map of entry names to byte values. Values are wrapped
/// in [`Zeroizing`] so they are wiped from memory on drop, and the `Debug`
/// implementation prints entry names only.
///
/// # Examples
///
/// ```
/// use certkit_secrets::Secret;
///
/// let mut secret = Secret::new();
/// secret.insert("username", b"svc-account".to_vec());
/// assert_eq!(secret.get("username"), Some(b"svc-account".as_slice()));
/// assert_eq!(secret.get("password"), None);
/// ```
#[derive(Clone, Default)]
pub struct Secret {
    data: HashMap<String, Zeroizing<Vec<u8>>>,
}

impl Secret {
    /// Creates an empty secret.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any previous value under the same name.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.data.insert(key.into(), Zeroizing::new(value.into()));
    }

    /// Returns the value stored under `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.data.get(key).map(|value| value.as_slice())
    }

    /// Returns `true` if an entry named `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the entry names in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the secret has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Values stay out of Debug output; only entry names are shown.
impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("Secret").field("keys", &keys).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_round_trip() {
        let ns = Namespace::from("team-a");
        assert_eq!(String::from(ns.clone()), "team-a");
        assert_eq!(ns, Namespace::from("team-a".to_owned()));
    }

    #[test]
    fn test_selector_serde_skips_absent_key() {
        let selector = SecretSelector::new("creds");
        let json = serde_json::to_string(&selector).expect("serialize");
        assert_eq!(json, r#"{"name":"creds"}"#);

        let parsed: SecretSelector = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, selector);
    }

    #[test]
    fn test_secret_insert_replaces() {
        let mut secret = Secret::new();
        secret.insert("token", b"old".to_vec());
        secret.insert("token", b"new".to_vec());
        assert_eq!(secret.len(), 1);
        assert_eq!(secret.get("token"), Some(b"new".as_slice()));
    }

    #[test]
    fn test_secret_debug_redacts_values() {
        let mut secret = Secret::new();
        secret.insert("password", b"hunter2".to_vec());
        let rendered = format!("{secret:?}");
        assert!(rendered.contains("password"), "entry names should appear: {rendered}");
        assert!(!rendered.contains("hunter2"), "values must never appear: {rendered}");
    }

    #[test]
    fn test_secret_empty() {
        let secret = Secret::new();
        assert!(secret.is_empty());
        assert_eq!(secret.len(), 0);
        assert!(!secret.contains_key("anything"));
    }
}
