//! Per-run credentials

use super::Provider;
use std::collections::HashMap;

/// An opaque provider secret, or the marker that none is needed.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Secret(String),
    NotRequired,
}

impl Credential {
    pub fn secret(value: impl Into<String>) -> Self {
        Credential::Secret(value.into())
    }

    /// The raw secret, if any
    pub fn expose(&self) -> Option<&str> {
        match self {
            Credential::Secret(s) => Some(s),
            Credential::NotRequired => None,
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Secret(_) => f.write_str("Credential::Secret(***)"),
            Credential::NotRequired => f.write_str("Credential::NotRequired"),
        }
    }
}

/// Provider → credential mapping supplied by the caller for one run
#[derive(Debug, Clone, Default)]
pub struct CredentialMap {
    entries: HashMap<Provider, Credential>,
}

impl CredentialMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: Provider, credential: Credential) -> Self {
        self.insert(provider, credential);
        self
    }

    pub fn insert(&mut self, provider: Provider, credential: Credential) {
        self.entries.insert(provider, credential);
    }

    /// Resolve the credential for a provider.
    ///
    /// Providers that need no secret resolve to [`Credential::NotRequired`]
    /// even when absent from the map.
    pub fn credential_for(&self, provider: &Provider) -> Option<Credential> {
        match self.entries.get(provider) {
            Some(credential) => Some(credential.clone()),
            None if !provider.requires_credential() => Some(Credential::NotRequired),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
