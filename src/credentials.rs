//! Per-session credential holder
//!
//! Credentials live in memory for the lifetime of a session and are handed to
//! the external program as environment variables of that single invocation.
//! A variable is present in the child's environment iff the matching session
//! value is non-empty; an empty value also hides any inherited variable.

use std::collections::BTreeMap;
use std::fmt;
use std::process::Command;

use log::debug;
use serde::Deserialize;

/// The fixed set of credentials the external program understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Credential {
    OpenRouterApiKey,
    ExaApiKey,
    OpenAiApiKey,
    OpenAiApiBase,
}

impl Credential {
    pub const ALL: [Credential; 4] = [
        Credential::OpenRouterApiKey,
        Credential::ExaApiKey,
        Credential::OpenAiApiKey,
        Credential::OpenAiApiBase,
    ];

    /// Environment variable the credential is exposed as
    pub fn env_var(&self) -> &'static str {
        match self {
            Credential::OpenRouterApiKey => "OPENROUTER_API_KEY",
            Credential::ExaApiKey => "EXA_API_KEY",
            Credential::OpenAiApiKey => "OPENAI_API_KEY",
            Credential::OpenAiApiBase => "OPENAI_API_BASE",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Credential::OpenRouterApiKey => "OpenRouter API Key",
            Credential::ExaApiKey => "EXA API Key",
            Credential::OpenAiApiKey => "OpenAI API Key",
            Credential::OpenAiApiBase => "OpenAI API Base URL",
        }
    }

    /// Form field name
    pub fn field(&self) -> &'static str {
        match self {
            Credential::OpenRouterApiKey => "openrouter_api_key",
            Credential::ExaApiKey => "exa_api_key",
            Credential::OpenAiApiKey => "openai_api_key",
            Credential::OpenAiApiBase => "openai_api_base",
        }
    }

    /// Whether the input should be masked
    pub fn is_secret(&self) -> bool {
        !matches!(self, Credential::OpenAiApiBase)
    }
}

/// Credential fields of one form submission
///
/// A blank field clears its credential; a field that was not submitted at all
/// leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialForm {
    pub openrouter_api_key: Option<String>,
    pub exa_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_api_base: Option<String>,
}

impl CredentialForm {
    fn value(&self, credential: Credential) -> Option<&str> {
        match credential {
            Credential::OpenRouterApiKey => self.openrouter_api_key.as_deref(),
            Credential::ExaApiKey => self.exa_api_key.as_deref(),
            Credential::OpenAiApiKey => self.openai_api_key.as_deref(),
            Credential::OpenAiApiBase => self.openai_api_base.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialStatus {
    pub credential: Credential,
    pub is_set: bool,
}

/// In-memory credential values of one session
#[derive(Default, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    values: BTreeMap<Credential, String>,
}

// Keeps secrets out of logs and panic messages.
impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.values.keys().map(|c| c.env_var()))
            .finish()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from the current process environment
    pub fn from_env() -> Self {
        let mut store = Self::new();
        for credential in Credential::ALL {
            let value = std::env::var(credential.env_var()).unwrap_or_default();
            store.set(credential, &value);
        }
        store
    }

    /// Store `value`, or forget the credential when `value` is empty
    pub fn set(&mut self, credential: Credential, value: &str) {
        if value.is_empty() {
            if self.values.remove(&credential).is_some() {
                debug!("Cleared {}", credential.env_var());
            }
        } else {
            debug!("Set {}", credential.env_var());
            self.values.insert(credential, value.to_string());
        }
    }

    /// Apply the submitted fields of a form
    pub fn update(&mut self, form: &CredentialForm) {
        for credential in Credential::ALL {
            if let Some(value) = form.value(credential) {
                self.set(credential, value);
            }
        }
    }

    /// Forget every credential at once
    pub fn clear_all(&mut self) {
        self.values.clear();
        debug!("Cleared all credentials");
    }

    pub fn get(&self, credential: Credential) -> Option<&str> {
        self.values.get(&credential).map(String::as_str)
    }

    pub fn is_set(&self, credential: Credential) -> bool {
        self.values.contains_key(&credential)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn status(&self) -> Vec<CredentialStatus> {
        Credential::ALL
            .iter()
            .map(|&credential| CredentialStatus {
                credential,
                is_set: self.is_set(credential),
            })
            .collect()
    }

    /// Environment the external program should see for each tracked variable
    ///
    /// `Some(value)` means set, `None` means removed.
    pub fn environment(&self) -> Vec<(&'static str, Option<&str>)> {
        Credential::ALL
            .iter()
            .map(|&credential| (credential.env_var(), self.get(credential)))
            .collect()
    }

    /// Set or remove each tracked variable on `command`
    pub fn apply_to(&self, command: &mut Command) {
        for (name, value) in self.environment() {
            match value {
                Some(value) => {
                    command.env(name, value);
                }
                None => {
                    command.env_remove(name);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(command: &Command, name: &str) -> Option<Option<String>> {
        command
            .get_envs()
            .find(|(key, _)| **key == *name)
            .map(|(_, value)| value.map(|v| v.to_string_lossy().into_owned()))
    }

    #[test]
    fn test_set_and_clear_single_credential() {
        let mut store = CredentialStore::new();
        store.set(Credential::OpenRouterApiKey, "sk-or-123");
        assert_eq!(store.get(Credential::OpenRouterApiKey), Some("sk-or-123"));

        store.set(Credential::OpenRouterApiKey, "");
        assert_eq!(store.get(Credential::OpenRouterApiKey), None);
        assert!(store.is_empty());

        store.set(Credential::OpenRouterApiKey, "sk-or-456");
        assert_eq!(store.get(Credential::OpenRouterApiKey), Some("sk-or-456"));
    }

    #[test]
    fn test_apply_to_sets_and_removes() {
        let mut store = CredentialStore::new();
        store.set(Credential::ExaApiKey, "exa-key");

        let mut command = Command::new("true");
        store.apply_to(&mut command);

        assert_eq!(
            env_of(&command, "EXA_API_KEY"),
            Some(Some("exa-key".to_string()))
        );
        // Removed variables are recorded as explicit removals
        assert_eq!(env_of(&command, "OPENROUTER_API_KEY"), Some(None));
        assert_eq!(env_of(&command, "OPENAI_API_KEY"), Some(None));
        assert_eq!(env_of(&command, "OPENAI_API_BASE"), Some(None));
    }

    #[test]
    fn test_update_from_form() {
        let mut store = CredentialStore::new();
        store.set(Credential::OpenAiApiKey, "old");
        store.set(Credential::ExaApiKey, "exa-old");

        let form = CredentialForm {
            openrouter_api_key: Some("or".to_string()),
            openai_api_key: Some(String::new()),
            openai_api_base: Some("https://example.invalid/v1".to_string()),
            ..Default::default()
        };
        store.update(&form);

        assert_eq!(store.get(Credential::OpenRouterApiKey), Some("or"));
        assert_eq!(store.get(Credential::OpenAiApiKey), None);
        // Not submitted, so kept
        assert_eq!(store.get(Credential::ExaApiKey), Some("exa-old"));
        assert_eq!(
            store.get(Credential::OpenAiApiBase),
            Some("https://example.invalid/v1")
        );
    }

    #[test]
    fn test_clear_all() {
        let mut store = CredentialStore::new();
        for credential in Credential::ALL {
            store.set(credential, "value");
        }
        store.clear_all();

        assert!(store.status().iter().all(|status| !status.is_set));
        assert!(store.environment().iter().all(|(_, value)| value.is_none()));
    }

    #[test]
    fn test_debug_hides_values() {
        let mut store = CredentialStore::new();
        store.set(Credential::OpenAiApiKey, "sk-very-secret");

        let debug = format!("{store:?}");
        assert!(debug.contains("OPENAI_API_KEY"));
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn test_only_base_url_is_unmasked() {
        let unmasked: Vec<Credential> = Credential::ALL
            .into_iter()
            .filter(|c| !c.is_secret())
            .collect();
        assert_eq!(unmasked, vec![Credential::OpenAiApiBase]);
    }
}
