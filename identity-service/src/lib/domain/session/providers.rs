use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::session::ports::OAuthProvider;

/// OAuth providers available to the service, by name.
#[derive(Clone, Default)]
pub struct OAuthProviders {
    providers: HashMap<String, Arc<dyn OAuthProvider>>,
}

impl OAuthProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under its own name, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn OAuthProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn with(mut self, provider: Arc<dyn OAuthProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn OAuthProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
