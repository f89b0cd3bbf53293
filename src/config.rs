use tracing::{debug, info};

/// Connection settings for the DevJourney API, threaded explicitly into the client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `https://api.example.com`.
    pub api_root: String,
    /// Sent as the `x-api-key` header on every request.
    pub api_key: String,
}

impl ClientConfig {
    pub fn trace_loaded(&self) {
        info!(
            api_root = %self.api_root,
            api_key_set = !self.api_key.is_empty(),
            "Loaded ClientConfig"
        );
        debug!(?self, "ClientConfig loaded (full debug)");
    }
}

// The key never reaches logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_root", &self.api_root)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
