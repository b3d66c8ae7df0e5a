//! Webhook authentication. Every event must name the configured account and
//! carry the shared secret.

use iris_dispatch::RawEvent;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

pub struct WebhookAuth {
    secret: SecretString,
    user_id: i64,
}

impl WebhookAuth {
    pub fn new(secret: SecretString, user_id: i64) -> Self {
        Self { secret, user_id }
    }

    pub fn verify(&self, raw: &RawEvent) -> bool {
        let user_matches = raw.get("user_id").and_then(Value::as_i64) == Some(self.user_id);
        let secret_matches = raw.get("secret").and_then(Value::as_str)
            == Some(self.secret.expose_secret());
        user_matches && secret_matches
    }
}
