//! Client records
//!
//! A client is first seen through the gateway (as a `ClientProfile`, held
//! in the cache) and persisted on its first tranche.

use serde::{Deserialize, Serialize};

/// Gateway view of a client, as returned by the INN lookup.
///
/// This is exactly what the profile cache holds, as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub orzu_id: i64,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub set_date: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub passport_id: String,
    #[serde(default)]
    pub passport_issue_date: String,
}

impl ClientProfile {
    /// Cache key under which the profile is kept until the client is persisted
    pub fn cache_key(orzu_id: i64) -> String {
        format!("orzu_{}", orzu_id)
    }
}

/// Persisted client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Local identifier
    pub id: i64,
    /// External (gateway) identifier, unique among persisted clients
    pub orzu_id: i64,
    pub pan: Option<String>,
    pub name: String,
    pub phone_number: String,
    pub set_date: String,
    pub passport_id: String,
    pub passport_issue_date: String,
}

impl Client {
    /// Build the persisted form of a profile once the store assigned an id
    pub fn from_profile(id: i64, profile: &ClientProfile) -> Self {
        Self {
            id,
            orzu_id: profile.orzu_id,
            pan: None,
            name: profile.client_name.clone(),
            phone_number: profile.phone_number.clone(),
            set_date: profile.set_date.clone(),
            passport_id: profile.passport_id.clone(),
            passport_issue_date: profile.passport_issue_date.clone(),
        }
    }

    /// Attach the card the client is paying with (in memory only)
    pub fn attach_pan(&mut self, pan: impl Into<String>) {
        self.pan = Some(pan.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key() {
        assert_eq!(ClientProfile::cache_key(9995), "orzu_9995");
    }

    #[test]
    fn test_profile_deserialize_with_missing_fields() {
        let profile: ClientProfile =
            serde_json::from_str(r#"{"orzu_id": 9995, "client_name": "Aziz"}"#).unwrap();
        assert_eq!(profile.orzu_id, 9995);
        assert_eq!(profile.client_name, "Aziz");
        assert!(profile.passport_id.is_empty());
    }

    #[test]
    fn test_client_from_profile() {
        let profile = ClientProfile {
            orzu_id: 9995,
            client_name: "Aziz".to_string(),
            set_date: "2023-01-10".to_string(),
            phone_number: "+992915501234".to_string(),
            passport_id: "A1234567".to_string(),
            passport_issue_date: "2019-05-01".to_string(),
        };

        let mut client = Client::from_profile(7, &profile);
        assert_eq!(client.id, 7);
        assert_eq!(client.name, "Aziz");
        assert!(client.pan.is_none());

        client.attach_pan("4890844032435600");
        assert_eq!(client.pan.as_deref(), Some("4890844032435600"));
    }
}
