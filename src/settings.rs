// Application settings - fetch, merge, upload

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::auth::TokenProvider;
use crate::config::ResourceIdentifier;
use crate::error::Error;

const MANAGEMENT_BASE: &str = "https://management.azure.com";
const API_VERSION: &str = "2023-12-01";

/// The full application-settings state of one static site. The remote API
/// always treats it as a complete replacement set, never a delta.
pub type SettingsMap = BTreeMap<String, String>;

/// Read and replace the settings of a static site. The management API owns
/// the authoritative state; implementations are swappable so tests can run
/// against an in-memory store.
pub trait StaticSiteApi {
    fn list_settings(&self, token: &str, site: &ResourceIdentifier)
        -> Result<SettingsMap, Error>;
    fn replace_settings(
        &self,
        token: &str,
        site: &ResourceIdentifier,
        settings: &SettingsMap,
    ) -> Result<(), Error>;
}

/// Merge existing and new settings. Keys present in `updates` win; keys only
/// in `current` are preserved. There is no way to delete a key.
pub fn merge(mut current: SettingsMap, updates: SettingsMap) -> SettingsMap {
    current.extend(updates);
    current
}

/// Merge new settings into the site's current set, then upload the full set.
///
/// Halts at the first failure. Nothing is written unless the read succeeds,
/// so a failed cycle leaves the remote settings as they were.
pub fn sync_settings(
    credential: &dyn TokenProvider,
    api: &dyn StaticSiteApi,
    site: &ResourceIdentifier,
    updates: SettingsMap,
) -> Result<(), Error> {
    let token = credential.access_token()?;
    let current = api.list_settings(&token, site)?;
    let merged = merge(current, updates);
    api.replace_settings(&token, site, &merged)
}

/// Live client for the Azure management API.
pub struct ManagementClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ManagementClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: MANAGEMENT_BASE.to_string(),
        }
    }

    fn site_url(&self, site: &ResourceIdentifier, operation: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Web/staticSites/{}/{}?api-version={}",
            self.base_url,
            site.subscription_id,
            site.resource_group,
            site.site_name,
            operation,
            API_VERSION
        )
    }
}

impl Default for ManagementClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ReplaceBody<'a> {
    properties: &'a SettingsMap,
}

impl StaticSiteApi for ManagementClient {
    fn list_settings(
        &self,
        token: &str,
        site: &ResourceIdentifier,
    ) -> Result<SettingsMap, Error> {
        let url = self.site_url(site, "listAppSettings");
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::RemoteRejection { status, body });
        }

        let body = response.text()?;
        let envelope: Value = serde_json::from_str(&body)
            .map_err(|err| Error::Decode(format!("{}; body={}", err, body)))?;
        let properties = envelope
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::Decode("response is missing the properties object".to_string()))?;

        Ok(properties
            .iter()
            .map(|(key, value)| (key.clone(), coerce_value(value)))
            .collect())
    }

    fn replace_settings(
        &self,
        token: &str,
        site: &ResourceIdentifier,
        settings: &SettingsMap,
    ) -> Result<(), Error> {
        let url = self.site_url(site, "config/appsettings");
        let body = serde_json::to_vec(&ReplaceBody {
            properties: settings,
        })
        .map_err(Error::Marshal)?;

        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().unwrap_or_default();
            return Err(Error::RemoteRejection { status, body });
        }

        Ok(())
    }
}

/// The API may hand back non-string values (numbers, booleans); all of them
/// are flattened to their textual representation.
fn coerce_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use serde_json::json;

    use super::*;

    fn map(entries: &[(&str, &str)]) -> SettingsMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn site() -> ResourceIdentifier {
        ResourceIdentifier::new("sub-1", "my-rg", "my-site").unwrap()
    }

    struct StaticToken;

    impl TokenProvider for StaticToken {
        fn access_token(&self) -> Result<String, Error> {
            Ok("test-token".to_string())
        }
    }

    struct FailingToken;

    impl TokenProvider for FailingToken {
        fn access_token(&self) -> Result<String, Error> {
            Err(Error::Authentication("credentials rejected".to_string()))
        }
    }

    struct FakeApi {
        remote: RefCell<SettingsMap>,
        reject_reads_with: Option<StatusCode>,
        reads: Cell<usize>,
        writes: RefCell<Vec<SettingsMap>>,
    }

    impl FakeApi {
        fn with_remote(remote: SettingsMap) -> Self {
            Self {
                remote: RefCell::new(remote),
                reject_reads_with: None,
                reads: Cell::new(0),
                writes: RefCell::new(Vec::new()),
            }
        }

        fn rejecting_reads(status: StatusCode) -> Self {
            Self {
                reject_reads_with: Some(status),
                ..Self::with_remote(SettingsMap::new())
            }
        }
    }

    impl StaticSiteApi for FakeApi {
        fn list_settings(
            &self,
            _token: &str,
            _site: &ResourceIdentifier,
        ) -> Result<SettingsMap, Error> {
            self.reads.set(self.reads.get() + 1);
            if let Some(status) = self.reject_reads_with {
                return Err(Error::RemoteRejection {
                    status,
                    body: "denied".to_string(),
                });
            }
            Ok(self.remote.borrow().clone())
        }

        fn replace_settings(
            &self,
            _token: &str,
            _site: &ResourceIdentifier,
            settings: &SettingsMap,
        ) -> Result<(), Error> {
            self.writes.borrow_mut().push(settings.clone());
            *self.remote.borrow_mut() = settings.clone();
            Ok(())
        }
    }

    #[test]
    fn merge_adds_new_keys_and_keeps_existing_ones() {
        let merged = merge(map(&[("A", "1")]), map(&[("B", "2")]));
        assert_eq!(merged, map(&[("A", "1"), ("B", "2")]));
    }

    #[test]
    fn merge_overwrites_keys_present_in_updates() {
        let merged = merge(map(&[("A", "1")]), map(&[("A", "2")]));
        assert_eq!(merged, map(&[("A", "2")]));
    }

    #[test]
    fn merge_with_empty_updates_is_the_identity() {
        let current = map(&[("A", "1"), ("B", "2")]);
        assert_eq!(merge(current.clone(), SettingsMap::new()), current);
    }

    #[test]
    fn merged_key_set_is_the_union_of_both_inputs() {
        let merged = merge(
            map(&[("A", "1"), ("B", "2")]),
            map(&[("B", "20"), ("C", "3")]),
        );
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, ["A", "B", "C"]);
        assert_eq!(merged["B"], "20");
    }

    #[test]
    fn sync_uploads_the_merged_map() {
        let api = FakeApi::with_remote(map(&[("A", "1")]));
        sync_settings(&StaticToken, &api, &site(), map(&[("B", "2")])).unwrap();

        let writes = api.writes.borrow();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0], map(&[("A", "1"), ("B", "2")]));
    }

    #[test]
    fn written_settings_read_back_unchanged() {
        let api = FakeApi::with_remote(SettingsMap::new());
        let updates = map(&[("A", "1"), ("B", "2")]);
        sync_settings(&StaticToken, &api, &site(), updates.clone()).unwrap();

        let read_back = api.list_settings("test-token", &site()).unwrap();
        assert_eq!(read_back, updates);
    }

    #[test]
    fn rejected_read_prevents_any_write() {
        let api = FakeApi::rejecting_reads(StatusCode::FORBIDDEN);
        let result = sync_settings(&StaticToken, &api, &site(), map(&[("B", "2")]));

        match result {
            Err(Error::RemoteRejection { status, .. }) => {
                assert_eq!(status, StatusCode::FORBIDDEN)
            }
            other => panic!("expected remote rejection, got {:?}", other),
        }
        assert!(api.writes.borrow().is_empty());
    }

    #[test]
    fn failed_authentication_makes_no_remote_call() {
        let api = FakeApi::with_remote(map(&[("A", "1")]));
        let result = sync_settings(&FailingToken, &api, &site(), map(&[("B", "2")]));

        assert!(matches!(result, Err(Error::Authentication(_))));
        assert_eq!(api.reads.get(), 0);
        assert!(api.writes.borrow().is_empty());
    }

    #[test]
    fn non_string_values_coerce_to_their_json_text() {
        assert_eq!(coerce_value(&json!("plain")), "plain");
        assert_eq!(coerce_value(&json!(42)), "42");
        assert_eq!(coerce_value(&json!(true)), "true");
    }
}
