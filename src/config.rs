// Configuration and domain types

use crate::error::Error;

/// Identity-provider credentials and subscription, read from the process
/// environment (a `.env` file is loaded at startup when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            client_id: require_env("AZURE_CLIENT_ID")?,
            client_secret: require_env("AZURE_CLIENT_SECRET")?,
            tenant_id: require_env("AZURE_TENANT_ID")?,
            subscription_id: require_env("AZURE_SUBSCRIPTION_ID")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, Error> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::Configuration(format!("{} must be set in the environment", name)))
}

/// Addresses exactly one static site in the management API. All three parts
/// are opaque strings; the only local validation is non-emptiness.
#[derive(Debug, Clone)]
pub struct ResourceIdentifier {
    pub subscription_id: String,
    pub resource_group: String,
    pub site_name: String,
}

impl ResourceIdentifier {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        site_name: impl Into<String>,
    ) -> Result<Self, Error> {
        let id = Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            site_name: site_name.into(),
        };
        for (field, value) in [
            ("subscription id", &id.subscription_id),
            ("resource group", &id.resource_group),
            ("site name", &id.site_name),
        ] {
            if value.is_empty() {
                return Err(Error::Input(format!("{} must not be empty", field)));
            }
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_accepts_non_empty_parts() {
        let id = ResourceIdentifier::new("sub-1", "my-rg", "my-site").unwrap();
        assert_eq!(id.subscription_id, "sub-1");
        assert_eq!(id.resource_group, "my-rg");
        assert_eq!(id.site_name, "my-site");
    }

    #[test]
    fn identifier_rejects_empty_parts() {
        assert!(matches!(
            ResourceIdentifier::new("", "my-rg", "my-site"),
            Err(Error::Input(_))
        ));
        assert!(matches!(
            ResourceIdentifier::new("sub-1", "", "my-site"),
            Err(Error::Input(_))
        ));
        assert!(matches!(
            ResourceIdentifier::new("sub-1", "my-rg", ""),
            Err(Error::Input(_))
        ));
    }
}
