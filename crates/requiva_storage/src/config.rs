//! Store configuration and remote credentials.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default remote collection name.
pub const DEFAULT_COLLECTION: &str = "requiva_orders";

/// Default local table path.
pub const DEFAULT_DATA_PATH: &str = "data/orders.csv";

/// Environment variable for the local table path.
pub const ENV_DATA_PATH: &str = "REQUIVA_DATA_PATH";
/// Environment variable for the collection name.
pub const ENV_COLLECTION: &str = "REQUIVA_COLLECTION";
/// Environment variable holding a whole service-account document.
pub const ENV_SERVICE_ACCOUNT_JSON: &str = "REQUIVA_FIREBASE_SERVICE_ACCOUNT_JSON";
/// Environment variable naming a service-account file.
pub const ENV_CREDENTIALS_FILE: &str = "REQUIVA_FIREBASE_CREDENTIALS_FILE";
/// Environment variable for the project id.
pub const ENV_PROJECT_ID: &str = "REQUIVA_FIREBASE_PROJECT_ID";
/// Environment variable for the service identity email.
pub const ENV_CLIENT_EMAIL: &str = "REQUIVA_FIREBASE_CLIENT_EMAIL";
/// Environment variable for the private key.
pub const ENV_PRIVATE_KEY: &str = "REQUIVA_FIREBASE_PRIVATE_KEY";

/// A service identity for the remote document store.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccount {
    /// Project (tenant) identifier.
    pub project_id: String,
    /// Service identity email.
    pub client_email: String,
    /// PEM private key with real newlines.
    pub private_key: String,
    /// OAuth token endpoint, when the document names one.
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccount {
    /// Parses a serialized service-account document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedCredentials`] if the document is not
    /// JSON of the expected shape or a required field is blank.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let account: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::malformed(e.to_string()))?;
        account.checked()
    }

    /// Builds an account from discrete fields.
    ///
    /// Literal `\n` sequences in the key are turned into newlines.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedCredentials`] if a field is blank.
    pub fn from_parts(
        project_id: impl Into<String>,
        client_email: impl Into<String>,
        private_key: &str,
    ) -> Result<Self, ConfigError> {
        Self {
            project_id: project_id.into(),
            client_email: client_email.into(),
            private_key: private_key.replace("\\n", "\n"),
            token_uri: None,
        }
        .checked()
    }

    /// Identity used to reuse clients: project and email.
    #[must_use]
    pub fn identity(&self) -> (String, String) {
        (self.project_id.clone(), self.client_email.clone())
    }

    fn checked(self) -> Result<Self, ConfigError> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::malformed("project_id is empty"));
        }
        if self.client_email.trim().is_empty() {
            return Err(ConfigError::malformed("client_email is empty"));
        }
        if self.private_key.trim().is_empty() {
            return Err(ConfigError::malformed("private_key is empty"));
        }
        Ok(self)
    }
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Where remote credentials may come from.
///
/// Resolution order: the inline document, then the credentials file, then
/// the three discrete fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSource {
    /// A whole service-account document.
    pub service_account_json: Option<String>,
    /// A file containing a service-account document.
    pub credentials_file: Option<PathBuf>,
    /// Discrete project id.
    pub project_id: Option<String>,
    /// Discrete service identity email.
    pub client_email: Option<String>,
    /// Discrete private key, possibly with escaped newlines.
    pub private_key: Option<String>,
}

impl CredentialSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inline service-account document.
    #[must_use]
    pub fn with_service_account_json(mut self, json: impl Into<String>) -> Self {
        self.service_account_json = Some(json.into());
        self
    }

    /// Sets the credentials file.
    #[must_use]
    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Sets the discrete fields.
    #[must_use]
    pub fn with_parts(
        mut self,
        project_id: impl Into<String>,
        client_email: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        self.project_id = Some(project_id.into());
        self.client_email = Some(client_email.into());
        self.private_key = Some(private_key.into());
        self
    }

    /// Whether nothing was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.service_account_json.is_none()
            && self.credentials_file.is_none()
            && self.project_id.is_none()
            && self.client_email.is_none()
            && self.private_key.is_none()
    }

    /// Resolves the supplied credentials into a service account.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] when nothing was supplied,
    /// or the error from the first source that is present but unusable.
    pub fn resolve(&self) -> Result<ServiceAccount, ConfigError> {
        if let Some(json) = non_blank(&self.service_account_json) {
            return ServiceAccount::from_json(json);
        }

        if let Some(path) = &self.credentials_file {
            let json = std::fs::read_to_string(path).map_err(|source| {
                ConfigError::CredentialsFile {
                    path: path.clone(),
                    source,
                }
            })?;
            return ServiceAccount::from_json(&json);
        }

        let project_id = non_blank(&self.project_id);
        let client_email = non_blank(&self.client_email);
        let private_key = non_blank(&self.private_key);
        match (project_id, client_email, private_key) {
            (None, None, None) => Err(ConfigError::MissingCredentials),
            (Some(p), Some(e), Some(k)) => ServiceAccount::from_parts(p, e, k),
            (None, _, _) => Err(ConfigError::IncompleteCredentials {
                missing: "project_id",
            }),
            (_, None, _) => Err(ConfigError::IncompleteCredentials {
                missing: "client_email",
            }),
            (_, _, None) => Err(ConfigError::IncompleteCredentials {
                missing: "private_key",
            }),
        }
    }

    /// Names of the supplied parts, for the status banner.
    #[must_use]
    pub fn present_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.service_account_json.is_some() {
            keys.push("service_account_json");
        }
        if self.credentials_file.is_some() {
            keys.push("credentials_file");
        }
        if self.project_id.is_some() {
            keys.push("project_id");
        }
        if self.client_email.is_some() {
            keys.push("client_email");
        }
        if self.private_key.is_some() {
            keys.push("private_key");
        }
        keys
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSource")
            .field("present", &self.present_keys())
            .field("credentials_file", &self.credentials_file)
            .finish()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Configuration for choosing and opening a record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Remote credentials, possibly empty.
    pub credentials: CredentialSource,
    /// Remote collection name.
    pub collection: String,
    /// Local table path.
    pub data_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            credentials: CredentialSource::default(),
            collection: DEFAULT_COLLECTION.to_string(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values and no credentials.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads configuration from `REQUIVA_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_DATA_PATH) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(collection) = lookup(ENV_COLLECTION).filter(|c| !c.trim().is_empty()) {
            config.collection = collection;
        }
        config.credentials = CredentialSource {
            service_account_json: lookup(ENV_SERVICE_ACCOUNT_JSON),
            credentials_file: lookup(ENV_CREDENTIALS_FILE).map(PathBuf::from),
            project_id: lookup(ENV_PROJECT_ID),
            client_email: lookup(ENV_CLIENT_EMAIL),
            private_key: lookup(ENV_PRIVATE_KEY),
        };
        config
    }

    /// Sets the credential source.
    #[must_use]
    pub fn with_credentials(mut self, credentials: CredentialSource) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the remote collection name.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Sets the local table path.
    #[must_use]
    pub fn with_data_path(mut self, path: impl AsRef<Path>) -> Self {
        self.data_path = path.as_ref().to_path_buf();
        self
    }
}
