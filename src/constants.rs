use std::{env, path::PathBuf};

use dirs;

/// Configuration directory name under `~/.config`
pub const CONFIG_DIR_NAME: &str = "okta-saml-broker";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config";

/// Environment variable overriding the configuration file location
pub const CONFIG_FILE_ENV: &str = "OKTA_SAML_BROKER_CONFIG";

pub const API_KEY_ENV: &str = "OKTA_API_KEY";
pub const USERNAME_ENV: &str = "OKTA_USERNAME";
pub const PASSWORD_ENV: &str = "OKTA_PASSWORD";

/// Okta `appName` tag identifying AWS account federation apps
pub const AWS_APP_NAME: &str = "amazon_aws";

/// SAML 2.0 assertion namespace
pub const SAML_ASSERTION_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// AWS-specific SAML attribute carrying `principal_arn,role_arn` pairs
pub const AWS_ROLE_ATTRIBUTE: &str = "https://aws.amazon.com/SAML/Attributes/Role";

/// Name of the hidden form field holding the base64 assertion
pub const SAML_RESPONSE_FIELD: &str = "SAMLResponse";

/// Page size used when listing a user's applications
pub const APPS_PAGE_LIMIT: u32 = 200;

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

pub const USER_AGENT: &str = concat!("okta-saml-broker/", env!("CARGO_PKG_VERSION"));

/// Get the configuration file path
/// Respects OKTA_SAML_BROKER_CONFIG if set, otherwise ~/.config/okta-saml-broker/config
pub fn get_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }

    // ~/.config on macOS too, not dirs::config_dir()
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_config_path_with_env() {
        let original = env::var(CONFIG_FILE_ENV).ok();

        unsafe {
            env::set_var(CONFIG_FILE_ENV, "/custom/okta/config");
        }
        let path = get_config_path();
        assert_eq!(path, Some(PathBuf::from("/custom/okta/config")));

        unsafe {
            match original {
                Some(val) => env::set_var(CONFIG_FILE_ENV, val),
                None => env::remove_var(CONFIG_FILE_ENV),
            }
        }
    }

    #[test]
    #[serial]
    fn test_get_config_path_default() {
        let original = env::var(CONFIG_FILE_ENV).ok();

        unsafe {
            env::remove_var(CONFIG_FILE_ENV);
        }
        let path = get_config_path();

        if let Some(p) = path {
            let path_str = p.to_string_lossy();
            assert!(path_str.contains(CONFIG_DIR_NAME));
            assert!(path_str.ends_with(CONFIG_FILE_NAME));
        }

        unsafe {
            if let Some(val) = original {
                env::set_var(CONFIG_FILE_ENV, val);
            }
        }
    }

    #[test]
    fn test_user_agent_has_version() {
        assert!(USER_AGENT.starts_with("okta-saml-broker/"));
    }
}
