use crate::constants::{
    self, API_KEY_ENV, DEFAULT_REQUEST_TIMEOUT_SECONDS, PASSWORD_ENV, USERNAME_ENV,
};
use anyhow::{Context, Result, bail};
use dialoguer::{Input, Password, theme::ColorfulTheme};
use ini::{Ini, Properties};
use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::fs;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Okta API root, e.g. https://example.okta.com/api/v1
    pub okta_base_url: String,
    pub okta_api_key: String,
    pub username: String,
    /// Default application label for `auth`
    pub app: Option<String>,
    /// Default role name for `auth`
    pub role: Option<String>,
    pub request_timeout_seconds: u64,
}

impl Config {
    fn from_ini_section(section: &Properties) -> Self {
        let optional = |key: &str| {
            section
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Self {
            okta_base_url: section.get("okta_base_url").unwrap_or("").to_string(),
            okta_api_key: section.get("okta_api_key").unwrap_or("").to_string(),
            username: section.get("username").unwrap_or("").to_string(),
            app: optional("app"),
            role: optional("role"),
            request_timeout_seconds: section
                .get("request_timeout_seconds")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
    }

    fn save_to_ini(&self, ini: &mut Ini, profile: &str) {
        // Empty `app` / `role` read back as unset
        ini.with_section(Some(section_name(profile)))
            .set("okta_base_url", &self.okta_base_url)
            .set("okta_api_key", &self.okta_api_key)
            .set("username", &self.username)
            .set("app", self.app.as_deref().unwrap_or(""))
            .set("role", self.role.as_deref().unwrap_or(""))
            .set(
                "request_timeout_seconds",
                self.request_timeout_seconds.to_string(),
            );
    }

    /// Apply OKTA_API_KEY / OKTA_USERNAME on top of the file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = env::var(API_KEY_ENV) {
            if !api_key.is_empty() {
                self.okta_api_key = api_key;
            }
        }
        if let Ok(username) = env::var(USERNAME_ENV) {
            if !username.is_empty() {
                self.username = username;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.okta_base_url.is_empty() {
            bail!("okta_base_url is not set");
        }
        if !is_valid_base_url(&self.okta_base_url) {
            bail!(
                "okta_base_url must be an http(s) URL, got '{}'",
                self.okta_base_url
            );
        }
        if self.okta_api_key.is_empty() {
            bail!("okta_api_key is not set (set it in the config file or {API_KEY_ENV})");
        }
        if self.request_timeout_seconds == 0 {
            bail!("request_timeout_seconds must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

pub async fn load(profile: &str) -> Result<Config> {
    let path = get_config_path()?;
    let mut config = load_from(&path, profile).await?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

async fn load_from(path: &Path, profile: &str) -> Result<Config> {
    let contents = fs::read_to_string(path).await.with_context(|| {
        format!(
            "Failed to load config file {}. Please run `okta-saml-broker configure` first",
            path.display()
        )
    })?;
    let ini = Ini::load_from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    let section = ini
        .section(Some(section_name(profile)))
        .with_context(|| format!("Profile '{profile}' not found in config"))?;

    Ok(Config::from_ini_section(section))
}

async fn save_to(path: &Path, profile: &str, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut ini = if path.exists() {
        Ini::load_from_file(path).unwrap_or_else(|_| Ini::new())
    } else {
        Ini::new()
    };

    config.save_to_ini(&mut ini, profile);

    ini.write_to_file(path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    // The file holds an API key
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = fs::metadata(path).await?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o600);
        fs::set_permissions(path, permissions).await?;
    }

    Ok(())
}

pub async fn configure_interactive(profile: &str) -> Result<()> {
    println!("Configuring okta-saml-broker for profile: {profile}");

    let path = get_config_path()?;
    let existing_config = load_from(&path, profile).await.ok();

    if existing_config.is_some() {
        println!("Press Enter to keep current values, or type new values.");
    }
    println!();

    let theme = ColorfulTheme::default();

    let default_config = existing_config.unwrap_or(Config {
        okta_base_url: String::new(),
        okta_api_key: String::new(),
        username: String::new(),
        app: None,
        role: None,
        request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
    });

    let okta_base_url = Input::<String>::with_theme(&theme)
        .with_prompt("Okta API base URL (e.g. https://example.okta.com/api/v1)")
        .default(default_config.okta_base_url.clone())
        .allow_empty(!default_config.okta_base_url.is_empty())
        .validate_with(|input: &String| {
            if is_valid_base_url(input) {
                Ok(())
            } else {
                Err("Base URL must start with http:// or https://")
            }
        })
        .interact_text()
        .context("Failed to read Okta base URL")?;

    let okta_api_key = if default_config.okta_api_key.is_empty() {
        Password::with_theme(&theme)
            .with_prompt("Okta API key")
            .interact()
            .context("Failed to read Okta API key")?
    } else {
        let replacement = Password::with_theme(&theme)
            .with_prompt("Okta API key (leave empty to keep current)")
            .allow_empty_password(true)
            .interact()
            .context("Failed to read Okta API key")?;
        if replacement.is_empty() {
            default_config.okta_api_key.clone()
        } else {
            replacement
        }
    };

    let username = Input::<String>::with_theme(&theme)
        .with_prompt("Okta username")
        .default(default_config.username.clone())
        .allow_empty(true)
        .interact_text()
        .context("Failed to read username")?;

    let app = Input::<String>::with_theme(&theme)
        .with_prompt("Default AWS application label (optional)")
        .default(default_config.app.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .context("Failed to read application label")?;

    let role = Input::<String>::with_theme(&theme)
        .with_prompt("Default role name (optional)")
        .default(default_config.role.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .context("Failed to read role name")?;

    let request_timeout_seconds = Input::<u64>::with_theme(&theme)
        .with_prompt("Request timeout in seconds")
        .default(default_config.request_timeout_seconds)
        .validate_with(|input: &u64| {
            if *input > 0 {
                Ok(())
            } else {
                Err("Timeout must be greater than zero")
            }
        })
        .interact_text()
        .context("Failed to read request timeout")?;

    let config = Config {
        okta_base_url,
        okta_api_key,
        username,
        app: Some(app).filter(|s| !s.is_empty()),
        role: Some(role).filter(|s| !s.is_empty()),
        request_timeout_seconds,
    };

    save_to(&path, profile, &config).await?;

    println!("\nConfiguration saved to {}.", path.display());
    Ok(())
}

/// Password from OKTA_PASSWORD, or None when the caller should prompt.
pub fn password_from_env() -> Option<String> {
    env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty())
}

fn section_name(profile: &str) -> String {
    if profile == "default" {
        profile.to_string()
    } else {
        format!("profile {profile}")
    }
}

fn get_config_path() -> Result<PathBuf> {
    constants::get_config_path().context("Failed to determine config path")
}

fn is_valid_base_url(s: &str) -> bool {
    Url::parse(s)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn sample_config() -> Config {
        Config {
            okta_base_url: "https://example.okta.com/api/v1".to_string(),
            okta_api_key: "00abc".to_string(),
            username: "jane@example.com".to_string(),
            app: Some("AWS Prod".to_string()),
            role: None,
            request_timeout_seconds: 10,
        }
    }

    #[test]
    fn test_valid_base_url() {
        assert!(is_valid_base_url("https://example.okta.com/api/v1"));
        assert!(is_valid_base_url("http://localhost:8080/api/v1"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(!is_valid_base_url(""));
        assert!(!is_valid_base_url("example.okta.com"));
        assert!(!is_valid_base_url("ftp://example.okta.com"));
    }

    #[test]
    fn test_section_name() {
        assert_eq!(section_name("default"), "default");
        assert_eq!(section_name("work"), "profile work");
    }

    #[test]
    fn test_config_from_ini_section() {
        let mut props = Properties::new();
        props.insert(
            "okta_base_url".to_string(),
            "https://example.okta.com/api/v1".to_string(),
        );
        props.insert("okta_api_key".to_string(), "00abc".to_string());
        props.insert("username".to_string(), "jane@example.com".to_string());
        props.insert("app".to_string(), "AWS Prod".to_string());
        props.insert("role".to_string(), "  ".to_string());
        props.insert("request_timeout_seconds".to_string(), "10".to_string());

        let config = Config::from_ini_section(&props);

        assert_eq!(config, sample_config());
    }

    #[test]
    fn test_config_from_ini_section_with_defaults() {
        let props = Properties::new();
        let config = Config::from_ini_section(&props);

        assert_eq!(config.okta_base_url, "");
        assert_eq!(config.app, None);
        assert_eq!(
            config.request_timeout_seconds,
            DEFAULT_REQUEST_TIMEOUT_SECONDS
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(sample_config().validate().is_ok());

        let mut config = sample_config();
        config.okta_api_key = String::new();
        assert!(config.validate().unwrap_err().to_string().contains("okta_api_key"));

        let mut config = sample_config();
        config.okta_base_url = "example.okta.com".to_string();
        assert!(config.validate().is_err());

        let mut config = sample_config();
        config.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_save_and_load_profiles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config");

        let default = sample_config();
        let mut work = sample_config();
        work.app = None;
        work.role = Some("ReadOnly".to_string());

        save_to(&path, "default", &default).await.unwrap();
        save_to(&path, "work", &work).await.unwrap();

        assert_eq!(load_from(&path, "default").await.unwrap(), default);
        assert_eq!(load_from(&path, "work").await.unwrap(), work);
        assert!(load_from(&path, "missing").await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_from(&dir.path().join("config"), "default")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("configure"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let original_key = env::var(API_KEY_ENV).ok();
        let original_user = env::var(USERNAME_ENV).ok();

        unsafe {
            env::set_var(API_KEY_ENV, "from-env");
            env::remove_var(USERNAME_ENV);
        }

        let mut config = sample_config();
        config.apply_env_overrides();
        assert_eq!(config.okta_api_key, "from-env");
        assert_eq!(config.username, "jane@example.com");

        unsafe {
            match original_key {
                Some(val) => env::set_var(API_KEY_ENV, val),
                None => env::remove_var(API_KEY_ENV),
            }
            if let Some(val) = original_user {
                env::set_var(USERNAME_ENV, val);
            }
        }
    }

    #[test]
    #[serial]
    fn test_password_from_env() {
        let original = env::var(PASSWORD_ENV).ok();

        unsafe {
            env::set_var(PASSWORD_ENV, "hunter2");
        }
        assert_eq!(password_from_env(), Some("hunter2".to_string()));

        unsafe {
            env::set_var(PASSWORD_ENV, "");
        }
        assert_eq!(password_from_env(), None);

        unsafe {
            match original {
                Some(val) => env::set_var(PASSWORD_ENV, val),
                None => env::remove_var(PASSWORD_ENV),
            }
        }
    }
}
