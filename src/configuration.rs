use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings{
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub cors: CorsSettings
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApplicationSettings{
    pub host: String,
    pub port: u16
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings{
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub name: String,
    pub require_ssl: bool,
    pub migrate_on_startup: bool,
    pub pool_max_size: u32,
    pub connection_timeout_secs: u64
}

#[derive(Deserialize, Debug, Clone)]
pub struct SessionSettings{
    pub cookie_name: String,
    pub ttl_hours: i64,
    pub secure_cookie: bool,
    pub hmac_secret: SecretString,
    pub prune_interval_secs: u64
}

#[derive(Deserialize, Debug, Clone)]
pub struct CorsSettings{
    pub allowed_origin: String
}

impl DatabaseSettings {
    fn ssl_mode(&self) -> &'static str {
        if self.require_ssl { "require" } else { "prefer" }
    }

    // Url of the postgres server itself, used to create databases
    pub fn server_url(&self) -> SecretString {
        SecretString::from(format!(
            "postgres://{}:{}@{}:{}?sslmode={}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.ssl_mode()
        ))
    }

    pub fn database_url(&self) -> SecretString {
        SecretString::from(format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.name,
            self.ssl_mode()
        ))
    }
}

// Runtime environment, picked with `APP_ENVIRONMENT`.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production"
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            ))
        }
    }
}

impl Settings{
    pub fn get() -> Result<Self, ConfigError>{
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(ConfigError::Message)?;

        Config::builder()
            .add_source(File::with_name("configuration/base.yaml"))
            .add_source(
                File::with_name(&format!("configuration/{}.yaml", environment.as_str()))
                    .required(false)
            )
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?
            .try_deserialize::<Settings>()
    }
}
