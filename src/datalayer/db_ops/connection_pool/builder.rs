use sqlx::mysql::MySqlConnectOptions;
use std::str::FromStr;
use std::time::Duration;

use crate::datalayer::db_ops::constants::constants::{
    DATABASE_ACQUIRE_TIMEOUT_VAR, DATABASE_HOST_VAR, DATABASE_MAX_CONNECTIONS_VAR,
    DATABASE_NAME_VAR, DATABASE_PASSWORD_VAR, DATABASE_PORT_VAR, DATABASE_USER_VAR,
    DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_HOST, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MAX_LIFETIME, DEFAULT_PORT, DEFAULT_USER,
};
use crate::datalayer::db_ops::constants::DbConfig;
use crate::errors::{ServiceError, ServiceResult};

/*
Default configuration for the MySQL connection pool.
- host / port / user: localhost:3306 as root
- max_connections: 10
- acquire_timeout: 5 seconds
- idle_timeout: 10 minutes
- max_lifetime: 30 minutes
Connections are opened lazily, so nothing here touches the network.
*/
impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: None,
            database_name: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_lifetime: DEFAULT_MAX_LIFETIME,
        }
    }
}

// Builder pattern for DbConfig
impl DbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `DATABASE_*` variables from the process environment.
    ///
    /// Missing variables keep their defaults; values that are present but do
    /// not parse are a configuration error.
    pub fn from_env() -> ServiceResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`DbConfig::from_env`] with a caller-supplied variable source
    pub fn from_lookup<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(DATABASE_HOST_VAR) {
            config.host = host;
        }
        if let Some(user) = lookup(DATABASE_USER_VAR) {
            config.user = user;
        }
        config.password = lookup(DATABASE_PASSWORD_VAR);
        config.database_name = lookup(DATABASE_NAME_VAR);

        if let Some(port) = lookup(DATABASE_PORT_VAR) {
            config.port = parse_var(DATABASE_PORT_VAR, &port)?;
        }
        if let Some(max) = lookup(DATABASE_MAX_CONNECTIONS_VAR) {
            config.max_connections = parse_var(DATABASE_MAX_CONNECTIONS_VAR, &max)?;
        }
        if let Some(secs) = lookup(DATABASE_ACQUIRE_TIMEOUT_VAR) {
            config.acquire_timeout =
                Duration::from_secs(parse_var(DATABASE_ACQUIRE_TIMEOUT_VAR, &secs)?);
        }

        Ok(config)
    }

    /// Driver connection options for this configuration
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user);

        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if let Some(database_name) = &self.database_name {
            options = options.database(database_name);
        }

        options
    }

    pub fn set_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    pub fn set_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn set_user(mut self, user: String) -> Self {
        self.user = user;
        self
    }

    pub fn set_password(mut self, password: String) -> Self {
        self.password = Some(password);
        self
    }

    pub fn set_database_name(mut self, database_name: String) -> Self {
        self.database_name = Some(database_name);
        self
    }

    pub fn set_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn set_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    pub fn set_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn set_max_lifetime(mut self, max_lifetime: Duration) -> Self {
        self.max_lifetime = max_lifetime;
        self
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> ServiceResult<T> {
    raw.trim().parse().map_err(|_| {
        ServiceError::ConfigurationError(format!("{} has an invalid value: {:?}", name, raw))
    })
}
