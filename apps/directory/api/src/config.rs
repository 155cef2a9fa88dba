use core_config::{app_info, env_optional, server::ServerConfig, AppInfo, FromEnv};
use database::postgres::PostgresConfig;
use domain_notifications::SmtpConfig;
use std::net::Ipv4Addr;

pub use core_config::Environment;

/// Application configuration composed from the shared config components.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// `None` when `DATABASE_URL` is unset; the in-memory store is used.
    pub database: Option<PostgresConfig>,
    pub server: ServerConfig,
    pub smtp: SmtpConfig,
    /// Link sent in invitations
    pub docs_url: String,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let database = match env_optional("DATABASE_URL") {
            Some(_) => Some(PostgresConfig::from_env()?),
            None => None,
        };
        let smtp = SmtpConfig::from_env()?;
        let docs_url = env_optional("INVITE_DOCS_URL").unwrap_or_else(|| default_docs_url(&server));

        Ok(Self {
            app: app_info!(),
            database,
            server,
            smtp,
            docs_url,
            environment,
        })
    }
}

/// ReDoc page of this process. A wildcard bind address is not routable from
/// a mail client, so it is reported as `localhost`.
fn default_docs_url(server: &ServerConfig) -> String {
    let host = if server.host == Ipv4Addr::UNSPECIFIED.to_string() {
        "localhost"
    } else {
        server.host.as_str()
    };
    format!("http://{}:{}/redoc", host, server.port)
}
