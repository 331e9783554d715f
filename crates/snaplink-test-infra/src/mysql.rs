use crate::{Result, TestInfraError};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_PORT: u16 = 3306;

/// Settings for the disposable `snaplink` database.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = "snaplink".to_string(), setter(into))]
    database: String,
    #[builder(default = "snaplink".to_string(), setter(into))]
    user: String,
    #[builder(default = "snaplink".to_string(), setter(into))]
    password: String,
    /// `mysql` image tag.
    #[builder(default = "8.4".to_string(), setter(into))]
    image_tag: String,
    /// Pool size handed out by [`MySqlServer::pool`]; concurrency tests need
    /// more than one connection.
    #[builder(default = 8)]
    max_connections: u32,
    /// Connection attempts made while the server finishes starting.
    #[builder(default = 20)]
    connect_attempts: u32,
    #[builder(default = Duration::from_millis(500))]
    connect_backoff: Duration,
}

/// A throwaway MySQL server; the container goes away on drop.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
    config: MysqlConfig,
}

impl MySqlServer {
    pub async fn new(config: MysqlConfig) -> Result<Self> {
        let container = GenericImage::new("mysql", config.image_tag.as_str())
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.user.as_str())
            .with_env_var("MYSQL_PASSWORD", config.password.as_str())
            .with_env_var("MYSQL_ROOT_PASSWORD", "root")
            .start()
            .await?;

        Ok(Self { container, config })
    }

    /// Starts a server with the default settings.
    pub async fn start_default() -> Result<Self> {
        Self::new(MysqlConfig::builder().build()).await
    }

    pub async fn database_url(&self) -> Result<String> {
        let host = self.container.get_host().await?;
        let port = self.container.get_host_port_ipv4(MYSQL_PORT).await?;
        Ok(format!(
            "mysql://{}:{}@{}:{}/{}",
            self.config.user, self.config.password, host, port, self.config.database
        ))
    }

    /// Opens a pool, retrying while MySQL finishes its first-boot restart.
    ///
    /// The image logs "ready for connections" once before the restart that
    /// applies the init scripts, so the first attempts can be refused.
    pub async fn pool(&self) -> Result<MySqlPool> {
        let url = self.database_url().await?;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let connected = MySqlPoolOptions::new()
                .max_connections(self.config.max_connections)
                .connect(&url)
                .await;

            match connected {
                Ok(pool) => return Ok(pool),
                Err(source) if attempt >= self.config.connect_attempts => {
                    return Err(TestInfraError::NotReady {
                        attempts: attempt,
                        source,
                    });
                }
                Err(_) => tokio::time::sleep(self.config.connect_backoff).await,
            }
        }
    }
}
