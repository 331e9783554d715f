use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to manage test container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),
    /// The server kept refusing connections after it reported readiness.
    #[error("mysql not reachable after {attempts} attempts: {source}")]
    NotReady {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
