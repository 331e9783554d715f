use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Whether the failure is worth retrying at the request level.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout(_))
    }
}

/// Broad classes of registry failures, used by boundaries to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input is malformed; fix the input and try again.
    Validation,
    /// A named resource is already in use.
    Conflict,
    /// Temporary failure; the same request may succeed later.
    Transient,
    /// The requested slug does not exist.
    NotFound,
    /// The store failed in a way the caller cannot fix.
    Internal,
}

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid slug format: {0}")]
    InvalidSlugFormat(String),
    #[error("slug already taken: {0}")]
    SlugTaken(String),
    #[error("could not allocate a unique slug after {attempts} attempts")]
    SlugGenerationExhausted { attempts: u32 },
    #[error("unknown slug: {0}")]
    UnknownSlug(String),
    #[error("create for slug '{slug}' timed out; the link may or may not exist")]
    CreateOutcomeUnknown { slug: String },
    #[error("store {operation} timed out")]
    StoreTimeout { operation: &'static str },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::InvalidUrl(_) | RegistryError::InvalidSlugFormat(_) => {
                ErrorKind::Validation
            }
            RegistryError::SlugTaken(_) => ErrorKind::Conflict,
            RegistryError::SlugGenerationExhausted { .. }
            | RegistryError::CreateOutcomeUnknown { .. }
            | RegistryError::StoreTimeout { .. } => ErrorKind::Transient,
            RegistryError::UnknownSlug(_) => ErrorKind::NotFound,
            RegistryError::Storage(e) if e.is_transient() => ErrorKind::Transient,
            RegistryError::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retriable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}
