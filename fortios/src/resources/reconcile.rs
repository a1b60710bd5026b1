//! Create/read/update/delete reconciliation shared by every resource kind
//!
//! A tracked object is either unbound (no identifier) or bound to a remote
//! object. Create and Update finish with a Read so the returned state always
//! reflects the device. A Read that finds nothing unbinds the object.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{0}")]
    Validation(String),

    #[error("the {field} argument is the key and should not be modified here")]
    ImmutableField { field: &'static str },

    #[error("Error {operation} {kind}: {source}")]
    Remote {
        operation: Operation,
        kind: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("{device} connection did not initialize successfully!")]
    NotConfigured { device: &'static str },
}

impl ResourceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Attribute the error is about, when there is one
    pub fn attribute(&self) -> Option<&'static str> {
        match self {
            Self::ImmutableField { field } => Some(*field),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "creating",
            Operation::Read => "reading",
            Operation::Update => "updating",
            Operation::Delete => "deleting",
        })
    }
}

/// How a kind's remote objects come into existence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// Created and deleted through the API, keyed by what create returns
    Managed,
    /// Always exists on the device (physical ports). Create updates it in
    /// place and delete only stops tracking it.
    Fixed { key: String },
    /// Exactly one per device, tracked under a constant identifier
    Singleton { key: &'static str },
}

/// Remote operations of one resource kind
#[async_trait]
pub trait RemoteResource: Send + Sync {
    type Config: Clone + Send + Sync;

    /// Name used in error messages, e.g. `Firewall Object VIP`
    const DISPLAY_NAME: &'static str;

    fn presence(&self, config: &Self::Config) -> Presence;

    /// Rejects changes to attributes that cannot be modified after creation
    fn check_immutable(
        &self,
        _prior: &Self::Config,
        _planned: &Self::Config,
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    /// Identifier to track after a successful read
    fn identifier(&self, id: &str, _config: &Self::Config) -> String {
        id.to_string()
    }

    /// Creates the object and returns the key the device assigned
    async fn create(&self, config: &Self::Config) -> Result<String, ApiError>;

    /// `prior` is the locally known configuration. Some kinds only refresh
    /// the attributes that are set there.
    async fn read(&self, id: &str, prior: &Self::Config)
        -> Result<Option<Self::Config>, ApiError>;

    async fn update(&self, id: &str, config: &Self::Config) -> Result<(), ApiError>;

    async fn delete(&self, id: &str, config: &Self::Config) -> Result<(), ApiError>;
}

/// A configuration bound to a remote object
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<C> {
    pub id: String,
    pub config: C,
}

pub struct Reconciler<R> {
    remote: R,
}

impl<R: RemoteResource> Reconciler<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// `Ok(None)` when the object cannot be read back after it was written
    pub async fn create(
        &self,
        config: &R::Config,
    ) -> Result<Option<Tracked<R::Config>>, ResourceError> {
        let id = match self.remote.presence(config) {
            Presence::Managed => self
                .remote
                .create(config)
                .await
                .map_err(remote_error::<R>(Operation::Create))?,
            Presence::Fixed { key } => {
                tracing::debug!("{} {} always exists, updating in place", R::DISPLAY_NAME, key);
                self.remote
                    .update(&key, config)
                    .await
                    .map_err(remote_error::<R>(Operation::Create))?;
                key
            }
            Presence::Singleton { key } => {
                self.remote
                    .update(key, config)
                    .await
                    .map_err(remote_error::<R>(Operation::Create))?;
                key.to_string()
            }
        };

        tracing::debug!("{} {} written", R::DISPLAY_NAME, id);
        self.read(&id, config).await
    }

    /// `Ok(None)` means the object is gone and should be dropped from state
    pub async fn read(
        &self,
        id: &str,
        prior: &R::Config,
    ) -> Result<Option<Tracked<R::Config>>, ResourceError> {
        match self
            .remote
            .read(id, prior)
            .await
            .map_err(remote_error::<R>(Operation::Read))?
        {
            Some(config) => Ok(Some(Tracked {
                id: self.remote.identifier(id, &config),
                config,
            })),
            None => {
                tracing::warn!("{} {} not found, removing from state", R::DISPLAY_NAME, id);
                Ok(None)
            }
        }
    }

    /// Immutable attributes are checked before anything is sent
    pub async fn update(
        &self,
        id: &str,
        prior: &R::Config,
        planned: &R::Config,
    ) -> Result<Option<Tracked<R::Config>>, ResourceError> {
        self.remote.check_immutable(prior, planned)?;
        self.remote
            .update(id, planned)
            .await
            .map_err(remote_error::<R>(Operation::Update))?;
        self.read(id, planned).await
    }

    pub async fn delete(&self, id: &str, config: &R::Config) -> Result<(), ResourceError> {
        match self.remote.presence(config) {
            Presence::Managed => self
                .remote
                .delete(id, config)
                .await
                .map_err(remote_error::<R>(Operation::Delete)),
            Presence::Fixed { .. } | Presence::Singleton { .. } => {
                tracing::debug!(
                    "{} {} cannot be removed from the device, forgetting it",
                    R::DISPLAY_NAME,
                    id
                );
                Ok(())
            }
        }
    }
}

fn remote_error<R: RemoteResource>(operation: Operation) -> impl Fn(ApiError) -> ResourceError {
    move |source| ResourceError::Remote {
        operation,
        kind: R::DISPLAY_NAME,
        source,
    }
}
