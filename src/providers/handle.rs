//! Process-wide model handle
//!
//! [`ModelHandleProvider`] builds the backend handle on first use and hands
//! out the same instance afterwards. The hosting process creates one
//! provider at startup and passes it to whatever needs a handle.

use crate::config::Config;
use crate::error::Result;
use crate::providers::Provider;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Shared handle to a configured text-generation backend
pub type ModelHandle = Arc<dyn Provider>;

type HandleFactory = Box<dyn Fn() -> Result<ModelHandle> + Send + Sync>;

/// Lazily constructs and caches a single [`ModelHandle`]
///
/// Construction runs at most once even under concurrent first calls.
/// A failed construction is returned to the caller and not cached, so the
/// next call tries again. There is no invalidation: once built, the handle
/// is returned even if the backend later becomes unreachable.
///
/// # Examples
///
/// ```
/// use medchat::config::Config;
/// use medchat::providers::ModelHandleProvider;
/// use std::sync::Arc;
///
/// # async fn example() -> medchat::error::Result<()> {
/// let handles = ModelHandleProvider::from_config(&Config::default());
/// let first = handles.get_handle().await?;
/// let second = handles.get_handle().await?;
/// assert!(Arc::ptr_eq(&first, &second));
/// # Ok(())
/// # }
/// ```
pub struct ModelHandleProvider {
    factory: HandleFactory,
    cell: OnceCell<ModelHandle>,
}

impl ModelHandleProvider {
    /// Create a provider that builds its handle with `factory`
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<ModelHandle> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: OnceCell::new(),
        }
    }

    /// Create a provider that builds an Ollama handle from `config`
    pub fn from_config(config: &Config) -> Self {
        let ollama = config.ollama.clone();
        let system = config.prompt.system.clone();
        Self::new(move || crate::providers::create_provider(ollama.clone(), system.clone()))
    }

    /// Return the cached handle, building it on first call
    ///
    /// # Errors
    ///
    /// Returns the factory's error if construction fails
    pub async fn get_handle(&self) -> Result<ModelHandle> {
        let handle = self
            .cell
            .get_or_try_init(|| async {
                tracing::debug!("Constructing model handle");
                (self.factory)()
            })
            .await?;
        Ok(Arc::clone(handle))
    }

    /// Whether the handle has been built yet
    pub fn constructed(&self) -> bool {
        self.cell.initialized()
    }
}

impl std::fmt::Debug for ModelHandleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandleProvider")
            .field("constructed", &self.constructed())
            .finish()
    }
}
