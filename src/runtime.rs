//! Runtime abstraction layer for async operations
//!
//! Geocoding lookups are spawned through this module so the picker does not
//! depend on a particular executor. Tokio is the default backend; hosts with
//! another executor install their own [`AsyncSpawner`] with [`init_runtime`].

use futures::future::BoxFuture;

use crate::{MapError, Result};

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Result<Box<dyn AsyncHandle>>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

/// Spawns a future on the installed runtime
pub fn spawn<F>(future: F) -> Result<Box<dyn AsyncHandle>>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let spawner = runtime().ok_or_else(|| {
        MapError::Runtime("no async runtime installed; enable 'tokio-runtime' or call init_runtime".to_string())
    })?;
    log::trace!("spawning async task");
    spawner.spawn_boxed(Box::pin(future))
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Spawns onto the Tokio runtime the caller is running inside
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(
                &self,
                future: BoxFuture<'static, ()>,
            ) -> Result<Box<dyn AsyncHandle>> {
                let handle = ::tokio::runtime::Handle::try_current()
                    .map_err(|e| MapError::Runtime(e.to_string()))?;
                Ok(Box::new(TokioHandle(handle.spawn(future))))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Install a spawner. Only the first call takes effect.
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) {
    if RUNTIME.set(spawner).is_err() {
        log::warn!("async runtime already installed; ignoring init_runtime");
    }
}

/// Get the global runtime spawner
pub fn runtime() -> Option<&'static dyn AsyncSpawner> {
    #[cfg(feature = "tokio-runtime")]
    {
        Some(
            RUNTIME
                .get_or_init(|| Box::new(spawners::tokio_impl::TokioSpawner))
                .as_ref(),
        )
    }

    #[cfg(not(feature = "tokio-runtime"))]
    {
        RUNTIME.get().map(|spawner| spawner.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    #[::tokio::test]
    async fn test_tokio_spawner() {
        let handle = spawn(async {
            ::tokio::time::sleep(::tokio::time::Duration::from_millis(10)).await;
        })
        .unwrap();

        assert!(!handle.is_finished());

        ::tokio::time::sleep(::tokio::time::Duration::from_millis(50)).await;
        assert!(handle.is_finished());
    }

    #[cfg(feature = "tokio-runtime")]
    #[::tokio::test]
    async fn test_cancel_stops_task() {
        let (tx, rx) = crossbeam_channel::unbounded::<()>();
        let handle = spawn(async move {
            ::tokio::time::sleep(::tokio::time::Duration::from_millis(20)).await;
            let _ = tx.send(());
        })
        .unwrap();

        handle.cancel();
        ::tokio::time::sleep(::tokio::time::Duration::from_millis(60)).await;
        assert!(handle.is_finished());
        assert!(rx.try_recv().is_err());
    }

    #[cfg(feature = "tokio-runtime")]
    #[test]
    fn test_spawn_outside_runtime_is_an_error() {
        let result = spawn(async {});
        assert!(matches!(result, Err(MapError::Runtime(_))));
    }
}
