use crate::error::ScaffoldError;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Cooperative cancellation flag shared between the signal listener and the generator.
///
/// Generation checks the token between steps, so a file is either written
/// whole or not started.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
  cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }

  /// Returns [`ScaffoldError::Cancelled`] once the token has been cancelled.
  pub fn checkpoint(&self, step: &str) -> Result<(), ScaffoldError> {
    if self.is_cancelled() {
      tracing::debug!(step, "Cancellation observed");
      return Err(ScaffoldError::Cancelled);
    }
    Ok(())
  }

  /// Cancels this token on the first interrupt delivered to the process.
  ///
  /// The handler is installed before this returns, so an interrupt arriving
  /// before the listener task is first polled still cancels the token
  /// instead of killing the process.
  #[cfg(unix)]
  pub fn cancel_on_interrupt(&self) -> std::io::Result<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::SignalKind;
    use tokio::signal::unix::signal;

    let mut interrupt = signal(SignalKind::interrupt())?;
    let token = self.clone();
    Ok(tokio::spawn(async move {
      if interrupt.recv().await.is_some() {
        tracing::debug!("Interrupt received");
        token.cancel();
      }
    }))
  }

  #[cfg(not(unix))]
  pub fn cancel_on_interrupt(&self) -> std::io::Result<tokio::task::JoinHandle<()>> {
    let token = self.clone();
    Ok(tokio::spawn(async move {
      match tokio::signal::ctrl_c().await {
        Ok(()) => {
          tracing::debug!("Interrupt received");
          token.cancel();
        }
        Err(e) => tracing::warn!(error = %e, "Unable to listen for interrupt signal"),
      }
    }))
  }
}
