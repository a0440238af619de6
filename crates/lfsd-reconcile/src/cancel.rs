use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag asking a running reconciliation to stop early.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Guard that raises the flag when dropped, unless disarmed first.
    ///
    /// Hold it across an `.await` so that dropping the awaiting future
    /// (e.g. on client disconnect) cancels the work it was waiting for.
    pub fn drop_guard(&self) -> CancelOnDrop {
        CancelOnDrop {
            flag: Some(self.clone()),
        }
    }
}

/// See [`CancelFlag::drop_guard`].
#[derive(Debug)]
pub struct CancelOnDrop {
    flag: Option<CancelFlag>,
}

impl CancelOnDrop {
    /// Drop the guard without cancelling.
    pub fn disarm(mut self) {
        self.flag = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(flag) = self.flag.take() {
            flag.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn dropped_guard_cancels() {
        let flag = CancelFlag::new();
        drop(flag.drop_guard());
        assert!(flag.is_cancelled());
    }

    #[test]
    fn disarmed_guard_does_not_cancel() {
        let flag = CancelFlag::new();
        flag.drop_guard().disarm();
        assert!(!flag.is_cancelled());
    }
}
