//! SIGINT handling. The raw signal handler does only what's async-signal-safe
//! (flip an atomic flag); reaping the interrupted child and updating `?`
//! happens on the main thread wherever the flag is drained (see
//! `exec::wait_foreground` and the top of `process`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag flipped by the SIGINT handler, drained on the main thread.
#[derive(Clone)]
pub struct SigintFlag(Arc<AtomicBool>);

impl SigintFlag {
    /// Install the SIGINT handler once per process. Calling this more than
    /// once is harmless (`signal_hook::flag::register` is idempotent per
    /// flag instance, and each `ExecState` gets its own flag).
    pub fn install() -> Self {
        let flag = Arc::new(AtomicBool::new(false));
        // Registration failure here means the OS refused to let us install a
        // handler at all (e.g. SIGINT already SIG_IGN'd by an ancestor in a
        // way that can't be overridden); nothing useful to do but proceed
        // without the flag ever being set.
        let _ = signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&flag));
        SigintFlag(flag)
    }

    /// True if SIGINT arrived since the last `take`.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Atomically read-and-clear the flag.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_flag() {
        let flag = SigintFlag(Arc::new(AtomicBool::new(true)));
        assert!(flag.is_set());
        assert!(flag.take());
        assert!(!flag.is_set());
        assert!(!flag.take());
    }
}
