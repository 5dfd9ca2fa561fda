//! Executor state threaded through `process`, replacing the original's
//! process-global exit-status variable, directory stack, and zombie counter
//! with a single owned value (see SPEC_FULL.md design notes, §9).

use std::path::PathBuf;

use crate::error::{ExecError, ExecResult};
use crate::signal::SigintFlag;

/// Where diagnostic ("Completed: ...", "Backgrounded: ...", usage/error
/// messages) text goes. A plain field rather than a trait object, since the
/// only two targets that matter in practice are real stderr and an
/// in-memory buffer for tests.
pub enum Diag {
    Stderr,
    Buffer(Vec<u8>),
}

impl Diag {
    pub fn write(&mut self, line: &str) {
        match self {
            Diag::Stderr => eprintln!("{line}"),
            Diag::Buffer(buf) => {
                buf.extend_from_slice(line.as_bytes());
                buf.push(b'\n');
            }
        }
    }
}

/// Construction-time knobs for an [`ExecState`]. Stands in for the file-based
/// configuration layer this subsystem has no use for — everything here is
/// set up directly by the embedding binary.
pub struct ExecConfig {
    pub diag: Diag,
}

impl Default for ExecConfig {
    fn default() -> Self {
        ExecConfig { diag: Diag::Stderr }
    }
}

/// LIFO stack of working directories, populated by `pushd` and drained by
/// `popd`. `Vec`'s amortized growth replaces the original's explicit
/// capacity-4-then-double bookkeeping.
#[derive(Debug, Default, Clone)]
pub struct DirStack(Vec<PathBuf>);

impl DirStack {
    pub fn push(&mut self, dir: PathBuf) {
        self.0.push(dir);
    }

    pub fn pop(&mut self) -> Option<PathBuf> {
        self.0.pop()
    }

    /// Same as [`DirStack::pop`], but surfaces the empty-stack case as the
    /// library's own error type rather than leaving each caller to re-derive
    /// a status code from `None`.
    pub fn pop_checked(&mut self) -> ExecResult<PathBuf> {
        self.0.pop().ok_or(ExecError::DirStackEmpty)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stack contents, top first — the order `pushd`/`popd` print in.
    pub fn top_to_bottom(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter().rev()
    }
}

/// All mutable state a `process()` call reads or updates. Owned by the
/// caller (the REPL, out of scope here) and threaded through every handler.
pub struct ExecState {
    /// Exit status of the last foreground command, mirrored into the
    /// process environment under `?`.
    status: i32,
    pub dirs: DirStack,
    pub zombies: usize,
    pub config: ExecConfig,
    pub(crate) sigint: SigintFlag,
}

impl ExecState {
    pub fn new(config: ExecConfig) -> Self {
        let mut state = ExecState {
            status: 0,
            dirs: DirStack::default(),
            zombies: 0,
            config,
            sigint: SigintFlag::install(),
        };
        state.set_status(0);
        state
    }

    /// Build the state for a forked subshell/background child. A real
    /// `fork()` duplicates the whole process image, so the child must start
    /// from the parent's directory stack and zombie count rather than empty
    /// ones — only `status` and `config` are genuinely per-invocation.
    pub fn forked_from(parent: &ExecState, config: ExecConfig) -> Self {
        let mut state = ExecState {
            status: 0,
            dirs: parent.dirs.clone(),
            zombies: parent.zombies,
            config,
            sigint: parent.sigint.clone(),
        };
        state.set_status(0);
        state
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    /// Set `?`, mirroring it into the process environment for any child
    /// that inspects it via `getenv("?")`.
    pub fn set_status(&mut self, status: i32) {
        self.status = status;
        // SAFETY: single-threaded shell process, main thread only; no
        // concurrent env access can race this write.
        unsafe { std::env::set_var("?", status.to_string()) };
    }

    pub fn diag(&mut self, line: &str) {
        self.config.diag.write(line);
    }
}

impl Default for ExecState {
    fn default() -> Self {
        ExecState::new(ExecConfig::default())
    }
}
