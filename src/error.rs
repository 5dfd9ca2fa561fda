use std::io;

/// Errors raised by library-internal bookkeeping that do not correspond to one
/// of the POSIX-facing error paths in the component design (those are folded
/// into `?` and the diagnostic stream instead, never propagated as `Result`).
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("directory stack is empty")]
    DirStackEmpty,

    #[error("{context}: {source}")]
    Syscall {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Nix(#[from] nix::Error),
}

impl ExecError {
    pub fn syscall(context: &'static str, source: io::Error) -> Self {
        ExecError::Syscall { context, source }
    }

    /// The errno this error carries, when it wraps one. Used to populate `?`
    /// on syscall failure per the error handling design.
    pub fn errno(&self) -> i32 {
        match self {
            ExecError::DirStackEmpty => 1,
            ExecError::Syscall { source, .. } => source.raw_os_error().unwrap_or(1),
            ExecError::Nix(e) => *e as i32,
        }
    }
}

pub type ExecResult<T> = Result<T, ExecError>;
