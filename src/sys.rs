//! Thin wrappers over the raw fork/pipe/dup2/exec syscalls used by every
//! process-creation site (simple command, pipeline stage, subshell,
//! background child). Centralized here so the four call sites in `exec/`
//! share one way of talking to the kernel, matching the `nix`-based approach
//! used for shell pipeline plumbing in the rest of this codebase's lineage.

use std::ffi::CString;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use nix::unistd::{self, ForkResult, Pid};

/// Result of a successful `fork()`.
pub enum Forked {
    Parent(Pid),
    Child,
}

/// `fork(2)`. Safety: forking a multi-threaded process is unsound in
/// general; this shell is single-threaded by design (§5), which is the
/// precondition `nix::unistd::fork` documents as required of the caller.
pub fn fork() -> nix::Result<Forked> {
    match unsafe { unistd::fork() }? {
        ForkResult::Parent { child } => Ok(Forked::Parent(child)),
        ForkResult::Child => Ok(Forked::Child),
    }
}

/// `pipe(2)`, returning owned fds so the normal Rust drop glue closes them
/// once both branches of a fork have done their dup2 dance — this is what
/// gives us the "no descriptor leaks" invariant without manual close()
/// bookkeeping.
pub fn make_pipe() -> nix::Result<(OwnedFd, OwnedFd)> {
    unistd::pipe()
}

/// Duplicate `from` onto `to`, closing whatever `to` previously referred to.
/// No-op if `from` already *is* `to` (matches the original's `if (fd != N)`
/// guards before every dup2 call).
pub fn dup2(from: RawFd, to: RawFd) -> nix::Result<()> {
    if from == to {
        return Ok(());
    }
    unistd::dup2(from, to)?;
    Ok(())
}

pub fn dup2_owned(from: &OwnedFd, to: RawFd) -> nix::Result<()> {
    dup2(from.as_raw_fd(), to)
}

/// `execvp(2)`. Only returns on failure — the process image is replaced on
/// success, so this has the conventional `-> nix::Result<Infallible>` shape
/// collapsed to `nix::Result<()>` since callers always treat Ok as
/// unreachable.
pub fn execvp(argv: &[String]) -> nix::Result<()> {
    let cstrings: Vec<CString> = argv
        .iter()
        .map(|s| CString::new(s.as_bytes()).expect("argv entries must not contain NUL"))
        .collect();
    unistd::execvp(cstrings[0].as_c_str(), &cstrings)?;
    unreachable!("execvp only returns on error")
}
