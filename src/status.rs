//! Convert a reaped child's `nix::sys::wait::WaitStatus` into shell-style
//! exit code semantics, and pull the originating pid back out of it.

use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;

/// `WEXITSTATUS` on normal exit; `128 + signal` on termination by signal,
/// matching the convention used elsewhere in this codebase's lineage for
/// reporting a signaled child's status as a single integer. `None` for
/// statuses that represent neither (stopped/continued — not reachable here
/// since this executor never requests `WUNTRACED`).
pub fn exit_code(status: &WaitStatus) -> Option<i32> {
    match status {
        WaitStatus::Exited(_, code) => Some(*code),
        WaitStatus::Signaled(_, signal, _) => Some(128 + *signal as i32),
        _ => None,
    }
}

pub fn pid_of(status: &WaitStatus) -> Option<Pid> {
    match status {
        WaitStatus::Exited(pid, _)
        | WaitStatus::Signaled(pid, _, _)
        | WaitStatus::Stopped(pid, _)
        | WaitStatus::Continued(pid) => Some(*pid),
        WaitStatus::PtraceEvent(pid, _, _) | WaitStatus::PtraceSyscall(pid) => Some(*pid),
        WaitStatus::StillAlive => None,
    }
}
