//! Tree-walking dispatch over [`Node`] — the library's single public entry
//! point, `process`, plus the shared foreground-wait/zombie-reap plumbing
//! every handler below it relies on.

mod background;
mod conditional;
mod pipe;
mod simple;
mod subshell;

use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::ast::Node;
use crate::state::ExecState;
use crate::status;

/// Execute `node` to completion (foreground) or to launch (background),
/// updating `state`'s exit status to reflect the last foreground command
/// (§4.1).
pub fn process(node: &Node, state: &mut ExecState) {
    opportunistic_reap(state);

    // SIGINT arrived with no foreground child being waited on: print the
    // "abandoned line" visual cue (§4.10).
    if state.sigint.take() {
        println!();
    }

    match node {
        Node::Simple(cmd) => simple::exec_simple_top(state, cmd),
        Node::Pipe(..) => pipe::exec_pipe(node, state),
        Node::And(left, right) => conditional::exec_and(left, right, state),
        Node::Or(left, right) => conditional::exec_or(left, right, state),
        Node::Seq(left, right) => {
            process(left, state);
            process(right, state);
        }
        Node::Subshell { .. } => subshell::exec_subshell(node, state),
        Node::Background(..) => background::exec_background(node, state),
    }
}

/// Non-blocking reap of any ready child not otherwise being waited on.
/// Called at the top of every `process` entry (§4.1 step 2).
pub(crate) fn opportunistic_reap(state: &mut ExecState) {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => break,
            Ok(status) => report_zombie(state, &status),
            Err(_) => break,
        }
    }
}

fn report_zombie(state: &mut ExecState, status: &WaitStatus) {
    if let (Some(pid), Some(code)) = (self::status::pid_of(status), self::status::exit_code(status))
    {
        state.diag(&format!("Completed: {pid} ({code})"));
        log::info!("reaped background child {pid} status {code}");
        state.zombies = state.zombies.saturating_sub(1);
    }
}

/// Block-wait for a specific foreground child, draining the SIGINT flag on
/// `EINTR` and attempting a non-blocking reap of the same child if it was
/// SIGINT that interrupted the wait (§4.10 point 1).
pub(crate) fn wait_foreground(child: Pid, state: &mut ExecState) {
    loop {
        match waitpid(child, None) {
            Ok(status) => {
                if let Some(code) = self::status::exit_code(&status) {
                    state.set_status(code);
                }
                return;
            }
            Err(nix::Error::EINTR) => {
                if state.sigint.take() {
                    match waitpid(child, Some(WaitPidFlag::WNOHANG)) {
                        Ok(WaitStatus::StillAlive) => continue,
                        Ok(status) => {
                            if let Some(code) = self::status::exit_code(&status) {
                                state.set_status(code);
                            }
                            return;
                        }
                        Err(_) => return,
                    }
                }
            }
            Err(_) => return,
        }
    }
}

/// Wait for every pid in `pending`, crediting non-member reaps to the
/// zombie counter instead, per the pipeline wait loop (§4.4). Returns the
/// pipeline status: the exit code of the last non-zero member reaped, in
/// reap order, or 0 if all members succeeded. Explicit accounting via the
/// pending set, not the original's implicit "decrement loop counter on
/// zombie" trick (§9).
pub(crate) fn wait_pipeline(mut pending: std::collections::HashSet<Pid>, state: &mut ExecState) -> i32 {
    let mut pipeline_status = 0;
    while !pending.is_empty() {
        match waitpid(Pid::from_raw(-1), None) {
            Ok(status) => {
                let Some(pid) = self::status::pid_of(&status) else {
                    continue;
                };
                if pending.remove(&pid) {
                    if let Some(code) = self::status::exit_code(&status) {
                        if code != 0 {
                            pipeline_status = code;
                        }
                    }
                } else {
                    report_zombie(state, &status);
                }
            }
            Err(nix::Error::EINTR) => {
                // Drain the flag here too (§4.10): otherwise a SIGINT that
                // lands mid-pipeline leaves it set after the pipeline
                // finishes, and the next unrelated `process()` call prints
                // a spurious abandoned-line newline.
                state.sigint.take();
                continue;
            }
            Err(_) => break,
        }
    }
    pipeline_status
}
