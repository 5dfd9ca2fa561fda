//! SIMPLE node handling: builtin dispatch (top-level only) or fork+exec of
//! one external command (§4.3).

use crate::ast::SimpleCmd;
use crate::builtins;
use crate::redirect;
use crate::state::ExecState;
use crate::sys::{self, Forked};

use super::wait_foreground;

/// Entry point used only by the top-level `process` dispatch — the one
/// place builtins are recognized (§4.9).
pub fn exec_simple_top(state: &mut ExecState, cmd: &SimpleCmd) {
    if builtins::is_builtin(&cmd.argv[0]) {
        builtins::dispatch(state, &cmd.argv);
    } else {
        exec_simple(state, cmd);
    }
}

/// Fork, apply locals/redirections, and exec. Shared by the top-level
/// non-builtin path and by pipeline stages / subshell bodies, which never
/// check for builtins (§4.9).
pub fn exec_simple(state: &mut ExecState, cmd: &SimpleCmd) {
    match sys::fork() {
        Ok(Forked::Child) => {
            apply_locals(&cmd.locals);
            redirect::apply_redirect(&cmd.argv[0], &cmd.redirect);
            exec_or_die(&cmd.argv);
        }
        Ok(Forked::Parent(child)) => {
            wait_foreground(child, state);
        }
        Err(e) => {
            state.diag(&format!("fork: {e}"));
            state.set_status(e as i32);
        }
    }
}

/// Apply local environment bindings in the child only, before exec.
pub fn apply_locals(locals: &[(String, String)]) {
    for (key, value) in locals {
        // SAFETY: runs in a freshly forked, single-threaded child between
        // fork and exec — no other thread can observe or race this write.
        unsafe { std::env::set_var(key, value) };
    }
}

/// `execvp` the given argv; never returns on success. On failure, report
/// the error against argv[0] and exit with the captured errno, matching
/// `errorSingleExit` in the original.
pub fn exec_or_die(argv: &[String]) -> ! {
    match sys::execvp(argv) {
        Ok(()) => unreachable!(),
        Err(e) => {
            eprintln!("{}: {e}", argv[0]);
            std::process::exit(e as i32);
        }
    }
}
