//! PIPE node handling: flatten the (possibly unbalanced) pipe tree into an
//! ordered stage list, fork each stage with the dup2 choreography wiring
//! its stdin/stdout to its neighbors, and reap the whole group (§4.4).

use std::collections::HashSet;
use std::os::fd::OwnedFd;

use crate::ast::{flatten_pipe, Node};
use crate::redirect;
use crate::state::ExecState;
use crate::sys::{self, Forked};

use super::{simple, subshell, wait_pipeline};

pub fn exec_pipe(node: &Node, state: &mut ExecState) {
    let stages = flatten_pipe(node);
    let n = stages.len();
    debug_assert!(n >= 2, "a Pipe node must flatten to at least two stages");

    let mut pending = HashSet::with_capacity(n);
    // Read end inherited from the previous stage; `None` means "inherit the
    // shell's real stdin" (only true for stage 0).
    let mut fdin: Option<OwnedFd> = None;

    for (i, stage) in stages.iter().enumerate() {
        let is_last = i == n - 1;

        let next_pipe = if is_last {
            None
        } else {
            match sys::make_pipe() {
                Ok(pipe) => Some(pipe),
                Err(e) => {
                    state.diag(&format!("pipe: {e}"));
                    state.set_status(e as i32);
                    return;
                }
            }
        };

        match sys::fork() {
            Ok(Forked::Child) => {
                run_stage_in_child(stage, i, fdin, next_pipe, state);
            }
            Ok(Forked::Parent(child)) => {
                pending.insert(child);
                // Drop closes our copy of the previous stage's read end and
                // the new pipe's write end, leaving only the new read end
                // live for the next iteration — no manual bookkeeping.
                fdin = next_pipe.map(|(read, _write)| read);
            }
            Err(e) => {
                state.diag(&format!("fork: {e}"));
                state.set_status(e as i32);
                return;
            }
        }
    }

    let status = wait_pipeline(pending, state);
    state.set_status(status);
}

/// Wire stdin/stdout, apply this stage's redirections and (stage-0-only)
/// locals, then either exec or recurse into a subshell body. Never returns.
fn run_stage_in_child(
    stage: &Node,
    index: usize,
    fdin: Option<OwnedFd>,
    next_pipe: Option<(OwnedFd, OwnedFd)>,
    state: &ExecState,
) -> ! {
    if let Some(fdin) = &fdin {
        if let Err(e) = sys::dup2_owned(fdin, 0) {
            std::process::exit(e as i32);
        }
    }
    if let Some((_, write_end)) = &next_pipe {
        if let Err(e) = sys::dup2_owned(write_end, 1) {
            std::process::exit(e as i32);
        }
    }
    // All pipe fds this stage doesn't need are closed here by drop, once
    // dup2 has given it the copies it does need.
    drop(fdin);
    drop(next_pipe);

    match stage {
        Node::Simple(cmd) => {
            if index == 0 {
                simple::apply_locals(&cmd.locals);
            }
            redirect::apply_redirect(&cmd.argv[0], &cmd.redirect);
            simple::exec_or_die(&cmd.argv);
        }
        Node::Subshell {
            body,
            locals,
            redirect: subshell_redirect,
        } => {
            if index == 0 {
                simple::apply_locals(locals);
            }
            redirect::apply_redirect("subshell", subshell_redirect);
            std::process::exit(subshell::run_subshell_body(body, state));
        }
        other => {
            // Only SIMPLE and SUBCMD are valid pipeline endpoints per the
            // AST invariants (§3); anything else is a malformed tree from
            // the external parser.
            eprintln!("pipeline: unsupported stage node {other:?}");
            std::process::exit(1);
        }
    }
}
