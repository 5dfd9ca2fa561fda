//! SUBCMD node handling: fork a child that recursively executes the body
//! in isolation and exits with its final status (§4.6).

use crate::ast::Node;
use crate::redirect;
use crate::state::{ExecConfig, ExecState};
use crate::sys::{self, Forked};

use super::simple::apply_locals;
use super::wait_foreground;

pub fn exec_subshell(node: &Node, state: &mut ExecState) {
    let Node::Subshell {
        body,
        locals,
        redirect: subshell_redirect,
    } = node
    else {
        unreachable!("exec_subshell called on non-Subshell node");
    };

    match sys::fork() {
        Ok(Forked::Child) => {
            apply_locals(locals);
            redirect::apply_redirect("subshell", subshell_redirect);
            std::process::exit(run_subshell_body(body, state));
        }
        Ok(Forked::Parent(child)) => {
            wait_foreground(child, state);
        }
        Err(e) => {
            state.diag(&format!("subshell: fork failed: {e}"));
            state.set_status(e as i32);
        }
    }
}

/// Run `body` to completion in a state forked from `parent` — a real
/// `fork()` duplicates the whole process image, so the subshell sees
/// `parent`'s directory stack and zombie count as they stood at fork time,
/// diverging from it from here on (its own process-wide `?`, and any
/// further `pushd`/`popd`/reaps are invisible to the parent). Returns the
/// numeric exit status to propagate via `exit()`. Shared with the pipeline
/// handler, whose final stage may itself be a `Subshell`.
pub fn run_subshell_body(body: &Node, parent: &ExecState) -> i32 {
    let mut state = ExecState::forked_from(parent, ExecConfig::default());
    super::process(body, &mut state);
    state.status()
}
