//! SEP_BG handling: flatten the `&`/`;` chain hanging off this node's left
//! child into a foreground remainder and a list of detached subtrees,
//! launch the detached ones without waiting, then continue inline (§4.7).

use crate::ast::{flatten_background, Node};
use crate::state::{ExecConfig, ExecState};
use crate::sys::{self, Forked};

pub fn exec_background(node: &Node, state: &mut ExecState) {
    let Node::Background(left, right) = node else {
        unreachable!("exec_background called on non-Background node");
    };

    let plan = flatten_background(left);

    if let Some(foreground) = plan.foreground {
        super::process(foreground, state);
    }

    for background in plan.background {
        match sys::fork() {
            Ok(Forked::Child) => {
                let mut child_state = ExecState::forked_from(state, ExecConfig::default());
                super::process(background, &mut child_state);
                std::process::exit(child_state.status());
            }
            Ok(Forked::Parent(pid)) => {
                state.diag(&format!("Backgrounded: {pid}"));
                log::info!("backgrounded child {pid}");
                state.zombies += 1;
            }
            Err(e) => {
                state.diag(&format!("background: fork failed: {e}"));
                state.set_status(e as i32);
                return;
            }
        }
    }

    if let Some(right) = right {
        super::process(right, state);
    }

    state.set_status(0);
}
