//! SEP_AND / SEP_OR handling: short-circuit on the left side's exit status
//! (§4.5). Comparison is against the string form of `?`, matching the
//! original's intentional (if representationally redundant) simplification.

use crate::ast::Node;
use crate::state::ExecState;

pub fn exec_and(left: &Node, right: &Node, state: &mut ExecState) {
    super::process(left, state);
    if state.status().to_string() == "0" {
        super::process(right, state);
    }
}

pub fn exec_or(left: &Node, right: &Node, state: &mut ExecState) {
    super::process(left, state);
    if state.status().to_string() != "0" {
        super::process(right, state);
    }
}
