//! Command tree consumed by the executor. Built by an external parser — this
//! module only defines the shape and a couple of tree-flattening walks used
//! by the pipe and background handlers.

use std::path::PathBuf;

/// Input redirection applied before exec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InRedirect {
    /// `< file`
    File(PathBuf),
    /// `<< body`, the literal here-document text.
    HereDoc(String),
}

/// Output redirection applied before exec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutRedirect {
    /// `> file`
    Truncate(PathBuf),
    /// `>> file`
    Append(PathBuf),
}

/// Redirection pair attached to a command or subshell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirect {
    pub input: Option<InRedirect>,
    pub output: Option<OutRedirect>,
}

impl Redirect {
    pub fn none() -> Self {
        Redirect::default()
    }
}

/// A single external (or builtin) command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCmd {
    /// `argv[0]` is the command name; never empty.
    pub argv: Vec<String>,
    /// Local environment bindings applied in the child only, before exec.
    pub locals: Vec<(String, String)>,
    pub redirect: Redirect,
}

/// Command tree node. Sum type over the original's flat `type`-tagged struct
/// so illegal field combinations (e.g. a `PIPE` node carrying `argv`) are
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Simple(SimpleCmd),
    Pipe(Box<Node>, Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Seq(Box<Node>, Box<Node>),
    /// `right` is whatever follows a trailing `&`, if any.
    Background(Box<Node>, Option<Box<Node>>),
    Subshell {
        body: Box<Node>,
        locals: Vec<(String, String)>,
        redirect: Redirect,
    },
}

/// Flatten a (possibly left- or right-leaning) tree of `Pipe` nodes into the
/// ordered list of pipeline stages. Non-`Pipe` descendants are emitted in
/// left-to-right order.
pub fn flatten_pipe(node: &Node) -> Vec<&Node> {
    let mut stages = Vec::new();
    flatten_pipe_into(node, &mut stages);
    stages
}

fn flatten_pipe_into<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    match node {
        Node::Pipe(left, right) => {
            flatten_pipe_into(left, out);
            flatten_pipe_into(right, out);
        }
        other => out.push(other),
    }
}

/// Result of walking the left child of a `Background` node: the set of
/// subtrees to run detached, and at most one subtree to run in the
/// foreground first.
pub struct BackgroundPlan<'a> {
    pub background: Vec<&'a Node>,
    pub foreground: Option<&'a Node>,
}

/// Decompose `left` — the left child of a `Background` root — per the
/// component design: a `Seq` splits into one foreground subtree (its left)
/// and the rest backgrounded; a `Background` recurses into both children;
/// anything else is a single background subtree.
pub fn flatten_background(left: &Node) -> BackgroundPlan<'_> {
    let mut background = Vec::new();
    let mut foreground = None;
    flatten_background_into(left, &mut background, &mut foreground);
    BackgroundPlan {
        background,
        foreground,
    }
}

fn flatten_background_into<'a>(
    node: &'a Node,
    background: &mut Vec<&'a Node>,
    foreground: &mut Option<&'a Node>,
) {
    match node {
        Node::Seq(left, right) => {
            *foreground = Some(left);
            background.push(right);
        }
        Node::Background(left, right) => {
            flatten_background_into(left, background, foreground);
            if let Some(right) = right {
                flatten_background_into(right, background, foreground);
            }
        }
        other => background.push(other),
    }
}
