use std::io::{Read, Seek, SeekFrom};
use std::os::fd::AsRawFd;
use std::sync::Once;

use posh_exec::ast::{InRedirect, Node, OutRedirect, Redirect, SimpleCmd};
use posh_exec::state::{ExecConfig, ExecState};

static LOG_INIT: Once = Once::new();

/// `RUST_LOG=posh_exec=info cargo test -- --nocapture` surfaces the
/// `log::info!` lines `exec/mod.rs` and `exec/background.rs` emit for
/// reaps/backgrounding. `Once` keeps repeated `new_state()` calls across a
/// test binary from trying to install the logger twice.
fn init_logging() {
    LOG_INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn simple(argv: &[&str]) -> Node {
    Node::Simple(SimpleCmd {
        argv: argv.iter().map(|s| s.to_string()).collect(),
        locals: Vec::new(),
        redirect: Redirect::none(),
    })
}

pub fn simple_with_redirect(argv: &[&str], redirect: Redirect) -> Node {
    Node::Simple(SimpleCmd {
        argv: argv.iter().map(|s| s.to_string()).collect(),
        locals: Vec::new(),
        redirect,
    })
}

pub fn input_redirect(path: &std::path::Path) -> Redirect {
    Redirect {
        input: Some(InRedirect::File(path.to_path_buf())),
        output: None,
    }
}

pub fn output_redirect(path: &std::path::Path) -> Redirect {
    Redirect {
        input: None,
        output: Some(OutRedirect::Truncate(path.to_path_buf())),
    }
}

pub fn new_state() -> ExecState {
    init_logging();
    ExecState::new(ExecConfig::default())
}

/// Redirect real fd 1 to a temp file for the duration of `f`, then return
/// whatever was written. Needed because `pushd`/`popd`'s listing and any
/// exec'd command's stdout go to the process's real fd 1, not through any
/// in-memory buffer the library exposes.
pub fn capture_stdout(f: impl FnOnce()) -> String {
    use nix::unistd::dup;

    let mut tmp = tempfile::tempfile().expect("tempfile");
    let saved = dup(std::io::stdout().as_raw_fd()).expect("dup stdout");
    nix::unistd::dup2(tmp.as_raw_fd(), std::io::stdout().as_raw_fd()).expect("dup2 stdout");

    f();

    std::io::Write::flush(&mut std::io::stdout()).ok();
    nix::unistd::dup2(saved, std::io::stdout().as_raw_fd()).expect("restore stdout");
    let _ = nix::unistd::close(saved);

    tmp.seek(SeekFrom::Start(0)).expect("seek");
    let mut out = String::new();
    tmp.read_to_string(&mut out).expect("read captured stdout");
    out
}

/// Same as `capture_stdout` but for fd 2, used to assert on the exact
/// diagnostic text the component design mandates (`Completed: ...`,
/// `Backgrounded: ...`, usage messages).
pub fn capture_stderr(f: impl FnOnce()) -> String {
    use nix::unistd::dup;

    let mut tmp = tempfile::tempfile().expect("tempfile");
    let saved = dup(std::io::stderr().as_raw_fd()).expect("dup stderr");
    nix::unistd::dup2(tmp.as_raw_fd(), std::io::stderr().as_raw_fd()).expect("dup2 stderr");

    f();

    std::io::Write::flush(&mut std::io::stderr()).ok();
    nix::unistd::dup2(saved, std::io::stderr().as_raw_fd()).expect("restore stderr");
    let _ = nix::unistd::close(saved);

    tmp.seek(SeekFrom::Start(0)).expect("seek");
    let mut out = String::new();
    tmp.read_to_string(&mut out).expect("read captured stderr");
    out
}
