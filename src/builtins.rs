//! `cd`, `pushd`, `popd` — the only builtins in scope. Dispatched by string
//! match on `argv[0]`, and only from the top-level `process` entry point
//! (§4.9) — `exec_pipe`/`exec_subshell` never call into this module.

use std::path::{Path, PathBuf};

use crate::state::ExecState;

const BUILTINS: &[&str] = &["cd", "pushd", "popd"];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Run `argv` as a builtin. Caller must have already checked `is_builtin`.
pub fn dispatch(state: &mut ExecState, argv: &[String]) {
    let args = &argv[1..];
    match argv[0].as_str() {
        "cd" => cd(state, args),
        "pushd" => pushd(state, args),
        "popd" => popd(state, args),
        other => unreachable!("dispatch called on non-builtin {other}"),
    }
}

/// Resolve `dir` against `cwd` per the path-resolution rules in §4.9, or
/// `None` for the `.` no-op case. Pure function, no syscalls, so it's
/// separately testable from the chdir/errno plumbing around it.
fn resolve_cd_path(cwd: &Path, dir: &str) -> Option<PathBuf> {
    if dir == "." {
        return None;
    }
    if let Some(stripped) = dir.strip_prefix('/') {
        return Some(PathBuf::from("/").join(stripped));
    }
    if let Some(suffix) = dir.strip_prefix("./") {
        return Some(cwd.join(suffix));
    }
    if let Some(suffix) = dir.strip_prefix("..") {
        let parent = cwd.parent().unwrap_or(cwd);
        // Literal concatenation, not a path join: `cd ../c` leaves `suffix`
        // as "/c" (the separator survives the strip), so parent+suffix
        // already comes out right. `cd ..foo` leaves `suffix` as "foo" with
        // no separator at all, and original_source/process.c:529-535
        // (`strcat(directory, cutPwd); strcat(directory, argv[1] + 2)`)
        // concatenates it onto the parent exactly as-is, yielding `/afoo`
        // rather than `/a/foo` — preserved here rather than "fixed".
        return Some(if suffix.is_empty() {
            parent.to_path_buf()
        } else {
            PathBuf::from(format!("{}{suffix}", parent.display()))
        });
    }
    Some(cwd.join(dir))
}

/// `cd` logic shared by the bare builtin and by `pushd`/`popd`. Sets `?` to
/// the errno on any syscall failure, or to `0` on success, matching the
/// original faithfully rather than normalizing to a fixed `1` (§9).
fn cd(state: &mut ExecState, args: &[String]) {
    if args.len() > 1 {
        state.diag("usage: cd OR cd <dirName>");
        state.set_status(1);
        return;
    }

    let target = match args.first() {
        None => match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home),
            Err(_) => {
                state.diag("cd: HOME not set");
                state.set_status(1);
                return;
            }
        },
        Some(dir) => {
            let cwd = match std::env::current_dir() {
                Ok(cwd) => cwd,
                Err(e) => return fail(state, "cd: getcwd fail", &e),
            };
            match resolve_cd_path(&cwd, dir) {
                Some(path) => path,
                None => {
                    // `cd .` — no-op success.
                    state.set_status(0);
                    return;
                }
            }
        }
    };

    match std::env::set_current_dir(&target) {
        Ok(()) => state.set_status(0),
        Err(e) => fail(state, "cd: chdir fail", &e),
    }
}

fn fail(state: &mut ExecState, context: &str, err: &std::io::Error) {
    state.diag(&format!("{context}: {err}"));
    state.set_status(err.raw_os_error().unwrap_or(1));
}

fn pushd(state: &mut ExecState, args: &[String]) {
    if args.len() != 1 {
        state.diag("usage: pushd <dirName>");
        state.set_status(1);
        return;
    }

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => return fail(state, "pushd: getcwd fail", &e),
    };
    state.dirs.push(cwd);

    cd(state, args);

    if state.status() == 0 {
        print_listing(state);
    } else {
        state.dirs.pop();
    }
}

fn popd(state: &mut ExecState, args: &[String]) {
    if !args.is_empty() {
        state.diag("usage: popd");
        state.set_status(1);
        return;
    }

    let target = match state.dirs.pop_checked() {
        Ok(target) => target,
        Err(e) => {
            state.diag(&format!("popd: {e}"));
            state.set_status(e.errno());
            return;
        }
    };
    let target_arg = vec![target.to_string_lossy().into_owned()];
    cd(state, &target_arg);

    // The original always re-reads cwd and reports success here, even if the
    // cd above failed — preserved faithfully (§9).
    if std::env::current_dir().is_ok() {
        state.set_status(0);
    }
    print_listing(state);
}

fn print_listing(state: &mut ExecState) {
    let cwd = std::env::current_dir().unwrap_or_default();
    let mut line = cwd.display().to_string();
    for dir in state.dirs.top_to_bottom() {
        line.push(' ');
        line.push_str(&dir.display().to_string());
    }
    println!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_dot_is_noop() {
        assert_eq!(resolve_cd_path(Path::new("/a/b"), "."), None);
    }

    #[test]
    fn resolve_absolute() {
        assert_eq!(
            resolve_cd_path(Path::new("/a/b"), "/tmp"),
            Some(PathBuf::from("/tmp"))
        );
    }

    #[test]
    fn resolve_dot_slash_relative() {
        assert_eq!(
            resolve_cd_path(Path::new("/a/b"), "./c"),
            Some(PathBuf::from("/a/b/c"))
        );
    }

    #[test]
    fn resolve_dotdot_alone_is_parent() {
        assert_eq!(
            resolve_cd_path(Path::new("/a/b"), ".."),
            Some(PathBuf::from("/a"))
        );
    }

    #[test]
    fn resolve_dotdot_with_suffix() {
        assert_eq!(
            resolve_cd_path(Path::new("/a/b"), "../c"),
            Some(PathBuf::from("/a/c"))
        );
    }

    #[test]
    fn resolve_plain_name_joins_cwd() {
        assert_eq!(
            resolve_cd_path(Path::new("/a/b"), "c"),
            Some(PathBuf::from("/a/b/c"))
        );
    }

    #[test]
    fn resolve_dotdot_at_root_stays_root() {
        assert_eq!(resolve_cd_path(Path::new("/"), ".."), Some(PathBuf::from("/")));
    }

    /// `cd ..foo` (no `/` between the `..` and what follows) concatenates
    /// literally onto the parent rather than inserting a path separator —
    /// an obscure but faithfully-preserved divergence from a "sensible"
    /// path join. See the comment in `resolve_cd_path`.
    #[test]
    fn resolve_dotdot_no_slash_suffix_concatenates_literally() {
        assert_eq!(
            resolve_cd_path(Path::new("/a/b"), "..foo"),
            Some(PathBuf::from("/afoo"))
        );
    }
}
