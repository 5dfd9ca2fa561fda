//! Applies a node's [`Redirect`] onto descriptors 0/1. Runs inside the
//! forked child, after fork and before exec — failures here terminate the
//! child with the captured errno rather than propagating to the parent
//! (§4.2, §7).

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;

use crate::ast::{InRedirect, OutRedirect, Redirect};
use crate::sys;

/// Report `argv0: <io error>` to stderr and exit the child with the errno,
/// matching `errorSingleExit` in the source this was ported from.
fn die(argv0: &str, err: &std::io::Error) -> ! {
    eprintln!("{argv0}: {err}");
    std::process::exit(err.raw_os_error().unwrap_or(1));
}

/// Apply `redirect` to the current process's stdin/stdout. Must only be
/// called after fork, before exec.
pub fn apply_redirect(argv0: &str, redirect: &Redirect) {
    if let Some(input) = &redirect.input {
        apply_input(argv0, input);
    }
    if let Some(output) = &redirect.output {
        apply_output(argv0, output);
    }
}

fn apply_input(argv0: &str, input: &InRedirect) {
    match input {
        InRedirect::File(path) => {
            let file = match OpenOptions::new().read(true).open(path) {
                Ok(f) => f,
                Err(e) => die(argv0, &e),
            };
            if let Err(e) = sys::dup2(file.as_raw_fd(), 0) {
                die(argv0, &std::io::Error::from(e));
            }
            // `file` drops here, closing the original descriptor.
        }
        InRedirect::HereDoc(body) => {
            // Created-and-unlinked: vanishes on close, nothing for the
            // shell to clean up afterward.
            let mut tmp = match tempfile::tempfile() {
                Ok(f) => f,
                Err(e) => die(argv0, &e),
            };
            if let Err(e) = tmp.write_all(body.as_bytes()) {
                die(argv0, &e);
            }
            if let Err(e) = tmp.seek(SeekFrom::Start(0)) {
                die(argv0, &e);
            }
            if let Err(e) = sys::dup2(tmp.as_raw_fd(), 0) {
                die(argv0, &std::io::Error::from(e));
            }
        }
    }
}

fn apply_output(argv0: &str, output: &OutRedirect) {
    let (path, append) = match output {
        OutRedirect::Truncate(path) => (path, false),
        OutRedirect::Append(path) => (path, true),
    };
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(!append)
        .append(append)
        .mode(0o666)
        .open(path);
    let file = match file {
        Ok(f) => f,
        Err(e) => die(argv0, &e),
    };
    if let Err(e) = sys::dup2(file.as_raw_fd(), 1) {
        die(argv0, &std::io::Error::from(e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    // Exercises the open-and-write logic directly rather than through
    // apply_output, which would clobber the test harness's own fd 1.
    fn write_via(output: &OutRedirect, bytes: &[u8]) {
        let (path, append) = match output {
            OutRedirect::Truncate(path) => (path, false),
            OutRedirect::Append(path) => (path, true),
        };
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(!append)
            .append(append)
            .mode(0o666)
            .open(path)
            .unwrap();
        file.write_all(bytes).unwrap();
    }

    #[test]
    fn truncate_then_append_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_via(&OutRedirect::Truncate(path.clone()), b"first\n");
        write_via(&OutRedirect::Append(path.clone()), b"second\n");

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn truncate_overwrites_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_via(&OutRedirect::Truncate(path.clone()), b"long first line\n");
        write_via(&OutRedirect::Truncate(path.clone()), b"short\n");

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "short\n");
    }

    #[test]
    fn heredoc_body_is_readable_from_offset_zero() {
        let mut tmp = tempfile::tempfile().unwrap();
        tmp.write_all(b"hello\n").unwrap();
        tmp.seek(SeekFrom::Start(0)).unwrap();
        let mut contents = String::new();
        tmp.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "hello\n");
    }
}
