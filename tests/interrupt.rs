// tests/interrupt.rs - Ctrl-C during a run must exit with status 0
// Spawns the real binary, delivers SIGINT, and checks the exit status. A
// process killed by the default signal disposition reports no exit code at
// all, so `code() == Some(0)` only holds when the handler ran.

#![cfg(unix)]

use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

#[test]
fn sigint_exits_with_status_zero() {
    // `demo` blocks reading stdin, which we keep open, so the process is
    // still alive when the signal arrives.
    let mut child = Command::new(env!("CARGO_BIN_EXE_birthdaycrack"))
        .arg("demo")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn binary");

    // Give the process time to install its handler before signalling.
    thread::sleep(Duration::from_millis(800));

    let kill_status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("failed to send SIGINT");
    assert!(kill_status.success());

    let status = child.wait().expect("failed to wait on child");
    assert_eq!(
        status.code(),
        Some(0),
        "interrupt should exit 0, got {:?}",
        status
    );
}
