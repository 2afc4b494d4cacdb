use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use assert_cmd::Command;

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Writes `source` to a fresh scratch file and returns its path. Each test
/// gets its own file so parallel test threads never collide.
fn scratch_file(tag: &str, source: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!("loxtwo-{tag}-{}-{n}.lox", std::process::id()));
    fs::write(&path, source).expect("should be able to write scratch source file");
    path
}

/// Runs `source` through the named binary (`tlox` or `clox`) and returns
/// (stdout, stderr, exit code).
pub fn run(bin: &str, source: &str) -> (String, String, i32) {
    let path = scratch_file(bin, source);
    let output = Command::cargo_bin(bin)
        .unwrap()
        .arg(&path)
        .output()
        .expect("binary should run");
    let _ = fs::remove_file(&path);
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
        output.status.code().unwrap_or(-1),
    )
}

#[macro_export]
macro_rules! prints {
    ($bin:expr, $source:expr, $($expected:expr),* $(,)?) => {{
        let (stdout, stderr, code) = $crate::common::run($bin, $source);
        let expected: Vec<&str> = vec![$($expected),*];
        let expected = if expected.is_empty() { String::new() } else { format!("{}\n", expected.join("\n")) };
        assert_eq!(expected, stdout, "stderr was: {stderr}");
        assert_eq!(0, code, "stderr was: {stderr}");
    }};
}

#[macro_export]
macro_rules! fails {
    ($bin:expr, $source:expr, $code:expr) => {{
        let (_stdout, _stderr, code) = $crate::common::run($bin, $source);
        assert_eq!($code, code);
    }};
}
