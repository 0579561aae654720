//! Shared test infrastructure for integration tests.

use serde_json::Value;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tempfile::TempDir;

/// Variables the binary reads; cleared so the host environment never leaks in.
const ISOLATED_ENV: &[&str] = &[
    "HEDERA_NETWORK",
    "HEDERA_OPERATOR_ID",
    "HEDERA_OPERATOR_KEY",
    "HEDERA_MIRROR_URL",
    "FLUREE_API_TOKEN",
    "FLUREE_HANDLE",
    "FLUREE_BASE_URL",
    "RUST_LOG",
];

/// Scratch directory plus a handle on the built `bhashctl` binary.
pub struct TestFixture {
    pub dir: TempDir,
}

/// Captured result of one `bhashctl` invocation.
#[derive(Debug)]
pub struct RunOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    #[allow(dead_code)]
    pub elapsed_secs: f64,
}

impl RunOutcome {
    /// Parse stdout as JSON, panicking with stderr on failure.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|err| {
            panic!(
                "stdout is not JSON ({err}):\n{}\nstderr:\n{}",
                self.stdout, self.stderr
            )
        })
    }
}

impl TestFixture {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    #[allow(dead_code)]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Argument vector for `hedera bootstrap --spec <spec>` plus `extra`.
    #[allow(dead_code)]
    pub fn bootstrap_args(&self, spec: &Path, extra: &[&str]) -> Vec<String> {
        let mut args = vec![
            "hedera".to_string(),
            "bootstrap".to_string(),
            "--spec".to_string(),
            spec.display().to_string(),
        ];
        args.extend(extra.iter().map(|arg| arg.to_string()));
        args
    }

    /// Write `value` as JSON under the fixture directory.
    pub fn write_json(&self, name: &str, value: &Value) -> anyhow::Result<PathBuf> {
        let path = self.path(name);
        std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(path)
    }

    /// Run `bhashctl` with `args` and an isolated environment.
    pub fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> anyhow::Result<RunOutcome> {
        let mut command = Command::new(binary());
        command.args(args).current_dir(self.dir.path());
        for key in ISOLATED_ENV {
            command.env_remove(key);
        }
        let start = Instant::now();
        let output = command.output()?;
        Ok(RunOutcome {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }
}

fn binary() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_bhashctl"))
}

/// Accept one HTTP request on loopback, answer `200 OK` with `body`, and
/// hand back the raw request text.
#[allow(dead_code)]
pub fn serve_once(body: &'static str) -> (String, std::thread::JoinHandle<String>) {
    use std::io::{Read, Write};
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).expect("read request");
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
            if request_complete(&raw) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        String::from_utf8_lossy(&raw).into_owned()
    });
    (url, handle)
}

#[allow(dead_code)]
fn request_complete(raw: &[u8]) -> bool {
    let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&raw[..end]).to_ascii_lowercase();
    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= end + 4 + length
}
