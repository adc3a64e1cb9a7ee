//! External syntax checking with `dhcpd -t -cf <file>`.

use std::env;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::settings::ValidatorSettings;

/// Result of asking the oracle about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid { diagnostic: String },
    /// No checker could be run; callers proceed with a warning.
    Unavailable { reason: String },
}

/// Pass/fail check of a configuration file on disk.
pub trait SyntaxOracle {
    fn check(&self, path: &Path) -> Verdict;
}

/// Runs the ISC dhcpd binary in test mode.
#[derive(Debug, Clone)]
pub struct DhcpdOracle {
    binary: Option<PathBuf>,
    timeout: Duration,
}

impl DhcpdOracle {
    pub fn new(binary: Option<PathBuf>, timeout: Duration) -> Self {
        Self { binary, timeout }
    }

    /// Locate the binary: explicit setting, then `search_paths`, then `PATH`.
    pub fn from_settings(settings: &ValidatorSettings) -> Self {
        let binary = match &settings.binary {
            Some(explicit) => Some(explicit.clone()),
            None => settings
                .search_paths
                .iter()
                .find(|path| is_executable(path))
                .cloned()
                .or_else(|| find_in_path("dhcpd")),
        };
        Self::new(binary, settings.timeout)
    }

    pub fn binary(&self) -> Option<&Path> {
        self.binary.as_deref()
    }
}

impl SyntaxOracle for DhcpdOracle {
    fn check(&self, path: &Path) -> Verdict {
        let Some(binary) = &self.binary else {
            return Verdict::Unavailable {
                reason: "dhcpd binary not found".to_string(),
            };
        };
        tracing::debug!(binary = %binary.display(), path = %path.display(), "Running syntax check");
        match run_with_timeout(binary, path, self.timeout) {
            Ok(verdict) => verdict,
            Err(err) => Verdict::Invalid {
                diagnostic: format!("error validating dhcpd configuration: {err}"),
            },
        }
    }
}

fn run_with_timeout(binary: &Path, path: &Path, timeout: Duration) -> std::io::Result<Verdict> {
    let mut stdout_capture = tempfile::tempfile()?;
    let mut stderr_capture = tempfile::tempfile()?;

    let spawned = Command::new(binary)
        .arg("-t")
        .arg("-cf")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_capture.try_clone()?))
        .stderr(Stdio::from(stderr_capture.try_clone()?))
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Verdict::Unavailable {
                reason: format!("{} not found", binary.display()),
            });
        }
        Err(err) => return Err(err),
    };

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(Verdict::Invalid {
                diagnostic: format!(
                    "timeout while validating dhcpd configuration ({}s)",
                    timeout.as_secs()
                ),
            });
        }
        thread::sleep(Duration::from_millis(50));
    };

    if status.success() {
        return Ok(Verdict::Valid);
    }

    let stderr = read_capture(&mut stderr_capture)?;
    let diagnostic = if stderr.trim().is_empty() {
        read_capture(&mut stdout_capture)?
    } else {
        stderr
    };
    Ok(Verdict::Invalid { diagnostic })
}

fn read_capture(file: &mut File) -> std::io::Result<String> {
    let mut raw = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut raw)?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
