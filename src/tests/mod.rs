use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard};

use crate::parse::execute::run_fork;
use crate::prelude::*;

pub mod dirstack;
pub mod state;

static PROCESS_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that touch process-wide state.
///
/// The evaluator changes the working directory, the environment and fds 0/1,
/// and forks, so none of that can overlap between test threads.
pub fn process_lock() -> MutexGuard<'static, ()> {
	PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Puts the working directory back when dropped
pub struct CwdGuard(PathBuf);

impl CwdGuard {
	pub fn new() -> Self {
		Self(env::current_dir().unwrap())
	}
}

impl Drop for CwdGuard {
	fn drop(&mut self) {
		env::set_current_dir(&self.0).ok();
	}
}

/// Puts an environment variable back the way it was when dropped
pub struct EnvGuard {
	name: String,
	prev: Option<OsString>,
}

impl EnvGuard {
	pub fn new(name: &str) -> Self {
		Self { name: name.to_string(), prev: env::var_os(name) }
	}
}

impl Drop for EnvGuard {
	fn drop(&mut self) {
		match self.prev.take() {
			Some(val) => unsafe { env::set_var(&self.name, val) },
			None => unsafe { env::remove_var(&self.name) },
		}
	}
}

pub fn read(path: &Path) -> String {
	fs::read_to_string(path).unwrap()
}

/// The canonical form of a fresh temp dir, so it compares equal to `current_dir()`
pub fn canon_tempdir() -> (tempfile::TempDir, PathBuf) {
	let dir = tempfile::tempdir().unwrap();
	let path = fs::canonicalize(dir.path()).unwrap();
	(dir, path)
}

/// Run `check` in a forked child and return its exit status. A panic in the
/// child comes back as status 101.
///
/// Tests that rebind fd 1 inside the test process go through here, since the
/// harness keeps printing results to that descriptor from another thread.
pub fn in_child(check: impl FnOnce() -> i32) -> i32 {
	let child = run_fork(Some("test"), || catch_unwind(AssertUnwindSafe(check)).unwrap_or(101)).unwrap();
	child.wait().unwrap()
}

/// Where fd 1 currently points
pub fn stdout_target() -> PathBuf {
	fs::read_link("/proc/self/fd/1").unwrap()
}
