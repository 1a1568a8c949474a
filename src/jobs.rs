use crate::{
	libsh::{error::ShResult, sys::SIG_EXIT_OFFSET},
	prelude::*,
};

#[derive(Debug)]
pub struct DisplayWaitStatus(pub WtStat);

impl fmt::Display for DisplayWaitStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.0 {
			WtStat::Exited(_, code) => match code {
				0 => write!(f, "done"),
				_ => write!(f, "failed: {}", code),
			},
			WtStat::Signaled(_, signal, _) => {
				write!(f, "signaled: {:?}", signal)
			}
			WtStat::Stopped(_, signal) => {
				write!(f, "stopped: {:?}", signal)
			}
			WtStat::Continued(_) => {
				write!(f, "continued")
			}
			WtStat::StillAlive => {
				write!(f, "running")
			}
			_ => write!(f, "traced"),
		}
	}
}

/// Turn a termination status into a shell exit status.
///
/// Normal exit gives the exit code, death by signal N gives 128+N. Anything
/// that is not a termination gives `None`.
pub fn decode_status(stat: WtStat) -> Option<i32> {
	match stat {
		WtStat::Exited(_, code) => Some(code),
		WtStat::Signaled(_, sig, _) => Some(SIG_EXIT_OFFSET + sig as i32),
		_ => None,
	}
}

/// A forked child the evaluator is responsible for reaping
#[derive(Debug, Clone)]
pub struct ChildProc {
	pid: Pid,
	command: Option<String>,
}

impl ChildProc {
	pub fn new(pid: Pid, command: Option<&str>) -> Self {
		let command = command.map(|str| str.to_string());
		Self { pid, command }
	}
	pub fn cmd(&self) -> Option<&str> {
		self.command.as_deref()
	}
	/// Block until the child terminates, then return its decoded status
	pub fn wait(&self) -> ShResult<i32> {
		loop {
			match waitpid(self.pid, None) {
				Ok(stat) => {
					if let Some(code) = decode_status(stat) {
						flog!(
							DEBUG,
							"child {} ({}) {}",
							self.pid,
							self.cmd().unwrap_or("anonymous"),
							DisplayWaitStatus(stat)
						);
						return Ok(code);
					}
				}
				Err(Errno::EINTR) => continue,
				Err(e) => return Err(e.into()),
			}
		}
	}
}
