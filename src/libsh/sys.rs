use std::fmt::Display;

use crate::{libsh::error::ShResult, prelude::*, procio::borrow_fd};

pub const EX_SUCCESS: i32 = 0;
pub const EX_FAILURE: i32 = 1;
/// Wrong argument count or missing argument to a builtin
pub const EX_USAGE: i32 = 1;
/// `cd`, `pushd` and `popd` could not change directory
pub const EX_DIRERR: i32 = 2;
pub const EX_NOEXEC: i32 = 126;
pub const EX_NOTFOUND: i32 = 127;
pub const SIG_EXIT_OFFSET: i32 = 128;

/// Map an OS error number onto a shell exit status
pub fn status_from_errno(errno: Errno) -> i32 {
	match errno {
		Errno::ENOENT => EX_NOTFOUND,
		Errno::EACCES | Errno::EPERM => EX_NOEXEC,
		Errno::EINVAL => EX_DIRERR,
		_ => EX_FAILURE,
	}
}

/// Same mapping for I/O errors that carry no OS error number
pub fn status_from_io_kind(kind: io::ErrorKind) -> i32 {
	match kind {
		io::ErrorKind::NotFound => EX_NOTFOUND,
		io::ErrorKind::PermissionDenied => EX_NOEXEC,
		_ => EX_FAILURE,
	}
}

/// The status reported when `execvpe` fails in a child.
///
/// Anything other than a permission problem counts as "not found".
pub fn exec_failure_status(errno: Errno) -> i32 {
	match errno {
		Errno::EACCES | Errno::EPERM => EX_NOEXEC,
		_ => EX_NOTFOUND,
	}
}

/// Write straight to fd 1, bypassing Rust's buffered stdout.
///
/// Anything left in a userspace buffer would be duplicated by the next fork.
pub fn write_out(text: impl Display) -> ShResult<()> {
	write_all(STDOUT_FILENO, text.to_string().as_bytes())
}

fn write_all(fd: RawFd, mut buf: &[u8]) -> ShResult<()> {
	while !buf.is_empty() {
		match write(borrow_fd(fd), buf) {
			Ok(0) => return Err(Errno::EIO.into()),
			Ok(n) => buf = &buf[n..],
			Err(Errno::EINTR) => continue,
			Err(e) => return Err(e.into()),
		}
	}
	Ok(())
}
