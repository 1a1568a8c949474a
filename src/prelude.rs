// Standard Library Common IO and FS Abstractions
pub use std::collections::{BTreeMap, VecDeque};
pub use std::env;
pub use std::ffi::{CString, OsString};
pub use std::fmt;
pub use std::fs::File;
pub use std::io::{self, Seek, SeekFrom, Write};
pub use std::path::{Path, PathBuf};
pub use std::process::exit;

// Unix-specific IO abstractions
pub use std::os::unix::ffi::OsStrExt;
pub use std::os::unix::io::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};

// Nix crate for POSIX APIs
pub use bitflags::bitflags;
pub use nix::{
	errno::Errno,
	fcntl::{open, OFlag},
	libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO},
	sys::{
		signal::Signal,
		stat::Mode,
		wait::{waitpid, WaitStatus as WtStat},
	},
	unistd::{close, dup, dup2, execvpe, fork, mkstemp, pipe, unlink, write, ForkResult, Pid},
};

pub use crate::flog;
pub use crate::libsh::flog::ShevalLogLevel::*;
