use std::ffi::NulError;
use std::fmt::Display;

use crate::{
	libsh::{
		sys::{status_from_errno, status_from_io_kind, EX_DIRERR, EX_FAILURE, EX_NOEXEC, EX_NOTFOUND, EX_USAGE},
		term::{Style, Styled},
	},
	prelude::*,
};

pub type ShResult<T> = Result<T, ShErr>;

pub trait ShResultExt<T> {
	/// Resolve the result into an exit status, printing the diagnostic on failure
	fn into_status(self) -> i32
	where
		T: Into<i32>;
	fn with_note(self, note: impl Into<String>) -> Self;
}

impl<T> ShResultExt<T> for ShResult<T> {
	fn into_status(self) -> i32
	where
		T: Into<i32>,
	{
		match self {
			Ok(code) => code.into(),
			Err(e) => e.report(),
		}
	}
	fn with_note(self, note: impl Into<String>) -> Self {
		self.map_err(|e| e.with_note(note))
	}
}

#[derive(Debug)]
pub struct ShErr {
	kind: ShErrKind,
	notes: Vec<String>,
}

impl ShErr {
	pub fn new(kind: ShErrKind) -> Self {
		Self { kind, notes: vec![] }
	}
	pub fn simple(kind: ShErrKind, msg: impl Into<String>) -> Self {
		Self { kind, notes: vec![msg.into()] }
	}
	pub fn with_note(self, note: impl Into<String>) -> Self {
		let ShErr { kind, mut notes } = self;
		notes.insert(0, note.into());
		Self { kind, notes }
	}
	pub fn kind(&self) -> &ShErrKind {
		&self.kind
	}
	pub fn notes(&self) -> &[String] {
		&self.notes
	}
	/// The exit status a shell reports for this error.
	///
	/// This is the only place an error turns into a status code; OS error
	/// numbers never travel upward as statuses on their own.
	pub fn status(&self) -> i32 {
		match &self.kind {
			ShErrKind::UsageErr => EX_USAGE,
			ShErrKind::DirErr => EX_DIRERR,
			ShErrKind::StackEmpty => EX_USAGE,
			ShErrKind::AllocErr => EX_USAGE,
			ShErrKind::InternalErr => EX_FAILURE,
			ShErrKind::CmdNotFound => EX_NOTFOUND,
			ShErrKind::BadPermission => EX_NOEXEC,
			ShErrKind::Errno(e) => status_from_errno(*e),
			ShErrKind::IoErr(kind) => status_from_io_kind(*kind),
		}
	}
	/// Print the diagnostic and hand back the status it resolves to
	pub fn report(&self) -> i32 {
		self.print_error();
		self.status()
	}
	pub fn print_error(&self) {
		let prefix = "sheval".styled(Style::Red | Style::Bold);
		eprintln!("{prefix}: {self}");
		for note in self.notes.iter().skip(1) {
			let label = "note".styled(Style::Green);
			eprintln!("  {label}: {note}");
		}
	}
}

impl Display for ShErr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.notes.first() {
			None => write!(f, "{}", self.kind),
			Some(note) => write!(f, "{} - {}", self.kind, note),
		}
	}
}

impl From<std::io::Error> for ShErr {
	fn from(e: std::io::Error) -> Self {
		match e.raw_os_error() {
			Some(raw) => ShErr::from(Errno::from_raw(raw)),
			None => ShErr::simple(ShErrKind::IoErr(e.kind()), e.to_string()),
		}
	}
}

impl From<Errno> for ShErr {
	fn from(value: Errno) -> Self {
		ShErr::new(ShErrKind::Errno(value))
	}
}

impl From<NulError> for ShErr {
	fn from(value: NulError) -> Self {
		ShErr::simple(ShErrKind::InternalErr, format!("argument contains a nul byte at {}", value.nul_position()))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShErrKind {
	UsageErr,
	DirErr,
	StackEmpty,
	IoErr(io::ErrorKind),
	Errno(Errno),
	CmdNotFound,
	BadPermission,
	AllocErr,
	InternalErr,
}

impl Display for ShErrKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UsageErr => write!(f, "Usage Error"),
			Self::DirErr => write!(f, "Directory Error"),
			Self::StackEmpty => write!(f, "Directory Stack Empty"),
			Self::IoErr(e) => write!(f, "I/O Error: {e}"),
			Self::Errno(e) => write!(f, "Errno: {}", e.desc()),
			Self::CmdNotFound => write!(f, "Command not found"),
			Self::BadPermission => write!(f, "Bad Permissions"),
			Self::AllocErr => write!(f, "Allocation Failed"),
			Self::InternalErr => write!(f, "Internal Error"),
		}
	}
}
