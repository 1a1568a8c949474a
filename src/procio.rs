use scopeguard::guard;

use crate::{
	libsh::{
		error::{ShErr, ShResult, ShResultExt},
		guards::RedirGuard,
	},
	parse::{InRedir, OutRedir, Redirs, WriteMode},
	prelude::*,
};

pub fn borrow_fd<'f>(fd: RawFd) -> BorrowedFd<'f> {
	unsafe { BorrowedFd::borrow_raw(fd) }
}

/// Saved copies of stdin and stdout
#[derive(Debug)]
pub struct IoGroup(OwnedFd, OwnedFd);

/// A node's redirections, plus the original descriptors once they are saved
#[derive(Default, Debug)]
pub struct IoFrame {
	redirs: Redirs,
	saved_io: Option<IoGroup>,
}

impl IoFrame {
	pub fn new(redirs: Redirs) -> Self {
		Self { redirs, saved_io: None }
	}
	pub fn save(&mut self) -> ShResult<()> {
		let saved_in = unsafe { OwnedFd::from_raw_fd(dup(STDIN_FILENO)?) };
		let saved_out = unsafe { OwnedFd::from_raw_fd(dup(STDOUT_FILENO)?) };
		self.saved_io = Some(IoGroup(saved_in, saved_out));
		Ok(())
	}
	/// Rebind stdin and stdout for the current process.
	///
	/// Input is bound before output, so a failing input leaves stdout alone.
	pub fn redirect(&mut self) -> ShResult<()> {
		if let Some(input) = &self.redirs.input {
			match input {
				InRedir::File(path) => redirect_from_file(path)?,
				InRedir::HereDoc(text) => redirect_from_heredoc(text)?,
			}
		}
		if let Some(output) = &self.redirs.output {
			redirect_to_file(output)?;
		}
		Ok(())
	}
	/// Save the current descriptors, then redirect.
	///
	/// The returned guard restores the saved descriptors when dropped. This
	/// is how builtins run with redirections inside the shell process.
	pub fn redirect_guarded(mut self) -> ShResult<RedirGuard> {
		if !self.redirs.is_empty() {
			self.save()?;
		}
		let mut guard = RedirGuard::new(self);
		guard.0.redirect()?;
		Ok(guard)
	}
	pub fn restore(&mut self) -> ShResult<()> {
		if let Some(saved) = self.saved_io.take() {
			dup2(saved.0.as_raw_fd(), STDIN_FILENO)?;
			dup2(saved.1.as_raw_fd(), STDOUT_FILENO)?;
		}
		Ok(())
	}
}

/// Point `tgt_fd` at `src_fd`, then close `src_fd`
fn bind_fd(src_fd: RawFd, tgt_fd: RawFd) -> ShResult<()> {
	let result = dup2(src_fd, tgt_fd);
	close(src_fd).ok();
	result?;
	Ok(())
}

fn redirect_from_file(path: &Path) -> ShResult<()> {
	let fd = open(path, OFlag::O_RDONLY | OFlag::O_CLOEXEC, Mode::empty())
		.map_err(ShErr::from)
		.with_note(format!("{}: cannot open for reading", path.display()))?;
	bind_fd(fd, STDIN_FILENO)
}

fn redirect_to_file(output: &OutRedir) -> ShResult<()> {
	let mode_flag = match output.mode {
		WriteMode::Truncate => OFlag::O_TRUNC,
		WriteMode::Append => OFlag::O_APPEND,
	};
	let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_CLOEXEC | mode_flag;
	let mode = Mode::from_bits_truncate(0o644);
	let fd = open(&output.path, flags, mode)
		.map_err(ShErr::from)
		.with_note(format!("{}: cannot open for writing", output.path.display()))?;
	bind_fd(fd, STDOUT_FILENO)
}

/// Feed `text` to stdin through an anonymous temp file.
///
/// The file is unlinked as soon as it is bound (or on any failure); the open
/// descriptor keeps the contents readable.
fn redirect_from_heredoc(text: &str) -> ShResult<()> {
	let template = env::temp_dir().join("sheval-heredoc-XXXXXX");
	let (fd, path) = mkstemp(&template)
		.map_err(ShErr::from)
		.with_note("cannot create here-document buffer")?;
	let buf_path = guard(path, |path| {
		unlink(&path).ok();
	});
	flog!(TRACE, "here-document buffer at {}", buf_path.display());

	let mut file = unsafe { File::from_raw_fd(fd) };
	file.write_all(text.as_bytes())
		.map_err(ShErr::from)
		.with_note("cannot write here-document buffer")?;
	file.seek(SeekFrom::Start(0))
		.map_err(ShErr::from)
		.with_note("cannot rewind here-document buffer")?;
	dup2(file.as_raw_fd(), STDIN_FILENO)?;
	Ok(())
}
