use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet};

use crate::{libsh::error::ShResult, prelude::*};

/// Signals the Rust runtime sets to ignored before `main`.
///
/// An ignored disposition survives `execvpe`, so these have to be put back
/// before a child replaces itself with another program.
const RUNTIME_IGNORED: [Signal; 1] = [Signal::SIGPIPE];

/// Give the current process default dispositions for every signal the
/// runtime ignores. Only called in a forked child, right before exec.
pub fn restore_default_signals() -> ShResult<()> {
	let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
	for sig in RUNTIME_IGNORED {
		unsafe { sigaction(sig, &default)? };
	}
	Ok(())
}
