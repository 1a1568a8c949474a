use crate::{
	libsh::{
		error::{ShErr, ShErrKind, ShResult},
		sys::write_out,
	},
	prelude::*,
	state::DirStack,
};

use super::change_directory;

fn print_dirs(dirs: &DirStack) -> ShResult<()> {
	let current_dir = env::current_dir()?;
	write_out(format!("{}\n", dirs.render(&current_dir)))
}

/// `pushd dir`
///
/// The directory we leave is only pushed once the change has succeeded, so
/// a failed `pushd` leaves both the stack and the working directory alone.
pub fn pushd(args: &[String], dirs: &mut DirStack) -> ShResult<()> {
	let [dir] = args else {
		return Err(ShErr::simple(ShErrKind::UsageErr, "usage: pushd <dirName>"));
	};

	let old_dir = env::current_dir().map_err(|e| {
		ShErr::simple(ShErrKind::DirErr, format!("pushd: failed to get current directory: {e}"))
	})?;

	change_directory(Path::new(dir), "pushd")?;

	if let Err(e) = dirs.try_push(old_dir.clone()) {
		change_directory(&old_dir, "pushd").ok();
		return Err(ShErr::simple(ShErrKind::AllocErr, format!("pushd: {e}")));
	}

	print_dirs(dirs)
}

/// `popd`
pub fn popd(args: &[String], dirs: &mut DirStack) -> ShResult<()> {
	if !args.is_empty() {
		return Err(ShErr::simple(ShErrKind::UsageErr, "usage: popd"));
	}
	let Some(top) = dirs.top() else {
		return Err(ShErr::simple(ShErrKind::StackEmpty, "popd: directory stack empty"));
	};

	// Stack stays as it is unless the change succeeds
	change_directory(top, "popd")?;
	dirs.pop();

	print_dirs(dirs)
}
