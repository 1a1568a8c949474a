use crate::{
	libsh::error::{ShErr, ShErrKind, ShResult},
	prelude::*,
	state::ShState,
};

pub mod cd;
pub mod dirstack;

pub const BUILTINS: [&str; 3] = ["cd", "pushd", "popd"];

pub fn is_builtin(cmd: &str) -> bool {
	BUILTINS.contains(&cmd)
}

/// Run a builtin in the current process. `argv[0]` is the builtin's name.
pub fn exec_builtin(argv: &[String], state: &mut ShState) -> ShResult<()> {
	let Some((cmd, args)) = argv.split_first() else {
		return Err(ShErr::simple(ShErrKind::InternalErr, "empty builtin invocation"));
	};
	flog!(TRACE, "running builtin {}", cmd);
	match cmd.as_str() {
		"cd" => cd::cd(args),
		"pushd" => dirstack::pushd(args, state.dirs_mut()),
		"popd" => dirstack::popd(args, state.dirs_mut()),
		_ => Err(ShErr::simple(ShErrKind::InternalErr, format!("'{cmd}' is not a builtin"))),
	}
}

/// Change the working directory and keep `$PWD` in step with it
pub(crate) fn change_directory(target: &Path, cmd: &str) -> ShResult<()> {
	if let Err(e) = env::set_current_dir(target) {
		return Err(ShErr::simple(
			ShErrKind::DirErr,
			format!("{cmd}: {}: {e}", target.display()),
		));
	}
	let new_dir = env::current_dir().map_err(|e| {
		ShErr::simple(ShErrKind::DirErr, format!("{cmd}: failed to get current directory: {e}"))
	})?;
	unsafe { env::set_var("PWD", new_dir) };
	Ok(())
}
