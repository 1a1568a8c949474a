use crate::{
	libsh::error::{ShErr, ShErrKind, ShResult},
	prelude::*,
};

use super::change_directory;

/// `cd [dir]`. With no argument, goes to `$HOME`.
pub fn cd(args: &[String]) -> ShResult<()> {
	let new_dir = match args {
		[] => match env::var_os("HOME") {
			Some(home) => PathBuf::from(home),
			None => return Err(ShErr::simple(ShErrKind::UsageErr, "cd: HOME not set")),
		},
		[dir] => PathBuf::from(dir),
		_ => return Err(ShErr::simple(ShErrKind::UsageErr, "usage: cd OR cd <dirName>")),
	};

	change_directory(&new_dir, "cd")
}
