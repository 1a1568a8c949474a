use std::collections::TryReserveError;

use crate::{parse::Locals, prelude::*};

/// The shell variable that holds the last exit status
pub const STATUS_VAR: &str = "?";

/// Everything the evaluator mutates, owned by whoever drives the evaluation.
///
/// A forked child works on its own copy, so nothing here needs a lock.
#[derive(Debug, Default)]
pub struct ShState {
	dirs: DirStack,
	scopes: ScopeStack,
	status: i32,
}

impl ShState {
	pub fn new() -> Self {
		Default::default()
	}
	pub fn dirs(&self) -> &DirStack {
		&self.dirs
	}
	pub fn dirs_mut(&mut self) -> &mut DirStack {
		&mut self.dirs
	}
	pub fn scopes(&self) -> &ScopeStack {
		&self.scopes
	}
	pub fn scopes_mut(&mut self) -> &mut ScopeStack {
		&mut self.scopes
	}
	pub fn get_status(&self) -> i32 {
		self.status
	}
	/// Record a status and publish it as `$?`
	pub fn set_status(&mut self, code: i32) {
		self.status = code;
		unsafe { env::set_var(STATUS_VAR, code.to_string()) };
	}
}

/// The `pushd`/`popd` directory stack. The top of the stack is the front.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirStack {
	dirs: VecDeque<PathBuf>,
}

impl DirStack {
	pub fn new() -> Self {
		Default::default()
	}
	/// Push a directory, reporting allocation failure instead of aborting
	pub fn try_push(&mut self, dir: PathBuf) -> Result<(), TryReserveError> {
		self.dirs.try_reserve(1)?;
		self.dirs.push_front(dir);
		Ok(())
	}
	pub fn top(&self) -> Option<&PathBuf> {
		self.dirs.front()
	}
	pub fn pop(&mut self) -> Option<PathBuf> {
		self.dirs.pop_front()
	}
	pub fn len(&self) -> usize {
		self.dirs.len()
	}
	pub fn is_empty(&self) -> bool {
		self.dirs.is_empty()
	}
	pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
		self.dirs.iter()
	}
	/// `cwd` followed by every entry, space separated
	pub fn render(&self, cwd: &Path) -> String {
		[cwd].into_iter()
			.chain(self.dirs.iter().map(|d| d.as_path()))
			.map(|d| d.to_string_lossy().to_string())
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// One node's worth of local bindings, with whatever they replaced
#[derive(Debug)]
struct ScopeFrame {
	saved: Vec<(String, Option<OsString>)>,
}

/// Local variables live in the process environment while their node runs.
///
/// Each `descend` installs a node's locals and remembers the previous
/// values; the matching `ascend` puts those values back.
#[derive(Debug, Default)]
pub struct ScopeStack {
	frames: Vec<ScopeFrame>,
}

impl ScopeStack {
	pub fn new() -> Self {
		Default::default()
	}
	pub fn depth(&self) -> usize {
		self.frames.len()
	}
	pub fn descend(&mut self, locals: &Locals) {
		let mut saved = Vec::with_capacity(locals.len());
		for (name, val) in locals {
			saved.push((name.clone(), env::var_os(name)));
			unsafe { env::set_var(name, val) };
		}
		self.frames.push(ScopeFrame { saved });
	}
	pub fn ascend(&mut self) {
		let Some(frame) = self.frames.pop() else {
			return
		};
		for (name, prev) in frame.saved.into_iter().rev() {
			match prev {
				Some(val) => unsafe { env::set_var(&name, val) },
				None => unsafe { env::remove_var(&name) },
			}
		}
	}
}
