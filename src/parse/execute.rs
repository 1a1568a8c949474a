use crate::{
	builtin::{exec_builtin, is_builtin},
	jobs::ChildProc,
	libsh::{
		error::{ShErr, ShErrKind, ShResult, ShResultExt},
		guards::scope_guard,
		sys::{exec_failure_status, EX_SUCCESS},
	},
	prelude::*,
	procio::IoFrame,
	signal::restore_default_signals,
	state::ShState,
};

use super::{NdRule, Node, Redirs};

bitflags! {
	#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
	pub struct ExecFlags: u8 {
		/// The node being dispatched is the last thing a forked child will do,
		/// so an external command may replace the child instead of forking again
		const NO_FORK = 0b0000_0001;
	}
}

/// Evaluate a command tree and return its exit status.
///
/// Every node evaluated along the way publishes its status as `$?`.
pub fn process(node: &Node, state: &mut ShState) -> i32 {
	Dispatcher::new().dispatch_node(node, state)
}

/// Arguments to the execvpe function
pub struct ExecArgs {
	pub cmd: CString,
	pub argv: Vec<CString>,
	pub envp: Vec<CString>,
}

impl ExecArgs {
	pub fn new(argv: &[String]) -> ShResult<Self> {
		let argv = argv
			.iter()
			.map(|arg| CString::new(arg.as_str()))
			.collect::<Result<Vec<_>, _>>()?;
		let Some(cmd) = argv.first().cloned() else {
			return Err(ShErr::simple(ShErrKind::InternalErr, "empty command"));
		};
		let envp = Self::get_envp()?;
		Ok(Self { cmd, argv, envp })
	}
	pub fn get_envp() -> ShResult<Vec<CString>> {
		let mut envp = vec![];
		for (key, val) in env::vars_os() {
			let mut var = key.as_bytes().to_vec();
			var.push(b'=');
			var.extend_from_slice(val.as_bytes());
			envp.push(CString::new(var)?);
		}
		Ok(envp)
	}
	pub fn cmd_name(&self) -> String {
		self.cmd.to_string_lossy().to_string()
	}
}

#[derive(Debug, Default)]
pub struct Dispatcher {
	flags: ExecFlags,
}

impl Dispatcher {
	pub fn new() -> Self {
		Default::default()
	}
	/// A dispatcher for the final piece of work in a forked child
	fn for_tail() -> Self {
		Self { flags: ExecFlags::NO_FORK }
	}
	pub fn dispatch_node(&mut self, node: &Node, state: &mut ShState) -> i32 {
		flog!(TRACE, "dispatching {}: {}", node.kind(), node);
		// Only the node handed to us directly may exec in place, never its children
		let no_fork = self.flags.contains(ExecFlags::NO_FORK);
		self.flags.remove(ExecFlags::NO_FORK);

		let mut scoped = scope_guard(&mut *state, &node.locals);
		let result = self.dispatch_rule(node, no_fork, &mut scoped);
		drop(scoped);

		let status = result.into_status();
		flog!(DEBUG, "{} finished with status {}", node.kind(), status);
		state.set_status(status);
		status
	}
	fn dispatch_rule(&mut self, node: &Node, no_fork: bool, state: &mut ShState) -> ShResult<i32> {
		match &node.class {
			NdRule::Command { argv } => self.exec_cmd(argv, &node.redirs, no_fork, state),
			NdRule::Pipeline { left, right } => self.exec_pipeline(left, right, state),
			NdRule::And { left, right } => Ok(self.exec_and(left, right, state)),
			NdRule::Or { left, right } => Ok(self.exec_or(left, right, state)),
			NdRule::List { left, right } => Ok(self.exec_list(left.as_deref(), right.as_deref(), state)),
			NdRule::Subshell { body } => self.exec_subsh(body, &node.redirs, state),
			NdRule::BraceGrp { left, right } => self.exec_brc_grp(left, right.as_deref(), &node.redirs, state),
		}
	}
	fn exec_and(&mut self, left: &Node, right: &Node, state: &mut ShState) -> i32 {
		let status = self.dispatch_node(left, state);
		if status != 0 {
			return status
		}
		self.dispatch_node(right, state)
	}
	fn exec_or(&mut self, left: &Node, right: &Node, state: &mut ShState) -> i32 {
		let status = self.dispatch_node(left, state);
		if status == 0 {
			return status
		}
		self.dispatch_node(right, state)
	}
	fn exec_list(&mut self, left: Option<&Node>, right: Option<&Node>, state: &mut ShState) -> i32 {
		let mut status = EX_SUCCESS;
		for node in [left, right].into_iter().flatten() {
			status = self.dispatch_node(node, state);
		}
		status
	}
	fn exec_cmd(&mut self, argv: &[String], redirs: &Redirs, no_fork: bool, state: &mut ShState) -> ShResult<i32> {
		let Some(cmd) = argv.first() else {
			return Err(ShErr::simple(ShErrKind::InternalErr, "simple command with no arguments"));
		};

		if is_builtin(cmd) {
			let _redir_guard = IoFrame::new(redirs.clone()).redirect_guarded()?;
			exec_builtin(argv, state)?;
			return Ok(EX_SUCCESS);
		}

		let exec_args = ExecArgs::new(argv)?;
		if no_fork {
			flog!(DEBUG, "exec in place: {}", exec_args.cmd_name());
			exit(exec_external(redirs, &exec_args));
		}

		let name = exec_args.cmd_name();
		let child = run_fork(Some(name.as_str()), || exec_external(redirs, &exec_args))?;
		child.wait()
	}
	fn exec_pipeline(&mut self, left: &Node, right: &Node, state: &mut ShState) -> ShResult<i32> {
		let (rpipe, wpipe) = pipe()?;

		let left_child = match unsafe { fork()? } {
			ForkResult::Child => {
				drop(rpipe);
				let code = match dup2(wpipe.as_raw_fd(), STDOUT_FILENO) {
					Ok(_) => {
						drop(wpipe);
						Dispatcher::for_tail().dispatch_node(left, state)
					}
					Err(e) => ShErr::from(e).report(),
				};
				exit(code)
			}
			ForkResult::Parent { child } => ChildProc::new(child, Some("pipeline (left)")),
		};

		let right_child = match unsafe { fork() } {
			Ok(ForkResult::Child) => {
				drop(wpipe);
				let code = match dup2(rpipe.as_raw_fd(), STDIN_FILENO) {
					Ok(_) => {
						drop(rpipe);
						Dispatcher::for_tail().dispatch_node(right, state)
					}
					Err(e) => ShErr::from(e).report(),
				};
				exit(code)
			}
			Ok(ForkResult::Parent { child }) => ChildProc::new(child, Some("pipeline (right)")),
			Err(e) => {
				// The left side would never see EOF while we hold the write end
				drop(rpipe);
				drop(wpipe);
				left_child.wait().ok();
				return Err(e.into());
			}
		};

		drop(rpipe);
		drop(wpipe);

		let left_status = left_child.wait()?;
		state.set_status(left_status);
		let right_status = right_child.wait()?;
		state.set_status(right_status);

		if right_status != 0 {
			Ok(right_status)
		} else {
			Ok(left_status)
		}
	}
	fn exec_subsh(&mut self, body: &Node, redirs: &Redirs, state: &mut ShState) -> ShResult<i32> {
		let child = run_fork(Some("subshell"), || {
			if let Err(e) = IoFrame::new(redirs.clone()).redirect() {
				return e.report();
			}
			Dispatcher::for_tail().dispatch_node(body, state)
		})?;
		child.wait()
	}
	fn exec_brc_grp(
		&mut self,
		left: &Node,
		right: Option<&Node>,
		redirs: &Redirs,
		state: &mut ShState,
	) -> ShResult<i32> {
		let child = run_fork(Some("group"), || {
			if let Err(e) = IoFrame::new(redirs.clone()).redirect() {
				return e.report();
			}
			let Some(right) = right else {
				return Dispatcher::for_tail().dispatch_node(left, state);
			};
			let status = Dispatcher::new().dispatch_node(left, state);
			if status != 0 {
				return status;
			}
			Dispatcher::for_tail().dispatch_node(right, state)
		})?;
		child.wait()
	}
}

/// Fork, run `child_action` in the child and exit with what it returns.
///
/// The parent gets the child back unwaited.
pub fn run_fork<C>(cmd: Option<&str>, child_action: C) -> ShResult<ChildProc>
where
	C: FnOnce() -> i32,
{
	match unsafe { fork()? } {
		ForkResult::Child => {
			let code = child_action();
			exit(code)
		}
		ForkResult::Parent { child } => {
			flog!(DEBUG, "forked {} for {}", child, cmd.unwrap_or("anonymous"));
			Ok(ChildProc::new(child, cmd))
		}
	}
}

/// Child side of an external command: redirect, then replace the process image.
///
/// Only returns if something failed, with the status the child should exit with.
pub fn exec_external(redirs: &Redirs, exec_args: &ExecArgs) -> i32 {
	if let Err(e) = restore_default_signals() {
		return e.report();
	}
	if let Err(e) = IoFrame::new(redirs.clone()).redirect() {
		return e.report();
	}

	let Err(e) = execvpe(&exec_args.cmd, &exec_args.argv, &exec_args.envp);

	let cmd = exec_args.cmd_name();
	let err = match e {
		Errno::ENOENT => ShErr::simple(ShErrKind::CmdNotFound, cmd),
		Errno::EACCES => ShErr::simple(ShErrKind::BadPermission, cmd),
		_ => ShErr::simple(ShErrKind::Errno(e), cmd),
	};
	err.print_error();
	exec_failure_status(e)
}
