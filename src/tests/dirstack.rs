use std::fs;

use pretty_assertions::assert_eq;

use crate::builtin::{cd::cd, dirstack::pushd};
use crate::libsh::error::ShErrKind;
use crate::parse::{Node, WriteMode};
use crate::prelude::*;
use crate::state::{DirStack, ShState};
use crate::process;

use super::{canon_tempdir, in_child, process_lock, read, CwdGuard, EnvGuard};

fn pushd_node(dir: &Path) -> Node {
	Node::simple(["pushd", dir.to_str().unwrap()])
}

fn popd_node() -> Node {
	Node::simple(["popd"])
}

fn mkdirs(base: &Path, names: &[&str]) -> Vec<PathBuf> {
	names
		.iter()
		.map(|name| {
			let dir = base.join(name);
			fs::create_dir(&dir).unwrap();
			dir
		})
		.collect()
}

fn cwd() -> PathBuf {
	env::current_dir().unwrap()
}

// ============================================================================
// pushd / popd
// ============================================================================

#[test]
fn pushd_then_popd_round_trip() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let _cwd = CwdGuard::new();
	let dirs = mkdirs(&base, &["a"]);
	env::set_current_dir(&base).unwrap();

	let mut state = ShState::new();
	assert_eq!(process(&pushd_node(&dirs[0]), &mut state), 0);
	assert_eq!(cwd(), dirs[0]);
	assert_eq!(state.dirs().len(), 1);
	assert_eq!(state.dirs().top(), Some(&base));

	assert_eq!(process(&popd_node(), &mut state), 0);
	assert_eq!(cwd(), base);
	assert!(state.dirs().is_empty());
}

#[test]
fn nested_pushd_unwinds_in_order() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let _cwd = CwdGuard::new();
	let dirs = mkdirs(&base, &["d0", "d1", "d2", "d3"]);
	env::set_current_dir(&base).unwrap();

	let mut state = ShState::new();
	for (depth, dir) in dirs.iter().enumerate() {
		assert_eq!(process(&pushd_node(dir), &mut state), 0);
		assert_eq!(state.dirs().len(), depth + 1);
	}

	let mut expected = vec![base.clone()];
	expected.extend(dirs[..3].iter().cloned());
	for dir in expected.iter().rev() {
		assert_eq!(process(&popd_node(), &mut state), 0);
		assert_eq!(&cwd(), dir);
	}
	assert!(state.dirs().is_empty());
	assert_eq!(cwd(), base);
}

#[test]
fn popd_on_empty_stack() {
	let _lock = process_lock();
	let _status = EnvGuard::new("?");
	let before = cwd();

	let mut state = ShState::new();
	assert_eq!(process(&popd_node(), &mut state), 1);
	assert_eq!(env::var("?").unwrap(), "1");
	assert!(state.dirs().is_empty());
	assert_eq!(cwd(), before);
}

#[test]
fn popd_rejects_arguments() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let _cwd = CwdGuard::new();
	let dirs = mkdirs(&base, &["a"]);
	env::set_current_dir(&base).unwrap();

	let mut state = ShState::new();
	assert_eq!(process(&pushd_node(&dirs[0]), &mut state), 0);
	assert_eq!(process(&Node::simple(["popd", "extra"]), &mut state), 1);
	assert_eq!(state.dirs().len(), 1);
	assert_eq!(cwd(), dirs[0]);
}

#[test]
fn pushd_usage_errors() {
	let _lock = process_lock();
	let before = cwd();
	let mut state = ShState::new();

	assert_eq!(process(&Node::simple(["pushd"]), &mut state), 1);
	assert_eq!(process(&Node::simple(["pushd", "/", "/tmp"]), &mut state), 1);
	assert!(state.dirs().is_empty());
	assert_eq!(cwd(), before);

	let mut dirs = DirStack::new();
	let err = pushd(&[], &mut dirs).unwrap_err();
	assert_eq!(err.kind(), &ShErrKind::UsageErr);
}

#[test]
fn pushd_to_missing_dir() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let before = cwd();

	let mut state = ShState::new();
	assert_eq!(process(&pushd_node(&base.join("nowhere")), &mut state), 2);
	assert!(state.dirs().is_empty());
	assert_eq!(cwd(), before);
}

#[test]
fn popd_to_removed_dir_keeps_stack() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let _cwd = CwdGuard::new();
	let dirs = mkdirs(&base, &["a", "b"]);
	env::set_current_dir(&dirs[0]).unwrap();

	let mut state = ShState::new();
	assert_eq!(process(&pushd_node(&dirs[1]), &mut state), 0);
	fs::remove_dir(&dirs[0]).unwrap();

	assert_eq!(process(&popd_node(), &mut state), 2);
	assert_eq!(state.dirs().len(), 1);
	assert_eq!(state.dirs().top(), Some(&dirs[0]));
	assert_eq!(cwd(), dirs[1]);
}

#[test]
fn pushd_and_popd_print_the_stack() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let dirs = mkdirs(&base, &["a", "b"]);
	let pushed = base.join("pushed.txt");
	let popped = base.join("popped.txt");

	// Builtin output is redirected in-process, so keep it away from the harness
	let status = in_child(|| {
		env::set_current_dir(&base).unwrap();
		let mut state = ShState::new();
		let first = pushd_node(&dirs[0]).with_output(&pushed, WriteMode::Truncate);
		let second = pushd_node(&dirs[1]).with_output(&pushed, WriteMode::Append);
		let third = popd_node().with_output(&popped, WriteMode::Truncate);
		process(&first, &mut state) + process(&second, &mut state) + process(&third, &mut state)
	});
	assert_eq!(status, 0);

	let a = dirs[0].display();
	let b = dirs[1].display();
	let base = base.display();
	assert_eq!(read(&pushed), format!("{a} {base}\n{b} {a} {base}\n"));
	assert_eq!(read(&popped), format!("{a} {base}\n"));
}

#[test]
fn pushd_in_subshell_leaves_parent_alone() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let dirs = mkdirs(&base, &["a"]);
	let before = cwd();

	let mut state = ShState::new();
	let node = Node::subshell(pushd_node(&dirs[0])).with_output(base.join("sink"), WriteMode::Truncate);
	assert_eq!(process(&node, &mut state), 0);
	assert!(state.dirs().is_empty());
	assert_eq!(cwd(), before);
}

// ============================================================================
// cd
// ============================================================================

#[test]
fn cd_changes_dir_and_pwd() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let _cwd = CwdGuard::new();
	let _pwd = EnvGuard::new("PWD");
	let dirs = mkdirs(&base, &["a"]);

	let mut state = ShState::new();
	let node = Node::simple(["cd", dirs[0].to_str().unwrap()]);
	assert_eq!(process(&node, &mut state), 0);
	assert_eq!(cwd(), dirs[0]);
	assert_eq!(PathBuf::from(env::var("PWD").unwrap()), dirs[0]);
	assert!(state.dirs().is_empty());
}

#[test]
fn cd_without_args_goes_home() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let _cwd = CwdGuard::new();
	let _home = EnvGuard::new("HOME");
	unsafe { env::set_var("HOME", &base) };

	cd(&[]).unwrap();
	assert_eq!(cwd(), base);
}

#[test]
fn cd_without_home() {
	let _lock = process_lock();
	let _home = EnvGuard::new("HOME");
	unsafe { env::remove_var("HOME") };
	let before = cwd();

	let err = cd(&[]).unwrap_err();
	assert_eq!(err.kind(), &ShErrKind::UsageErr);
	assert_eq!(process(&Node::simple(["cd"]), &mut ShState::new()), 1);
	assert_eq!(cwd(), before);
}

#[test]
fn cd_failures() {
	let _lock = process_lock();
	let (_tmp, base) = canon_tempdir();
	let before = cwd();
	let mut state = ShState::new();

	let missing = base.join("missing");
	assert_eq!(process(&Node::simple(["cd", missing.to_str().unwrap()]), &mut state), 2);
	assert_eq!(process(&Node::simple(["cd", "/", "/tmp"]), &mut state), 1);
	assert_eq!(cwd(), before);
}
