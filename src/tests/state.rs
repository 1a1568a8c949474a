use pretty_assertions::assert_eq;

use crate::libsh::guards::scope_guard;
use crate::parse::Locals;
use crate::prelude::*;
use crate::state::{DirStack, ScopeStack, ShState, STATUS_VAR};

use super::{process_lock, EnvGuard};

fn locals(pairs: &[(&str, &str)]) -> Locals {
	pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

// ============================================================================
// DirStack
// ============================================================================

#[test]
fn dirstack_new_is_empty() {
	let dirs = DirStack::new();
	assert!(dirs.is_empty());
	assert_eq!(dirs.len(), 0);
	assert_eq!(dirs.top(), None);
}

#[test]
fn dirstack_push_pop_order() {
	let mut dirs = DirStack::new();
	dirs.try_push("/first".into()).unwrap();
	dirs.try_push("/second".into()).unwrap();
	assert_eq!(dirs.len(), 2);
	assert_eq!(dirs.top(), Some(&PathBuf::from("/second")));

	let listed = dirs.iter().cloned().collect::<Vec<_>>();
	assert_eq!(listed, vec![PathBuf::from("/second"), PathBuf::from("/first")]);

	assert_eq!(dirs.pop(), Some(PathBuf::from("/second")));
	assert_eq!(dirs.pop(), Some(PathBuf::from("/first")));
	assert_eq!(dirs.pop(), None);
	assert!(dirs.is_empty());
}

#[test]
fn dirstack_render() {
	let mut dirs = DirStack::new();
	assert_eq!(dirs.render(Path::new("/home/user")), "/home/user");

	dirs.try_push("/usr".into()).unwrap();
	dirs.try_push("/tmp".into()).unwrap();
	insta::assert_snapshot!(dirs.render(Path::new("/home/user")), @"/home/user /tmp /usr");
}

// ============================================================================
// ScopeStack
// ============================================================================

#[test]
fn scopestack_restores_previous_values() {
	let _lock = process_lock();
	let _outer = EnvGuard::new("SHEVAL_TEST_SHADOWED");
	let _fresh = EnvGuard::new("SHEVAL_TEST_FRESH");
	unsafe {
		env::set_var("SHEVAL_TEST_SHADOWED", "outer");
		env::remove_var("SHEVAL_TEST_FRESH");
	}

	let mut scopes = ScopeStack::new();
	scopes.descend(&locals(&[("SHEVAL_TEST_SHADOWED", "inner"), ("SHEVAL_TEST_FRESH", "x")]));
	assert_eq!(scopes.depth(), 1);
	assert_eq!(env::var("SHEVAL_TEST_SHADOWED").unwrap(), "inner");
	assert_eq!(env::var("SHEVAL_TEST_FRESH").unwrap(), "x");

	scopes.descend(&locals(&[("SHEVAL_TEST_SHADOWED", "innermost")]));
	assert_eq!(scopes.depth(), 2);
	assert_eq!(env::var("SHEVAL_TEST_SHADOWED").unwrap(), "innermost");

	scopes.ascend();
	assert_eq!(env::var("SHEVAL_TEST_SHADOWED").unwrap(), "inner");
	assert_eq!(env::var("SHEVAL_TEST_FRESH").unwrap(), "x");

	scopes.ascend();
	assert_eq!(scopes.depth(), 0);
	assert_eq!(env::var("SHEVAL_TEST_SHADOWED").unwrap(), "outer");
	assert!(env::var_os("SHEVAL_TEST_FRESH").is_none());
}

#[test]
fn scopestack_ascend_past_bottom_is_harmless() {
	let mut scopes = ScopeStack::new();
	scopes.ascend();
	assert_eq!(scopes.depth(), 0);
}

#[test]
fn scope_guard_pops_on_drop() {
	let _lock = process_lock();
	let _var = EnvGuard::new("SHEVAL_TEST_GUARDED");
	unsafe { env::remove_var("SHEVAL_TEST_GUARDED") };

	let mut state = ShState::new();
	{
		let scoped = scope_guard(&mut state, &locals(&[("SHEVAL_TEST_GUARDED", "yes")]));
		assert_eq!(scoped.scopes().depth(), 1);
		assert_eq!(env::var("SHEVAL_TEST_GUARDED").unwrap(), "yes");
	}
	assert_eq!(state.scopes().depth(), 0);
	assert!(env::var_os("SHEVAL_TEST_GUARDED").is_none());
}

// ============================================================================
// Status
// ============================================================================

#[test]
fn set_status_publishes_variable() {
	let _lock = process_lock();
	let _var = EnvGuard::new(STATUS_VAR);

	let mut state = ShState::new();
	assert_eq!(state.get_status(), 0);
	state.set_status(127);
	assert_eq!(state.get_status(), 127);
	assert_eq!(env::var(STATUS_VAR).unwrap(), "127");
}
