use scopeguard::{guard, ScopeGuard};

use crate::parse::Locals;
use crate::procio::IoFrame;
use crate::state::ShState;

// ============================================================================
// Local variable scopes
// ============================================================================

/// Install `locals` for as long as the returned guard lives.
///
/// The guard derefs to the state, so evaluation carries on through it and
/// the frame is popped on every way out, unwinding included.
pub fn scope_guard<'s>(
	state: &'s mut ShState,
	locals: &Locals,
) -> ScopeGuard<&'s mut ShState, impl FnOnce(&'s mut ShState)> {
	state.scopes_mut().descend(locals);
	guard(state, |s| {
		s.scopes_mut().ascend();
	})
}

// ============================================================================
// Redirection restore
// ============================================================================

/// Holds an applied `IoFrame` and puts stdin/stdout back when dropped
#[derive(Debug)]
pub struct RedirGuard(pub(crate) IoFrame);

impl RedirGuard {
	pub(crate) fn new(frame: IoFrame) -> Self {
		Self(frame)
	}
}

impl Drop for RedirGuard {
	fn drop(&mut self) {
		self.0.restore().ok();
	}
}
