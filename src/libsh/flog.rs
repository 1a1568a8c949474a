use std::fmt::Display;

use super::term::{Style, Styled};

pub const LOG_LEVEL_VAR: &str = "SHEVAL_LOG_LEVEL";

#[derive(Clone, Copy, PartialEq, PartialOrd, Ord, Eq, Debug)]
#[repr(u8)]
pub enum ShevalLogLevel {
	NONE = 0,
	ERROR = 1,
	WARN = 2,
	INFO = 3,
	DEBUG = 4,
	TRACE = 5,
}

impl Display for ShevalLogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ShevalLogLevel::*;
		match self {
			ERROR => write!(f, "{}", "ERROR".styled(Style::Red | Style::Bold)),
			WARN => write!(f, "{}", "WARN".styled(Style::Yellow | Style::Bold)),
			INFO => write!(f, "{}", "INFO".styled(Style::Green | Style::Bold)),
			DEBUG => write!(f, "{}", "DEBUG".styled(Style::Magenta | Style::Bold)),
			TRACE => write!(f, "{}", "TRACE".styled(Style::Blue | Style::Bold)),
			NONE => write!(f, ""),
		}
	}
}

impl ShevalLogLevel {
	pub fn from_name(name: &str) -> Option<Self> {
		use ShevalLogLevel::*;
		match name.to_lowercase().as_str() {
			"none" | "off" => Some(NONE),
			"error" => Some(ERROR),
			"warn" => Some(WARN),
			"info" => Some(INFO),
			"debug" => Some(DEBUG),
			"trace" => Some(TRACE),
			_ => None,
		}
	}
}

pub fn log_level() -> ShevalLogLevel {
	std::env::var(LOG_LEVEL_VAR)
		.ok()
		.and_then(|level| ShevalLogLevel::from_name(&level))
		.unwrap_or(ShevalLogLevel::NONE)
}

/// A structured logging macro for the evaluator.
///
/// Log lines go to stderr in the form `[LEVEL][file.rs:10] message`, and are
/// only emitted when `$SHEVAL_LOG_LEVEL` is at or above the given level.
///
/// # Usage
///
/// ## 1. **Formatted Messages**
/// ```rust,ignore
/// flog!(DEBUG, "forked child {}", pid);
/// ```
///
/// ## 2. **Expressions**
/// Logs the evaluated result of each expression alongside its source text.
///
/// ```rust,ignore
/// flog!(TRACE, node.kind());
/// ```
/// **Output:**
/// ```plaintext
/// [TRACE][execute.rs:10] node.kind() = Pipeline
/// ```
///
/// ## 3. **Literals**
/// ```rust,ignore
/// flog!(TRACE, "beginning dispatch");
/// ```
///
/// Literals and formatted messages need [`std::fmt::Display`]; expressions
/// need [`std::fmt::Debug`].
#[macro_export]
macro_rules! flog {
	($level:path, $fmt:literal, $($args:expr),+ $(,)?) => {{
		use $crate::libsh::flog::log_level;
		use $crate::libsh::term::Styled;
		use $crate::libsh::term::Style;

		if $level <= log_level() {
			let file = file!().styled(Style::Cyan);
			let line = line!().to_string().styled(Style::Cyan);

			eprintln!(
				"[{}][{}:{}] {}",
				$level, file, line, format!($fmt, $($args),+)
			);
		}
	}};

	($level:path, $($lit:literal),+ $(,)?) => {{
		use $crate::libsh::flog::log_level;
		use $crate::libsh::term::Styled;
		use $crate::libsh::term::Style;

		if $level <= log_level() {
			let file = file!().styled(Style::Cyan);
			let line = line!().to_string().styled(Style::Cyan);

			$(
				eprintln!(
					"[{}][{}:{}] {}",
					$level, file, line, $lit
				);
			)+
		}
	}};

	($level:path, $($val:expr),+ $(,)?) => {{
		use $crate::libsh::flog::log_level;
		use $crate::libsh::term::Styled;
		use $crate::libsh::term::Style;

		if $level <= log_level() {
			let file = file!().styled(Style::Cyan);
			let line = line!().to_string().styled(Style::Cyan);

			$(
				let val_name = stringify!($val);
				eprintln!(
					"[{}][{}:{}] {} = {:#?}",
					$level, file, line, val_name, &$val
				);
			)+
		}
	}};
}
