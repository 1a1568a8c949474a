use std::{fmt::Display, ops::BitOr};

pub trait Styled: Sized + Display {
	fn styled<S: Into<StyleSet>>(self, style: S) -> String {
		if !color_enabled() {
			return self.to_string();
		}
		let styles: StyleSet = style.into();
		let reset = Style::Reset;
		format!("{styles}{self}{reset}")
	}
}

impl<T: Display> Styled for T {}

/// Diagnostics go to stderr, so that is the stream whose capabilities matter
pub fn color_enabled() -> bool {
	std::env::var_os("NO_COLOR").is_none() && nix::unistd::isatty(nix::libc::STDERR_FILENO).unwrap_or(false)
}

/// Enum representing a single ANSI style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
	// Undoes all styles
	Reset,
	// Foreground Colors
	Red,
	Green,
	Yellow,
	Blue,
	Magenta,
	Cyan,

	// Text Attributes
	Bold,
	Dim,
}

impl Display for Style {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Style::Reset => write!(f, "\x1b[0m"),

			Style::Red => write!(f, "\x1b[31m"),
			Style::Green => write!(f, "\x1b[32m"),
			Style::Yellow => write!(f, "\x1b[33m"),
			Style::Blue => write!(f, "\x1b[34m"),
			Style::Magenta => write!(f, "\x1b[35m"),
			Style::Cyan => write!(f, "\x1b[36m"),

			Style::Bold => write!(f, "\x1b[1m"),
			Style::Dim => write!(f, "\x1b[2m"),
		}
	}
}

/// Struct representing a **set** of styles
#[derive(Debug, Default, Clone)]
pub struct StyleSet {
	styles: Vec<Style>,
}

impl StyleSet {
	pub fn new() -> Self {
		Self { styles: vec![] }
	}

	pub fn add_style(mut self, style: Style) -> Self {
		if !self.styles.contains(&style) {
			self.styles.push(style);
		}
		self
	}
}

impl Display for StyleSet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for style in &self.styles {
			style.fmt(f)?
		}
		Ok(())
	}
}

impl BitOr for Style {
	type Output = StyleSet;

	fn bitor(self, rhs: Self) -> Self::Output {
		StyleSet::new().add_style(self).add_style(rhs)
	}
}

impl BitOr<Style> for StyleSet {
	type Output = StyleSet;

	fn bitor(self, rhs: Style) -> Self::Output {
		self.add_style(rhs)
	}
}

impl From<Style> for StyleSet {
	fn from(style: Style) -> Self {
		StyleSet::new().add_style(style)
	}
}
