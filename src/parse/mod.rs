use std::fmt::Display;

use crate::prelude::*;

pub mod execute;

/// Local variable bindings attached to a node
pub type Locals = BTreeMap<String, String>;

/// One node of a parsed command tree.
///
/// Trees are built by the parser and only ever read by the evaluator. The
/// shape of `class` decides which children exist, so a pipeline without a
/// right side cannot be represented at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
	pub class: NdRule,
	pub redirs: Redirs,
	pub locals: Locals,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NdRule {
	/// A simple command. `argv[0]` is the command name.
	Command { argv: Vec<String> },
	Pipeline { left: Box<Node>, right: Box<Node> },
	And { left: Box<Node>, right: Box<Node> },
	Or { left: Box<Node>, right: Box<Node> },
	/// `left ; right`, either side may be missing
	List { left: Option<Box<Node>>, right: Option<Box<Node>> },
	Subshell { body: Box<Node> },
	/// `{ left ; right ; }`
	BraceGrp { left: Box<Node>, right: Option<Box<Node>> },
}

/// The node kinds, without their payloads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NdKind {
	Simple,
	Pipe,
	SeqAnd,
	SeqOr,
	SeqList,
	Subshell,
	Group,
}

impl Display for NdKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			NdKind::Simple => "SIMPLE",
			NdKind::Pipe => "PIPE",
			NdKind::SeqAnd => "SEQUENCE_AND",
			NdKind::SeqOr => "SEQUENCE_OR",
			NdKind::SeqList => "SEQUENCE_LIST",
			NdKind::Subshell => "SUBSHELL",
			NdKind::Group => "GROUP",
		};
		write!(f, "{name}")
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InRedir {
	File(PathBuf),
	HereDoc(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
	Truncate,
	Append,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutRedir {
	pub path: PathBuf,
	pub mode: WriteMode,
}

/// Redirections for stdin and stdout. Other descriptors are never touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Redirs {
	pub input: Option<InRedir>,
	pub output: Option<OutRedir>,
}

impl Redirs {
	pub fn is_empty(&self) -> bool {
		self.input.is_none() && self.output.is_none()
	}
}

impl Node {
	pub fn new(class: NdRule) -> Self {
		Self { class, redirs: Redirs::default(), locals: Locals::new() }
	}
	pub fn simple<I, S>(argv: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let argv = argv.into_iter().map(Into::into).collect();
		Self::new(NdRule::Command { argv })
	}
	pub fn pipe(left: Node, right: Node) -> Self {
		Self::new(NdRule::Pipeline { left: Box::new(left), right: Box::new(right) })
	}
	pub fn and(left: Node, right: Node) -> Self {
		Self::new(NdRule::And { left: Box::new(left), right: Box::new(right) })
	}
	pub fn or(left: Node, right: Node) -> Self {
		Self::new(NdRule::Or { left: Box::new(left), right: Box::new(right) })
	}
	pub fn list(left: Option<Node>, right: Option<Node>) -> Self {
		Self::new(NdRule::List { left: left.map(Box::new), right: right.map(Box::new) })
	}
	pub fn subshell(body: Node) -> Self {
		Self::new(NdRule::Subshell { body: Box::new(body) })
	}
	pub fn group(left: Node, right: Option<Node>) -> Self {
		Self::new(NdRule::BraceGrp { left: Box::new(left), right: right.map(Box::new) })
	}
	pub fn with_input(self, input: InRedir) -> Self {
		let Self { class, redirs, locals } = self;
		Self { class, redirs: Redirs { input: Some(input), ..redirs }, locals }
	}
	pub fn with_output(self, path: impl Into<PathBuf>, mode: WriteMode) -> Self {
		let Self { class, redirs, locals } = self;
		let output = OutRedir { path: path.into(), mode };
		Self { class, redirs: Redirs { output: Some(output), ..redirs }, locals }
	}
	pub fn with_local(mut self, name: impl Into<String>, val: impl Into<String>) -> Self {
		self.locals.insert(name.into(), val.into());
		self
	}
	pub fn kind(&self) -> NdKind {
		match self.class {
			NdRule::Command { .. } => NdKind::Simple,
			NdRule::Pipeline { .. } => NdKind::Pipe,
			NdRule::And { .. } => NdKind::SeqAnd,
			NdRule::Or { .. } => NdKind::SeqOr,
			NdRule::List { .. } => NdKind::SeqList,
			NdRule::Subshell { .. } => NdKind::Subshell,
			NdRule::BraceGrp { .. } => NdKind::Group,
		}
	}
	/// The command name of a simple command
	pub fn get_command(&self) -> Option<&str> {
		let NdRule::Command { argv } = &self.class else {
			return None
		};
		argv.first().map(|s| s.as_str())
	}
}

/// Renders the tree back into shell syntax, for logs and diagnostics
impl Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (name, val) in &self.locals {
			write!(f, "{name}={val} ")?;
		}
		match &self.class {
			NdRule::Command { argv } => write!(f, "{}", argv.join(" "))?,
			NdRule::Pipeline { left, right } => write!(f, "{left} | {right}")?,
			NdRule::And { left, right } => write!(f, "{left} && {right}")?,
			NdRule::Or { left, right } => write!(f, "{left} || {right}")?,
			NdRule::List { left, right } => {
				if let Some(left) = left {
					write!(f, "{left};")?;
				}
				if let Some(right) = right {
					write!(f, " {right}")?;
				}
			}
			NdRule::Subshell { body } => write!(f, "( {body} )")?,
			NdRule::BraceGrp { left, right } => {
				write!(f, "{{ {left};")?;
				if let Some(right) = right {
					write!(f, " {right};")?;
				}
				write!(f, " }}")?;
			}
		}
		if let Some(input) = &self.redirs.input {
			match input {
				InRedir::File(path) => write!(f, " < {}", path.display())?,
				InRedir::HereDoc(_) => write!(f, " <<EOF")?,
			}
		}
		if let Some(output) = &self.redirs.output {
			let op = match output.mode {
				WriteMode::Truncate => ">",
				WriteMode::Append => ">>",
			};
			write!(f, " {op} {}", output.path.display())?;
		}
		Ok(())
	}
}
