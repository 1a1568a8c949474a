use clap::{Parser, ValueEnum};
use sheval::{
	libsh::flog::{ShevalLogLevel, LOG_LEVEL_VAR},
	prelude::*,
	process, InRedir, Node, ShState, WriteMode,
};

/// Build a command tree from whole commands and evaluate it.
///
/// Each COMMAND is split on whitespace into an argument list; there is no
/// quoting. Commands are joined left to right by `--op`.
#[derive(Parser, Debug)]
#[command(name = "sheval", version)]
struct Args {
	/// How the commands are combined
	#[arg(long, value_enum, default_value_t = Op::List)]
	op: Op,

	/// Redirect the first command's stdin from FILE
	#[arg(long = "in", value_name = "FILE", conflicts_with = "heredoc")]
	input: Option<PathBuf>,

	/// Feed TEXT to the first command's stdin
	#[arg(long, value_name = "TEXT")]
	heredoc: Option<String>,

	/// Redirect the last command's stdout to FILE, truncating it
	#[arg(long, value_name = "FILE", conflicts_with = "append")]
	out: Option<PathBuf>,

	/// Redirect the last command's stdout to FILE, appending
	#[arg(long, value_name = "FILE")]
	append: Option<PathBuf>,

	/// Local variable for the whole tree
	#[arg(long = "local", value_name = "NAME=VALUE", value_parser = parse_local)]
	locals: Vec<(String, String)>,

	/// error, warn, info, debug or trace
	#[arg(long, value_name = "LEVEL", value_parser = parse_log_level)]
	log_level: Option<ShevalLogLevel>,

	#[arg(required = true, value_name = "COMMAND")]
	commands: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
	Pipe,
	And,
	Or,
	List,
	Subshell,
	Group,
}

fn parse_local(raw: &str) -> Result<(String, String), String> {
	match raw.split_once('=') {
		Some((name, val)) if !name.is_empty() => Ok((name.to_string(), val.to_string())),
		_ => Err(format!("expected NAME=VALUE, got '{raw}'")),
	}
}

fn parse_log_level(raw: &str) -> Result<ShevalLogLevel, String> {
	ShevalLogLevel::from_name(raw).ok_or_else(|| format!("unknown log level '{raw}'"))
}

fn fold(leaves: Vec<Node>, join: fn(Node, Node) -> Node) -> Option<Node> {
	leaves.into_iter().reduce(join)
}

fn join_list(left: Node, right: Node) -> Node {
	Node::list(Some(left), Some(right))
}

fn build_tree(args: &Args) -> Option<Node> {
	let mut leaves: Vec<Node> = args.commands
		.iter()
		.map(|cmd| Node::simple(cmd.split_whitespace()))
		.collect();

	if let Some(first) = leaves.first_mut() {
		let input = match (&args.input, &args.heredoc) {
			(Some(path), _) => Some(InRedir::File(path.clone())),
			(None, Some(text)) => Some(InRedir::HereDoc(text.clone())),
			(None, None) => None,
		};
		if let Some(input) = input {
			*first = first.clone().with_input(input);
		}
	}
	if let Some(last) = leaves.last_mut() {
		let output = match (&args.out, &args.append) {
			(Some(path), _) => Some((path.clone(), WriteMode::Truncate)),
			(None, Some(path)) => Some((path.clone(), WriteMode::Append)),
			(None, None) => None,
		};
		if let Some((path, mode)) = output {
			*last = last.clone().with_output(path, mode);
		}
	}

	let root = match args.op {
		Op::Pipe => fold(leaves, Node::pipe)?,
		Op::And => fold(leaves, Node::and)?,
		Op::Or => fold(leaves, Node::or)?,
		Op::List => fold(leaves, join_list)?,
		Op::Subshell => Node::subshell(fold(leaves, join_list)?),
		Op::Group => {
			let last = leaves.pop()?;
			match fold(leaves, join_list) {
				Some(left) => Node::group(left, Some(last)),
				None => Node::group(last, None),
			}
		}
	};

	Some(args.locals.iter().fold(root, |node, (name, val)| node.with_local(name, val)))
}

fn main() {
	let args = Args::parse();
	if let Some(level) = args.log_level {
		unsafe { env::set_var(LOG_LEVEL_VAR, format!("{level:?}")) };
	}

	let Some(tree) = build_tree(&args) else {
		eprintln!("sheval: nothing to run");
		exit(1)
	};
	flog!(INFO, "evaluating: {}", tree);

	let mut state = ShState::new();
	let status = process(&tree, &mut state);
	exit(status)
}
