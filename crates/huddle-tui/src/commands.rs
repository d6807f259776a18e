//! Slash-command parsing for the input line.
//!
//! Anything not starting with `/` is a chat message.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/user <name> [icon]`
    SetUser {
        /// Display name.
        name: String,
        /// Avatar reference.
        icon: Option<String>,
    },
    /// `/create`
    CreateRoom,
    /// `/join <hash>`
    JoinRoom {
        /// Room hash.
        hash: String,
    },
    /// `/leave`
    Leave,
    /// `/quit`
    Quit,
    /// Plain text for the viewed room.
    Message {
        /// Text as typed.
        text: String,
    },
    /// Unrecognized `/command`.
    Unknown {
        /// The whole line.
        input: String,
    },
    /// Known command with missing or extra arguments.
    InvalidArgs {
        /// Command name without the slash.
        command: &'static str,
        /// What went wrong.
        error: &'static str,
    },
}

/// Parse one input line.
pub fn parse(line: &str) -> Command {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Message { text: line.to_string() };
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match name {
        "user" | "nick" => match args.as_slice() {
            [name] => Command::SetUser { name: (*name).to_string(), icon: None },
            [name, icon] => {
                Command::SetUser { name: (*name).to_string(), icon: Some((*icon).to_string()) }
            },
            [] => Command::InvalidArgs { command: "user", error: "usage: /user <name> [icon]" },
            _ => Command::InvalidArgs { command: "user", error: "too many arguments" },
        },
        "create" => no_args(&args, "create", Command::CreateRoom),
        "join" => match args.as_slice() {
            [hash] => Command::JoinRoom { hash: (*hash).to_string() },
            [] => Command::InvalidArgs { command: "join", error: "usage: /join <hash>" },
            _ => Command::InvalidArgs { command: "join", error: "too many arguments" },
        },
        "leave" => no_args(&args, "leave", Command::Leave),
        "quit" | "q" => no_args(&args, "quit", Command::Quit),
        _ => Command::Unknown { input: line.to_string() },
    }
}

fn no_args(args: &[&str], command: &'static str, parsed: Command) -> Command {
    if args.is_empty() {
        parsed
    } else {
        Command::InvalidArgs { command, error: "takes no arguments" }
    }
}
