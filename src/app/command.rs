//! Command parsing for the command line

use crate::invocation::Reciter;

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a chapter: :surah <n>
    Surah(u16),
    /// Jump to a verse of the current chapter: :goto <n>
    Goto(u16),
    /// Verses per page for this session: :page-size <n>
    PageSize(usize),
    /// Word audio autoplay: :autoplay [on|off]
    Autoplay(Option<bool>),
    /// Invocation reciter: :reciter <name>
    Reciter(Reciter),
    /// Quit the application: :q or :quit
    Quit,
    /// Show help: :help or :h
    Help,
    /// Clear message: (empty command)
    Nop,
}

/// Result of parsing a command
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
    /// Argument present but not usable
    InvalidArgument(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim()).unwrap_or("");

    match cmd.to_lowercase().as_str() {
        "surah" | "s" | "open" => {
            number_arg("surah", args, |n: u16| (1..=114).contains(&n), Command::Surah)
        }
        "goto" | "g" | "ayah" => number_arg("goto", args, |_: u16| true, Command::Goto),
        "page-size" | "ps" => number_arg("page-size", args, |n: usize| n >= 1, Command::PageSize),
        "autoplay" | "ap" => match args.to_lowercase().as_str() {
            "" => ParseResult::Ok(Command::Autoplay(None)),
            "on" | "true" | "yes" => ParseResult::Ok(Command::Autoplay(Some(true))),
            "off" | "false" | "no" => ParseResult::Ok(Command::Autoplay(Some(false))),
            other => ParseResult::InvalidArgument(format!("autoplay: {}", other)),
        },
        "reciter" | "r" => {
            if args.is_empty() {
                ParseResult::MissingArgument("reciter".to_string())
            } else {
                match args.parse() {
                    Ok(reciter) => ParseResult::Ok(Command::Reciter(reciter)),
                    Err(e) => ParseResult::InvalidArgument(e),
                }
            }
        }
        "quit" | "q" => ParseResult::Ok(Command::Quit),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}

fn number_arg<N: std::str::FromStr>(
    name: &str,
    args: &str,
    valid: impl Fn(N) -> bool,
    build: impl Fn(N) -> Command,
) -> ParseResult
where
    N: Copy,
{
    if args.is_empty() {
        return ParseResult::MissingArgument(name.to_string());
    }
    match args.parse::<N>() {
        Ok(n) if valid(n) => ParseResult::Ok(build(n)),
        _ => ParseResult::InvalidArgument(format!("{}: {}", name, args)),
    }
}
