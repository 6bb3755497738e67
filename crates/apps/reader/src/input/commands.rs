//! Command-line parsing and help text

use anyhow::{Context, Result, bail};
use mail::SortField;

/// A command typed on the `:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    Logout,
    WhoAmI,
    Search(String),
    Sort(SortField),
    /// 1-based page number
    Page(usize),
    Next,
    Prev,
    Rows(usize),
    /// 1-based row on the current page
    Show(usize),
    /// 1-based row on the current page
    Open(usize),
    Help,
    Quit,
}

/// A single command for display in the help listing
pub struct CommandHelp {
    pub usage: &'static str,
    pub description: &'static str,
}

pub const HELP: &[CommandHelp] = &[
    CommandHelp { usage: "login", description: "Sign in with Google" },
    CommandHelp { usage: "logout", description: "Sign out and clear results" },
    CommandHelp { usage: "whoami", description: "Show the signed-in user" },
    CommandHelp { usage: "search <query>", description: "Search mail (Gmail query syntax)" },
    CommandHelp {
        usage: "sort <subject|date|snippet>",
        description: "Sort by a column; again to reverse",
    },
    CommandHelp { usage: "page <n>", description: "Go to page n" },
    CommandHelp { usage: "next / prev", description: "Next or previous page" },
    CommandHelp { usage: "rows <5|10|25>", description: "Rows per page" },
    CommandHelp { usage: "show <row>", description: "Show a row with its full snippet" },
    CommandHelp { usage: "open <row>", description: "Open a row in Gmail" },
    CommandHelp { usage: "help", description: "Show this help" },
    CommandHelp { usage: "quit", description: "Exit" },
];

/// Parse one input line; blank lines yield `None`
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "login" => Command::Login,
        "logout" => Command::Logout,
        "whoami" => Command::WhoAmI,
        "search" | "s" => {
            if rest.is_empty() {
                bail!("usage: search <query>");
            }
            Command::Search(rest.to_string())
        }
        "sort" => Command::Sort(rest.parse()?),
        "page" => Command::Page(number(rest, "page <n>")?),
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "rows" => Command::Rows(number(rest, "rows <5|10|25>")?),
        "show" => Command::Show(number(rest, "show <row>")?),
        "open" | "o" => Command::Open(number(rest, "open <row>")?),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{}' (type `help`)", other),
    };
    Ok(Some(command))
}

fn number(arg: &str, usage: &str) -> Result<usize> {
    arg.parse()
        .with_context(|| format!("usage: {}", usage))
}
