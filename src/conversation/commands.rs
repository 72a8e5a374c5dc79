use std::str::FromStr;

use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Start a new conversation
    New,
    /// List conversations
    Chats,
    /// Print the active conversation as JSON
    Export,
    /// Show help
    Help,
    /// Exit the application
    Bye,
}

/// Result of reading one line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    Command(SlashCommand),
    /// A known command followed by text; no command takes arguments
    UnexpectedArgument(SlashCommand),
    UnknownCommand(String),
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::New => "start a new conversation",
            SlashCommand::Chats => "list your conversations",
            SlashCommand::Export => "print the active conversation as JSON",
            SlashCommand::Help => "show available commands",
            SlashCommand::Bye => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

fn lookup_command(name: &str) -> Option<SlashCommand> {
    SlashCommand::from_str(name).ok().or_else(|| match name.to_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(SlashCommand::Bye),
        "n" => Some(SlashCommand::New),
        "ls" => Some(SlashCommand::Chats),
        "h" | "?" => Some(SlashCommand::Help),
        _ => None,
    })
}

/// Parse a bare slash command from user input
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    match parse_input(input) {
        Input::Command(command) => Some(command),
        _ => None,
    }
}

/// Classify a line typed at the prompt
pub fn parse_input(line: &str) -> Input {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Input::Message(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match parts.next().and_then(lookup_command) {
        Some(command) if parts.next().is_none() => Input::Command(command),
        Some(command) => Input::UnexpectedArgument(command),
        None => Input::UnknownCommand(line.trim().to_string()),
    }
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let mut help = String::from("Available commands:\n\n");
    for command in SlashCommand::iter() {
        help.push_str(&format!("/{} - {}\n", command.command(), command.description()));
    }

    help.push_str("\nAliases: /q for /bye, /n for /new, /ls for /chats");

    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse_slash_command("/new"), Some(SlashCommand::New));
        assert_eq!(parse_slash_command("/q"), Some(SlashCommand::Bye));
        assert_eq!(parse_slash_command("  /ls "), Some(SlashCommand::Chats));
        assert_eq!(parse_slash_command("/teleport"), None);
        assert_eq!(parse_slash_command("/"), None);
    }

    #[test]
    fn arguments_are_not_silently_dropped() {
        assert_eq!(
            parse_input("/export pretty  please"),
            Input::UnexpectedArgument(SlashCommand::Export)
        );
        assert_eq!(parse_slash_command("/bye now"), None);
        assert_eq!(parse_input("/export"), Input::Command(SlashCommand::Export));
    }

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_input("find me big buck bunny"),
            Input::Message("find me big buck bunny".into())
        );
        assert_eq!(
            parse_input("/nope"),
            Input::UnknownCommand("/nope".into())
        );
    }

    #[test]
    fn help_lists_every_command() {
        let help = get_help_text();
        for command in SlashCommand::iter() {
            assert!(help.contains(&format!("/{}", command.command())));
        }
    }
}
