use crate::view::OutputFormat;
use clap::Parser;
use clap::error::ErrorKind;

/// Meta commands, typed with a leading ':' so they never clash with Gremlin.
#[derive(Parser, Clone, Debug)]
#[command(no_binary_name = true)]
pub enum ShellCommand {
    /// Choose how results are presented
    Format {
        #[arg(value_enum)]
        format: OutputFormat,
    },
    /// Keep only the first result item (like next())
    First {
        /// on or off
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },
    /// Show the current settings
    Status,
    /// Clear the screen
    Clear,
}

/// One line typed into the shell.
#[derive(Debug)]
pub enum ShellInput {
    Script(String),
    Command(ShellCommand),
    Exit,
    Empty,
}

impl ShellCommand {
    pub fn command_names() -> Vec<String> {
        use clap::CommandFactory;
        let cmd = Self::command();
        let mut names = vec![":help".to_string(), ":exit".to_string(), ":quit".to_string()];
        names.extend(cmd.get_subcommands().map(|s| format!(":{}", s.get_name())));
        names
    }
}

pub fn parse_line(line: &str) -> Result<ShellInput, Box<dyn std::error::Error>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ShellInput::Empty);
    }
    let Some(meta) = trimmed.strip_prefix(':') else {
        return Ok(ShellInput::Script(trimmed.to_string()));
    };
    if meta == "exit" || meta == "quit" {
        return Ok(ShellInput::Exit);
    }

    let args = shlex::split(meta).ok_or("Invalid quoting")?;
    match ShellCommand::try_parse_from(args) {
        Ok(c) => Ok(ShellInput::Command(c)),
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp || e.kind() == ErrorKind::DisplayVersion {
                println!("{}", e);
                return Ok(ShellInput::Empty);
            }
            Err(Box::new(e))
        }
    }
}
