mod command;
mod prompt;

use reedline::{
    ColumnarMenu, DefaultCompleter, DefaultHinter, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal,
    default_emacs_keybindings,
};
use gremlab_core::{GraphTraversalSource, GremlabConfig, QueryResultAdapter};
use tracing::{error, info};

use self::command::{ShellCommand, ShellInput, parse_line};
use self::prompt::DefaultPrompt;
use crate::view::{OutputFormat, present};

// Shell configuration constants
const SHELL_HISTORY_SIZE: usize = 500;

pub struct ReplServer {
    traversal: GraphTraversalSource,
    endpoint: String,
    format: OutputFormat,
    first: bool,
}

impl ReplServer {
    pub fn new(config: &GremlabConfig) -> gremlab_core::Result<Self> {
        let traversal = gremlab_runtime::open_traversal(config)?;
        Ok(Self {
            traversal,
            endpoint: format!("{}:{}", config.connection.host, config.connection.port),
            format: OutputFormat::Table,
            first: false,
        })
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        println!("Connected lazily to {}. Type ':help' for commands.", self.endpoint);
        let line_editor = self.setup_line_editor()?;
        self.run_loop(line_editor)
    }

    fn setup_line_editor(&self) -> Result<Reedline, Box<dyn std::error::Error>> {
        let commands = ShellCommand::command_names();
        let completer = Box::new(DefaultCompleter::new_with_wordlen(commands, 2));
        let completion_menu = Box::new(ColumnarMenu::default().with_name("completion_menu"));

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu("completion_menu".to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let history_dir = gremlab_core::config::gremlab_dir().join("shell");
        std::fs::create_dir_all(&history_dir)?;
        let history = Box::new(FileBackedHistory::with_file(
            SHELL_HISTORY_SIZE,
            history_dir.join("history"),
        )?);

        Ok(Reedline::create()
            .with_history(history)
            .with_completer(completer)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_hinter(Box::new(
                DefaultHinter::default().with_style(
                    nu_ansi_term::Style::new()
                        .italic()
                        .fg(nu_ansi_term::Color::LightGray),
                ),
            ))
            .with_edit_mode(Box::new(Emacs::new(keybindings))))
    }

    fn run_loop(&mut self, mut line_editor: Reedline) -> Result<(), Box<dyn std::error::Error>> {
        let prompt = DefaultPrompt::new(self.endpoint.clone());

        loop {
            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(buffer)) => match parse_line(&buffer) {
                    Ok(ShellInput::Empty) => {}
                    Ok(ShellInput::Exit) => break,
                    Ok(ShellInput::Command(ShellCommand::Clear)) => {
                        let _ = line_editor.clear_screen();
                    }
                    Ok(ShellInput::Command(cmd)) => println!("{}", self.apply(cmd)),
                    Ok(ShellInput::Script(script)) => match self.evaluate(&script) {
                        Ok(output) => println!("{}", output),
                        Err(e) => {
                            error!("Query failed: {}", e);
                            eprintln!("Error: {}", e);
                        }
                    },
                    Err(e) => eprintln!("Error: {}", e),
                },
                Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                    println!("Bye!");
                    break;
                }
                x => println!("Event: {:?}", x),
            }
        }
        Ok(())
    }

    fn apply(&mut self, cmd: ShellCommand) -> String {
        match cmd {
            ShellCommand::Format { format } => {
                self.format = format;
                format!("format: {:?}", format).to_lowercase()
            }
            ShellCommand::First { enabled } => {
                self.first = enabled;
                format!("first: {}", if enabled { "on" } else { "off" })
            }
            ShellCommand::Status | ShellCommand::Clear => format!(
                "endpoint: {}, source: {}, format: {}, first: {}",
                self.endpoint,
                self.traversal.traversal_source(),
                format!("{:?}", self.format).to_lowercase(),
                if self.first { "on" } else { "off" }
            ),
        }
    }

    fn evaluate(&self, script: &str) -> Result<String, Box<dyn std::error::Error>> {
        let start = std::time::Instant::now();
        let adapter = QueryResultAdapter::resolve_and_wrap(self.traversal.submit(script))?;
        info!("Script evaluated in {:?}", start.elapsed());

        let adapter = if self.first {
            QueryResultAdapter::new(adapter.into_result().into_first())
        } else {
            adapter
        };
        present(&adapter, self.format)
    }
}

pub fn run(config: GremlabConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut server = ReplServer::new(&config)?;
    server.run()
}
