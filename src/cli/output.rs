//! Terminal output for the CLI
//!
//! Every line is rendered either with owo-colors or as a plain bracketed tag,
//! depending on `--no-color`.

use owo_colors::OwoColorize;

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Ok => "[OK]",
            Level::Info => "[INFO]",
            Level::Warn => "[WARN]",
            Level::Error => "[ERROR]",
        }
    }

    fn symbol(self) -> String {
        match self {
            Level::Ok => "✓".green().bold().to_string(),
            Level::Info => "•".blue().to_string(),
            Level::Warn => "⚠".yellow().bold().to_string(),
            Level::Error => "✗".red().bold().to_string(),
        }
    }
}

/// What happened to a scaffolded file or directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Created,
    Skipped,
}

pub struct Output {
    colored: bool,
}

impl Output {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Renders a status line without printing it.
    pub fn format_status(&self, level: Level, message: &str) -> String {
        if self.colored {
            format!("  {} {}", level.symbol(), message)
        } else {
            format!("  {} {}", level.tag(), message)
        }
    }

    /// Prints a status line; errors go to stderr.
    pub fn status(&self, level: Level, message: &str) {
        let line = self.format_status(level, message);
        if level == Level::Error {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    pub fn success(&self, message: &str) {
        self.status(Level::Ok, message);
    }

    pub fn info(&self, message: &str) {
        self.status(Level::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.status(Level::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.status(Level::Error, message);
    }

    /// Renders one line of the `init` file report.
    pub fn format_file(&self, action: FileAction, kind: &str, path: &str) -> String {
        match (action, self.colored) {
            (FileAction::Created, true) => format!(
                "  {} {} {}",
                "+".green().bold(),
                kind.dimmed(),
                path.bright_white()
            ),
            (FileAction::Skipped, true) => format!(
                "  {} {} {}",
                "=".yellow(),
                kind.dimmed(),
                format!("{path} (kept)").yellow()
            ),
            (FileAction::Created, false) => format!("  [CREATED] {kind} {path}"),
            (FileAction::Skipped, false) => format!("  [KEPT] {kind} {path}"),
        }
    }

    pub fn file(&self, action: FileAction, kind: &str, path: &str) {
        println!("{}", self.format_file(action, kind, path));
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n   {} {}\n",
                "notes-server".bright_cyan().bold(),
                version.dimmed()
            );
        } else {
            println!("\n   notes-server {version}\n");
        }
    }

    pub fn section(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  == {title} ==");
        }
    }

    /// One aligned `key: value` row, as printed by `config`.
    pub fn field(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {:<16} {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {:<16} {}", format!("{key}:"), value);
        }
    }

    /// A shell command the user is expected to run next.
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {cmd}").bright_cyan());
        } else {
            println!("     $ {cmd}");
        }
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.dimmed().italic());
        } else {
            println!("\n  ({message})");
        }
    }

    pub fn blank(&self) {
        println!();
    }
}
