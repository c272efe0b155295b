//! Init command implementation
//!
//! Scaffolds a new notes server project: `notes.toml`, `.env.example`,
//! the `data/` directory and a `.gitignore`.

use super::output::{FileAction, Output};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (notes.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.section("Initializing notes server project");

    let base_path = &config.path;

    let config_path = base_path.join("notes.toml");
    if config_path.exists() && !config.force {
        output.warning("notes.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let data_dir = base_path.join("data");
    if data_dir.exists() {
        output.file(FileAction::Skipped, "directory", "data");
    } else {
        if let Err(e) = fs::create_dir_all(&data_dir) {
            output.error(&format!("Failed to create data: {}", e));
            return InitResult::Error(e.to_string());
        }
        output.file(FileAction::Created, "directory", "data");
    }

    if let Err(e) = write_file(&config_path, &generate_notes_toml(&config), config.force) {
        output.error(&format!("Failed to create notes.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.file(FileAction::Created, "config", "notes.toml");

    let env_example_path = base_path.join(".env.example");
    if let Err(e) = write_file(&env_example_path, generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.file(FileAction::Created, "env", ".env.example");

    // An existing .gitignore belongs to the user, even with --force
    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        if let Err(e) = write_file(&gitignore_path, generate_gitignore(), false) {
            output.warning(&format!("Failed to create .gitignore: {}", e));
        } else {
            output.file(FileAction::Created, "file", ".gitignore");
        }
    }

    output.success("Project initialized.");

    output.section("Next Steps");
    output.info("1. Set the signing key:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set JWT_SECRET");
    output.blank();
    output.info("2. Start the server:");
    output.command("notes-server");

    output.hint(&format!(
        "Server will be available at http://{}:{}/api",
        config.host, config.port
    ));

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_notes_toml(config: &InitConfig) -> String {
    format!(
        r#"# Notes Server Configuration
# Generated by: notes-server init
#
# REQUIRED: set JWT_SECRET in the environment (or .env) before starting.
# The file is read once at startup; restart the server to apply changes.

[server]
host = "{host}"
port = {port}
log_level = "info"
json_logs = false

[auth]
jwt_secret_env = "JWT_SECRET"
issuer = "notes-server"
audience = "notes-client"
expires_minutes = 60

[database]
# Use ":memory:" for a throwaway database
url = "./data/notes.db"
# turso_url_env = "TURSO_URL"
# turso_token_env = "TURSO_AUTH_TOKEN"

[cors]
allowed_origins = ["http://localhost:5173"]
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example() -> &'static str {
    r#"# Notes Server Environment Variables
# Copy this file to .env and fill in the values.

# REQUIRED: HMAC key used to sign tokens
# Generate with: openssl rand -base64 32
JWT_SECRET=change-me-in-production

# Optional: log filter, overrides server.log_level
RUST_LOG=info,notes=debug

# Optional: remote Turso database (requires the `turso` feature)
# TURSO_URL=libsql://your-db.turso.io
# TURSO_AUTH_TOKEN=your-token
"#
}

fn generate_gitignore() -> &'static str {
    r#"/data/
*.db
*.db-journal

.env
.env.local

/target/
"#
}
