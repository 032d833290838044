//! Vaani - terminal client for the question-answering service
//!
//! Logs in (or uses a supplied token), opens a session and runs a line-based
//! chat loop on stdin/stdout.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vaani_client::transport::RequestErrorKind;
use vaani_client::{
    Attachment, AuthMode, ClientConfig, Credentials, HttpTransport, LoggingTransport, MessageKind, Sender,
    Session, SessionHandle, SessionRuntime, SessionSnapshot, Transport,
};

const HELP: &str = "\
Commands:
  /attach <path>...   stage files for the next message
  /detach <n>         remove staged file number n
  /files              list staged files
  /help               show this help
  /quit               exit
Anything else is sent as a question. An empty line sends staged files alone.";

#[derive(Debug, Parser)]
#[command(name = "vaani", about = "Chat with the Vaani question-answering service")]
struct Cli {
    /// Service base URL (overrides VAANI_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides VAANI_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<u64>,

    /// Bearer token; skips login (overrides VAANI_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Username for login (overrides VAANI_USERNAME)
    #[arg(long, short)]
    username: Option<String>,

    /// Password for login (overrides VAANI_PASSWORD)
    #[arg(long, short)]
    password: Option<String>,

    /// Register the account before logging in
    #[arg(long)]
    register: bool,

    /// Start with an empty transcript
    #[arg(long)]
    no_greeting: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Files to stage before the first message
    #[arg(long = "attach", value_name = "PATH")]
    attach: Vec<PathBuf>,
}

impl Cli {
    fn merge(&self, mut config: ClientConfig) -> Result<ClientConfig, vaani_client::ConfigError> {
        if let Some(url) = &self.base_url {
            config.base_url.clone_from(url);
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if self.token.is_some() {
            config.token.clone_from(&self.token);
        }
        if self.username.is_some() {
            config.username.clone_from(&self.username);
        }
        if self.password.is_some() {
            config.password.clone_from(&self.password);
        }
        if self.no_greeting {
            config.greeting = None;
        }
        config.log_json |= self.log_json;
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.merge(ClientConfig::from_env()?)?;

    init_logging(config.log_json);
    tracing::debug!(?config, "Configuration loaded");

    let transport = LoggingTransport::new(HttpTransport::new(&config.base_url, config.timeout)?);

    let token = match &config.token {
        Some(token) => token.clone(),
        None => obtain_token(&transport, &config, cli.register).await?,
    };

    let mut session = Session::new(token);
    if let Some(greeting) = &config.greeting {
        session = session.with_greeting(greeting.clone());
    }
    tracing::info!(session = %session.id(), base_url = %config.base_url, "Session opened");

    let handle = SessionRuntime::spawn(session, transport);

    if !cli.attach.is_empty() {
        let files = load_attachments(&cli.attach).await?;
        handle.attach(files).await?;
    }

    chat_loop(&handle).await
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vaani_client=info,vaani=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
        }))
        .init();
}

/// Log in with the configured credentials, registering first if asked
async fn obtain_token(
    transport: &impl Transport,
    config: &ClientConfig,
    register: bool,
) -> anyhow::Result<String> {
    let (Some(username), Some(password)) = (&config.username, &config.password) else {
        bail!("No token configured. Set VAANI_TOKEN or pass --username and --password.");
    };
    let credentials = Credentials::new(username.clone(), password.clone());

    if register {
        transport
            .authenticate(AuthMode::Register, &credentials)
            .await
            .context("Registration failed")?;
        println!("Registration successful.");
    }

    let response = match transport.authenticate(AuthMode::Login, &credentials).await {
        Ok(response) => response,
        Err(e) if e.is_auth() => bail!("Login rejected: {e}. Check the username and password."),
        Err(e) => return Err(e).context("Login failed"),
    };

    match response.token {
        Some(token) => {
            println!("Login successful.");
            Ok(token)
        }
        None => bail!("Login succeeded but the service returned no token"),
    }
}

async fn load_attachments(paths: &[PathBuf]) -> anyhow::Result<Vec<Attachment>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(Attachment::from_path(path).await?);
    }
    Ok(files)
}

async fn chat_loop(handle: &SessionHandle) -> anyhow::Result<()> {
    let mut seen = render(&handle.snapshot(), 0);
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end();

        let snapshot = match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit" | "/exit", _) => break,
            ("/help", _) => {
                println!("{HELP}");
                continue;
            }
            ("/files", _) => {
                print_pending(&handle.snapshot());
                continue;
            }
            ("/attach", args) => {
                let paths: Vec<PathBuf> = args.split_whitespace().map(PathBuf::from).collect();
                if paths.is_empty() {
                    println!("Usage: /attach <path>...");
                    continue;
                }
                match load_attachments(&paths).await {
                    Ok(files) => handle.attach(files).await?,
                    Err(e) => {
                        println!("Could not attach: {e}");
                        continue;
                    }
                }
            }
            ("/detach", arg) => match arg.trim().parse::<usize>() {
                Ok(n) if n >= 1 => handle.detach(n - 1).await?,
                _ => {
                    println!("Usage: /detach <n> (see /files)");
                    continue;
                }
            },
            _ => {
                let accepted = handle.submit(line).await?;
                if accepted.busy {
                    seen = render(&accepted, seen);
                    eprintln!("Typing...");
                    handle.settled().await?
                } else {
                    accepted
                }
            }
        };

        seen = render(&snapshot, seen);
        if let Some(notice) = &snapshot.composer.notice {
            println!("{notice}");
        }
        if let Some(hint) = snapshot.last_failure.and_then(failure_hint) {
            println!("{hint}");
        }
    }

    Ok(())
}

/// Guidance for failures the user can act on
fn failure_hint(kind: RequestErrorKind) -> Option<&'static str> {
    match kind {
        RequestErrorKind::Auth => Some(
            "The service rejected the token. Re-run with --username and --password to log in again.",
        ),
        RequestErrorKind::Network => {
            Some("Could not reach the service. Check --base-url and that the server is running.")
        }
        _ => None,
    }
}

/// Print messages not yet shown; returns the new count of shown messages
fn render(snapshot: &SessionSnapshot, seen: usize) -> usize {
    for message in snapshot.messages_since(seen) {
        let prefix = match (message.sender, message.kind) {
            (_, MessageKind::Error) => "bot (error)",
            (Sender::User, MessageKind::DocumentNotice) => "you (documents)",
            (Sender::User, _) => "you",
            (Sender::Bot, _) => "bot",
        };
        println!("{prefix}> {}", message.text);
    }
    snapshot.messages.len()
}

fn print_pending(snapshot: &SessionSnapshot) {
    if snapshot.pending.is_empty() {
        println!("No files staged.");
        return;
    }
    for (i, file) in snapshot.pending.iter().enumerate() {
        println!("  {}. {} ({} bytes)", i + 1, file.name, file.size);
    }
}
