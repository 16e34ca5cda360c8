//! CLI entry point for `moblog`.
//!
//! Meant to be run by the MTA for one delivery: the message arrives on
//! standard input and the exit status reports success.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};

use moblog::config::Config;
use moblog::notify::SmtpNotifier;
use moblog::publish::GitPublisher;

#[derive(Parser)]
#[command(name = "moblog", version, about = "Publish an e-mail read from stdin as a Jekyll post")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to $MOBLOG_CONFIG or the user config dir)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SMTP server for the confirmation reply (host[:port])
    #[arg(short = 'm', long, env = "MOBLOG_MAIL_SERVER")]
    mail_server: Option<String>,

    /// Accepted sender: *, @domain, domain or user@domain (repeatable)
    #[arg(short, long = "accept", value_name = "PATTERN")]
    accept: Vec<String>,

    /// Sender address of the confirmation reply
    #[arg(short, long)]
    sender: Option<String>,

    /// Working copy of the Jekyll blog
    #[arg(short = 'd', long, env = "MOBLOG_REPOSITORY")]
    repository: Option<PathBuf>,

    /// Build the post from the HTML part, converted to Markdown
    #[arg(long)]
    html: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => return cmd_completions(shell),
        Some(Commands::Manpage) => return cmd_manpage(),
        None => {}
    }

    let mut config = moblog::config::load_config(cli.config.as_deref());
    apply_overrides(&mut config, &cli);

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    cmd_post(&config)
}

/// Command-line flags win over the configuration file.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref server) = cli.mail_server {
        config.mail.server = server.clone();
    }
    if !cli.accept.is_empty() {
        config.mail.accept = cli.accept.clone();
    }
    if let Some(ref sender) = cli.sender {
        config.mail.sender = sender.clone();
    }
    if let Some(ref repository) = cli.repository {
        config.blog.repository = repository.clone();
    }
    if cli.html {
        config.blog.use_html = true;
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = moblog::config::log_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "moblog.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Read one message from stdin and publish it.
fn cmd_post(config: &Config) -> anyhow::Result<()> {
    // Captured once: front-matter date and file name must agree.
    let now = chrono::Local::now().fixed_offset();

    let mut raw = Vec::new();
    std::io::stdin()
        .read_to_end(&mut raw)
        .context("cannot read message from stdin")?;

    let mut publisher = GitPublisher::new(
        &config.blog.repository,
        &config.blog.remote,
        &config.blog.branch,
    );
    let notifier = SmtpNotifier::new(
        &config.mail.server,
        &config.mail.sender,
        &config.mail.sender_name,
    )?;

    let publication = moblog::pipeline::run(&raw, config, &mut publisher, &notifier, now)?;
    tracing::info!(
        post = %publication.post_path,
        assets = publication.assets.len(),
        "Done"
    );
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "moblog", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
