#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for browsing a zinktray fake SMTP server

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use zinktray_client::view::{format_date, today_utc};
use zinktray_client::{
    ApiClient, ApiConfig, Mailbox, MessageDetail, MessageSummary,
    NavigationController, NavigationEvent, NavigationOutcome,
};

#[derive(Parser)]
#[command(name = "zinktray-cli")]
#[command(about = "Browse mailboxes captured by a zinktray server")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Server base URL (overrides ZINKTRAY_URL)
    #[arg(long, global = true)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// List mailboxes
    Mailboxes,

    /// List messages of a mailbox, by name (anonymous mailbox if omitted)
    List {
        /// Mailbox name
        #[arg(default_value = "")]
        mailbox: String,
    },

    /// Show a single message by id
    Show {
        /// Message id
        id: String,
    },

    /// Navigate to a hash fragment and print the resulting view
    Open {
        /// Hash fragment, e.g. '#!/alice/42'
        #[arg(default_value = "#")]
        hash: String,
    },

    /// Interactive browsing from stdin
    ///
    /// Lines starting with '#' are hash changes, ':delete' deletes the
    /// selected message, ':quit' exits, anything else is a mailbox name.
    Browse {
        /// Initial hash fragment
        #[arg(default_value = "#")]
        hash: String,
    },

    /// Delete a message by id
    DeleteMessage {
        /// Message id
        id: String,
    },

    /// Delete a mailbox by id
    DeleteMailbox {
        /// Mailbox id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.url {
        Some(url) => ApiConfig::new(url)?,
        None => ApiConfig::from_env()?,
    };
    let client = ApiClient::new(config)?;

    match &args.command {
        Command::Mailboxes => cmd_mailboxes(&client, &args).await?,
        Command::List { mailbox } => cmd_list(&client, &args, mailbox).await?,
        Command::Show { id } => cmd_show(&client, &args, id).await?,
        Command::Open { hash } => cmd_open(client, &args, hash).await?,
        Command::Browse { hash } => cmd_browse(client, hash).await?,
        Command::DeleteMessage { id } => {
            client.delete_message(id).await?;
            println!("Deleted message {id}");
        }
        Command::DeleteMailbox { id } => {
            client.delete_mailbox(id).await?;
            println!("Deleted mailbox {id}");
        }
    }

    Ok(())
}

async fn cmd_mailboxes(client: &ApiClient, args: &Args) -> anyhow::Result<()> {
    let mailboxes = client.list_mailboxes().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&mailboxes)?);
    } else {
        print_mailbox_table(&mailboxes);
    }

    Ok(())
}

async fn cmd_list(
    client: &ApiClient,
    args: &Args,
    name: &str,
) -> anyhow::Result<()> {
    let mailboxes = client.list_mailboxes().await?;
    let mailbox = Mailbox::resolve(&mailboxes, name);
    let messages = client.list_messages(&mailbox.id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else {
        print_message_table(&messages);
    }

    Ok(())
}

async fn cmd_show(
    client: &ApiClient,
    args: &Args,
    id: &str,
) -> anyhow::Result<()> {
    let message = client.get_message_detail(id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&message)?);
    } else {
        print_message_detail(&message);
    }

    Ok(())
}

async fn cmd_open(
    client: ApiClient,
    args: &Args,
    hash: &str,
) -> anyhow::Result<()> {
    let controller = NavigationController::new(client);
    controller
        .handle(NavigationEvent::Start(hash.to_string()))
        .await;

    let view = controller.view();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view.render_text(today_utc()));
    }

    Ok(())
}

async fn cmd_browse(client: ApiClient, hash: &str) -> anyhow::Result<()> {
    let controller = NavigationController::new(client);
    controller
        .handle(NavigationEvent::Start(hash.to_string()))
        .await;
    print_view(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        let outcome = match line {
            "" => continue,
            ":quit" | ":q" => break,
            ":delete" => match controller.delete_selected_message().await {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("Cannot delete: {e}");
                    continue;
                }
            },
            hash if hash.starts_with('#') => {
                controller
                    .handle(NavigationEvent::HashChanged(hash.to_string()))
                    .await
            }
            name => {
                controller
                    .handle(NavigationEvent::MailboxSubmitted(name.to_string()))
                    .await
            }
        };

        if outcome != NavigationOutcome::Unchanged {
            print_view(&controller);
        }
    }

    Ok(())
}

fn print_view(controller: &NavigationController<ApiClient>) {
    println!("[{}]", controller.location());
    print!("{}", controller.view().render_text(today_utc()));
}

fn print_mailbox_table(mailboxes: &[Mailbox]) {
    if mailboxes.is_empty() {
        println!("No mailboxes found.");
        return;
    }

    println!("{:<36} {:<30} {}", "ID", "Name", "Anonymous");
    println!("{}", "-".repeat(80));

    for mailbox in mailboxes {
        println!(
            "{:<36} {:<30} {}",
            mailbox.id,
            truncate(&mailbox.name, 28),
            if mailbox.is_anonymous { "yes" } else { "" },
        );
    }

    println!("\n{} mailbox(es)", mailboxes.len());
}

fn print_message_table(messages: &[MessageSummary]) {
    if messages.is_empty() {
        println!("No messages found.");
        return;
    }

    let today = today_utc();
    println!("{:<36} {:<10} {:<30} {}", "ID", "Date", "To", "Subject");
    println!("{}", "-".repeat(100));

    for message in messages {
        println!(
            "{:<36} {:<10} {:<30} {}",
            message.id,
            format_date(message.received_at, today),
            truncate(&message.to.join(", "), 28),
            truncate(&message.subject, 40),
        );
    }

    println!("\n{} message(s)", messages.len());
}

fn print_message_detail(message: &MessageDetail) {
    println!("ID:      {}", message.id);
    let date = format_date(message.received_at, today_utc());
    println!("Date:    {date}");
    println!("From:    {}", message.from.join(", "));
    println!("To:      {}", message.to.join(", "));
    println!("Subject: {}", message.subject);
    println!("\n--- Body ---\n");
    println!("{}", message.raw_body);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
