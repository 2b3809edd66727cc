use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexdesk::assistant::{Assistant, DEFAULT_SECTION};
use lexdesk::client::ApiClient;
use lexdesk::config::{RemoteArgs, ServeArgs, StorageArgs};
use lexdesk::views::{load_list, render_dashboard, ListState};
use lexdesk::{api, nav, seed};

#[derive(Parser)]
#[command(name = "lexdesk")]
#[command(about = "Practice management for law firms: tasks, cases, clients, calls")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Server settings from the environment alone, for a bare `lexdesk`.
#[derive(Parser)]
struct EnvOnly {
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server (the default)
    Serve(ServeArgs),
    /// Load demo data into an empty store
    Seed(StorageArgs),
    /// Show stats, open tasks and unread notifications from a running server
    Dashboard(RemoteArgs),
    /// List one collection from a running server
    List {
        #[arg(value_enum)]
        collection: Collection,

        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Talk to the assistant of a running server
    Chat {
        /// Application section the conversation belongs to
        #[arg(long, default_value = DEFAULT_SECTION)]
        section: String,

        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Print the navigation tree
    Nav,
}

#[derive(Clone, Copy, ValueEnum)]
enum Collection {
    Tasks,
    Cases,
    Clients,
    Calls,
    Notifications,
    Users,
}

impl Collection {
    fn title(self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Cases => "Cases",
            Self::Clients => "Clients",
            Self::Calls => "Calls",
            Self::Notifications => "Notifications",
            Self::Users => "Users",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "lexdesk=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await?,
        None => serve(EnvOnly::parse_from(["lexdesk"]).serve).await?,
        Some(Commands::Seed(args)) => {
            let storage = args.open()?;
            if seed::demo(storage.as_ref(), args.hash_iterations)? {
                println!("Seeded demo data. Log in as '{}'.", seed::DEMO_USERNAME);
            } else {
                println!("Store already has data; nothing seeded.");
            }
        }
        Some(Commands::Dashboard(remote)) => {
            let client = ApiClient::new(remote.url);
            let (stats, tasks, notifications) =
                tokio::join!(client.stats(), client.tasks(), client.notifications());
            println!(
                "{}",
                render_dashboard(
                    &stats.map_err(|e| e.to_string()),
                    ListState::from_result(tasks),
                    ListState::from_result(notifications),
                )
            );
        }
        Some(Commands::List { collection, remote }) => {
            let client = ApiClient::new(remote.url);
            let title = collection.title();
            let loading = |frame: &str| eprintln!("{frame}");
            let out = match collection {
                Collection::Tasks => load_list(title, client.tasks(), loading).await,
                Collection::Cases => load_list(title, client.cases(), loading).await,
                Collection::Clients => load_list(title, client.clients(), loading).await,
                Collection::Calls => load_list(title, client.calls(), loading).await,
                Collection::Notifications => load_list(title, client.notifications(), loading).await,
                Collection::Users => load_list(title, client.users(), loading).await,
            };
            println!("{out}");
        }
        Some(Commands::Chat { section, remote }) => chat(remote, section).await?,
        Some(Commands::Nav) => print!("{}", nav::render_outline(&nav::default_tree())),
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let storage = args.storage.open()?;
    if args.seed && seed::demo(storage.as_ref(), args.storage.hash_iterations)? {
        tracing::info!("Seeded demo data (user '{}')", seed::DEMO_USERNAME);
    }

    let app = api::create_router(api::AppState::new(storage, args.app_config()));

    let addr = args.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("LexDesk server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn chat(remote: RemoteArgs, section: String) -> anyhow::Result<()> {
    let mut assistant = Assistant::new(Arc::new(ApiClient::new(remote.url)), section);
    if let Some(greeting) = assistant.messages().first() {
        println!("assistant> {}", greeting.text);
    }

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if let Some(reply) = assistant.send(&line).await {
            println!("assistant> {}", reply.text);
        }
    }
    Ok(())
}
