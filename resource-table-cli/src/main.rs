use std::fs::File;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use log::info;
use resource_table_lib::TableController;
use resource_table_lib::address::InMemoryAddress;
use resource_table_lib::api::HttpTableApi;
use resource_table_lib::channel::ChannelConfig;
use resource_table_lib::channel::ModalPresenter;
use resource_table_lib::channel::Notice;
use resource_table_lib::channel::NotificationChannel;
use resource_table_lib::channel::Presentation;
use resource_table_lib::channel::Presenter;
use resource_table_lib::channel::WebSocketSource;
use resource_table_lib::model::PathList;
use resource_table_lib::model::PathMove;
use resource_table_lib::model::ResourceItem;
use resource_table_lib::model::ResourceName;
use resource_table_lib::model::Row;
use resource_table_lib::model::TableField;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

type Error = Box<dyn std::error::Error>;
type Controller = TableController<HttpTableApi, Arc<InMemoryAddress>>;

#[derive(Parser)]
#[command(name = "resource-table")]
#[command(about = "Browse and edit a paginated resource table")]
struct Cli {
    /// Server base URL
    #[arg(long, default_value = "http://localhost:3000")]
    base_url: String,

    /// Resource kind to browse
    #[arg(long, short, default_value = "users")]
    resource: String,

    /// Initial address query string (e.g. "paths=name:0:asc,age")
    #[arg(long, short, default_value = "")]
    query: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<String>,

    /// Log at debug level
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the table and print its rows
    Table {
        /// Keep loading pages until none are pending
        #[arg(long)]
        all: bool,
    },
    /// Cycle a column through ascending, descending and unsorted
    Toggle { path: String },
    /// Move a column between or within the path lists
    Reorder {
        #[arg(value_enum)]
        from: List,
        from_index: usize,
        #[arg(value_enum)]
        to: List,
        to_index: usize,
    },
    /// Set or clear a column filter (a regular expression)
    Filter { path: String, expression: Option<String> },
    /// Edit one field of a resource
    Patch {
        id: String,
        path: String,
        /// New value as JSON; bare words are taken as strings
        value: String,
    },
    /// Toggle selection of a resource
    Select { id: String },
    /// Listen for server notifications; press Enter to dismiss each one
    Listen {
        #[arg(long, default_value = "ws://localhost:8080")]
        ws_url: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum List {
    Primary,
    Secondary,
}

impl From<List> for PathList {
    fn from(list: List) -> Self {
        match list {
            List::Primary => PathList::Primary,
            List::Secondary => PathList::Secondary,
        }
    }
}

/// Prints fetch alerts to stderr and returns at once.
///
/// Every subcommand except `listen` runs unattended, so an alert never waits
/// for a keypress; the failing operation still returns its error and the
/// process exits non-zero.
struct ConsolePresenter;

#[async_trait]
impl Presenter for ConsolePresenter {
    async fn present(&self, notice: Notice) {
        eprintln!("[{:?}] {}", notice.kind, notice.body);
    }

    fn banner(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn init_logging(cli: &Cli) -> Result<(), Error> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match &cli.log_file {
        Some(path) => WriteLogger::init(level, Config::default(), File::create(path)?)?,
        None => TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?,
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    init_logging(&cli)?;

    if let Commands::Listen { ws_url } = &cli.command {
        return listen(ws_url).await;
    }

    let api = HttpTableApi::builder().url(&cli.base_url).build()?;
    let address = Arc::new(InMemoryAddress::from_query(&cli.query));
    let controller: Controller =
        TableController::builder(ResourceName::new(&cli.resource), api, Arc::clone(&address))
            .alerts(ConsolePresenter)
            .build();
    controller.navigate().await?;

    match cli.command {
        Commands::Table { all } => {
            if all {
                controller.load_all().await?;
            }
        }
        Commands::Toggle { path } => controller.toggle_path(&path).await?,
        Commands::Reorder {
            from,
            from_index,
            to,
            to_index,
        } => {
            let mv = PathMove::transfer(from.into(), from_index, to.into(), to_index);
            controller.reorder_paths(mv).await?
        }
        Commands::Filter { path, expression } => {
            controller.set_column_filter(&path, expression).await?
        }
        Commands::Patch { id, path, value } => {
            let value = serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
            let item = controller.patch_field(TableField::new(id, path, value)).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        Commands::Select { id } => {
            let selected = controller
                .toggle_selection(&Row::Item(ResourceItem::new(id.clone())), None)
                .await?;
            info!("{id} is {}", if selected { "selected" } else { "deselected" });
        }
        Commands::Listen { .. } => {}
    }

    print_table(&controller)?;
    println!("?{}", address.current().to_query());
    Ok(())
}

fn print_table(controller: &Controller) -> Result<(), Error> {
    if let Some(table) = controller.table() {
        let header: Vec<&str> = table
            .layout()
            .visible_columns()
            .iter()
            .map(|c| c.path.as_str())
            .collect();
        println!("# {}", header.join("\t"));
    }
    for row in controller.rows().borrow().iter() {
        if let Some(item) = row.item() {
            println!("{}", serde_json::to_string(item)?);
        } else if let Some(token) = row.placeholder_token() {
            println!("... ({token})");
        }
    }
    Ok(())
}

async fn listen(ws_url: &str) -> Result<(), Error> {
    let (presenter, mut view) = ModalPresenter::channel();
    let channel = NotificationChannel::new(ChannelConfig::new(ws_url), WebSocketSource::new(), presenter);
    let mut running = tokio::spawn(async move { channel.run().await });
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            presentation = view.next() => match presentation {
                Some(Presentation::Modal(modal)) => {
                    println!("[{:?}] {}", modal.notice().kind, modal.notice().body);
                    println!("(press Enter to dismiss)");
                    stdin.next_line().await?;
                    modal.dismiss();
                }
                Some(Presentation::Banner(text)) => println!("{text}"),
                None => break,
            },
            result = &mut running => {
                let err = result?;
                return Err(err.into());
            }
        }
    }
    Ok(())
}
