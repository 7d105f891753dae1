use company_directory::config::Config;
use company_directory::contact::handlers::Submitter;
use company_directory::directory::listing::Directory;
use company_directory::directory::session::{DirectorySession, FilterReport, UiEvent};
use company_directory::loader::service::Loader;
use company_directory::web::handlers::AppState;
use company_directory::web::router;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        eprintln!("Usage: {} [--interactive]", args[0]);
        eprintln!("Environment: DIRECTORY_ENDPOINT, DIRECTORY_BIND, DIRECTORY_DEBOUNCE_MS,");
        eprintln!("             DIRECTORY_CALLBACK_TIMEOUT_MS, DIRECTORY_SUBJECT");
        return Ok(());
    }

    let config = Config::from_env()?;

    match &config.endpoint {
        Some(endpoint) => tracing::info!("Listing endpoint: {}", endpoint),
        None => tracing::warn!("DIRECTORY_ENDPOINT is not set, the listing will fail to load"),
    }

    let client = reqwest::Client::new();

    if args.iter().any(|arg| arg == "--interactive") {
        return run_interactive(&config, client).await;
    }

    let state = AppState {
        loader: Arc::new(Loader::from_config(&config, client.clone())),
        submitter: Submitter::from_config(&config, client),
    };

    let app = router(state);

    tracing::info!("Directory listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Terminal front end: each stdin line is search input (debounced),
/// `:category <name>` switches tabs and `:clear` empties the search.
async fn run_interactive(config: &Config, client: reqwest::Client) -> anyhow::Result<()> {
    let loader = Loader::from_config(config, client);
    let directory = Directory::from_load(loader.load_companies().await);
    let session = DirectorySession::spawn(directory, config.debounce);

    print_report(&session.latest());

    let mut reports = session.subscribe();
    let printer = tokio::spawn(async move {
        while reports.changed().await.is_ok() {
            let report = reports.borrow_and_update().clone();
            print_report(&report);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let event = if let Some(category) = line.strip_prefix(":category ") {
            UiEvent::SelectCategory(category.trim().to_string())
        } else if line.trim() == ":clear" {
            UiEvent::ClearSearch
        } else {
            UiEvent::SearchInput(line)
        };

        if session.send(event).await.is_err() {
            break;
        }
    }

    session.shutdown().await;
    let _ = printer.await;
    Ok(())
}

fn print_report(report: &FilterReport) {
    if let Some(error) = &report.load_error {
        println!("{}", error);
        return;
    }
    if let Some(label) = &report.result_label {
        println!("{}", label);
    }
    for view in report.views.iter().filter(|view| view.is_visible) {
        println!(
            "  [{}] {} - {}",
            view.record.category, view.displayed_name, view.displayed_message
        );
    }
}
