use reqwest::Client;
use tracing::{error, info};

use bookshelf_client::config::ClientConfig;
use bookshelf_client::error::ClientError;
use bookshelf_client::models::book::BookSummary;
use bookshelf_client::models::shelf::{MutationOutcome, ShelfEntry};
use bookshelf_client::services::discovery::{DiscoveryController, ResultSink};
use bookshelf_client::services::shelf::ShelfStore;

struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn show_results(&self, books: &[BookSummary]) {
        if books.is_empty() {
            println!("No books found.");
            return;
        }
        for (position, book) in books.iter().enumerate() {
            println!(
                "{}. {} - {} ({})",
                position + 1,
                book.display_title(),
                book.display_authors(),
                book.display_year()
            );
            println!("   cover: {}", book.cover_or_placeholder());
            if let Some(id) = &book.id {
                println!("   id: {id}");
            }
        }
    }

    fn show_suggestion(&self, book: &BookSummary) {
        println!("We have a suggestion for you!");
        println!(
            "{} - {} ({})",
            book.display_title(),
            book.display_authors(),
            book.display_year()
        );
        println!("cover: {}", book.cover_or_placeholder());
        match &book.id {
            Some(id) => println!(
                "Add it with: bookshelf-client shelf add {id} \"{}\" <status>",
                book.display_authors()
            ),
            None => println!("The server did not return an id for this book, so it cannot be shelved."),
        }
    }

    fn show_shelf(&self, entries: &[ShelfEntry]) {
        if entries.is_empty() {
            println!("Your shelf is empty. Search for books and add them!");
            return;
        }
        for entry in entries {
            println!(
                "{} - {} [{}]",
                entry.display_title(),
                entry.display_author(),
                entry.status
            );
            println!("   id: {}", entry.id);
            println!("   cover: {}", entry.cover_or_placeholder());
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}

fn usage() -> ! {
    info!(
        "Usage: bookshelf-client search <term> | suggest | shelf list | \
         shelf add <id> <author> <status> | shelf update <id> <status> | shelf remove <id>"
    );
    std::process::exit(1);
}

fn apply_mutation(result: Result<MutationOutcome, ClientError>, sink: &ConsoleSink) {
    match result {
        Ok(outcome) => {
            info!("{}", outcome.message);
            sink.show_shelf(&outcome.shelf);
        }
        Err(err) => sink.show_error(&err.to_string()),
    }
}

async fn run_shelf_command(shelf: &ShelfStore, sink: &ConsoleSink, args: &[String]) {
    match args.first().map(String::as_str) {
        Some("list") => match shelf.list().await {
            Ok(entries) => sink.show_shelf(&entries),
            Err(err) => sink.show_error(&err.to_string()),
        },
        Some("add") => {
            let (Some(id), Some(author), Some(status)) = (args.get(1), args.get(2), args.get(3))
            else {
                error!("shelf add needs <id> <author> <status>");
                usage();
            };
            apply_mutation(shelf.add(id, author, status).await, sink);
        }
        Some("update") => {
            let (Some(id), Some(status)) = (args.get(1), args.get(2)) else {
                error!("shelf update needs <id> <status>");
                usage();
            };
            apply_mutation(shelf.update(id, status).await, sink);
        }
        Some("remove") => {
            let Some(id) = args.get(1) else {
                error!("shelf remove needs <id>");
                usage();
            };
            apply_mutation(shelf.remove(id).await, sink);
        }
        _ => {
            error!("Unknown shelf command");
            usage();
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("bookshelf_client=info")
        .init();

    let config = ClientConfig::from_env();
    let http = Client::new();
    let controller = DiscoveryController::new(http.clone(), config.clone());
    let shelf = ShelfStore::new(http, config.base_url.clone());
    let sink = ConsoleSink;

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("search") => {
            let term = args[2..].join(" ");
            controller.run_search(&term, &sink).await;
        }
        Some("suggest") => controller.run_suggest(&sink).await,
        Some("shelf") => run_shelf_command(&shelf, &sink, &args[2..]).await,
        _ => {
            error!("Missing or unknown command");
            usage();
        }
    }
}
