use crawlmap::crawler::{CrawlEvent, Crawler, CrawlerOptions, StructuredFormatter};
use crawlmap::utils::{Address, DesiredType, Sanitize, Terminal};
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn init_logging() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}

#[tokio::main]
async fn main() {
    init_logging();

    println!("------------------------------------------------------------");
    println!("                         CRAWLMAP                           ");
    println!("          concurrent web crawler over raw TCP               ");
    println!("                     VERSION:  0.1.0                        ");
    println!("------------------------------------------------------------");

    let seed = loop {
        let input = Terminal::ask(
            "Input the seed url: ",
            &[Sanitize::IsType(DesiredType::String)],
        );
        match Address::parse(&input.answer) {
            Ok(address) => break address,
            Err(e) => eprintln!("{}", e),
        }
    };

    let workers = Terminal::ask(
        "Input the worker count (1-32): ",
        &[
            Sanitize::IsType(DesiredType::Usize),
            Sanitize::IsBetween(1, 32),
        ],
    );
    let worker_count: usize = workers.answer.trim().parse().unwrap_or(3);

    info!("starting crawl at {} with {} workers", seed, worker_count);

    let crawler = Crawler::<StructuredFormatter>::new()
        .with_options(CrawlerOptions {
            worker_count,
            ..CrawlerOptions::default()
        })
        .build();

    let Some(mut events) = crawler.events().await else {
        eprintln!("event channel unavailable");
        return;
    };

    match crawler.add_seed(seed.as_str()) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("seed was already admitted");
            return;
        }
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    }

    crawler.start();

    // The idle event only goes out while `await_idle` runs, so the
    // printing loop has to drain concurrently with it.
    let printer = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            match event {
                CrawlEvent::Crawled { address } => println!("Crawled: {}", address),
                CrawlEvent::FetchFailed { address, reason } => {
                    println!("Failed: {} ({})", address, reason)
                }
                CrawlEvent::Idle => break,
            }
        }
    });

    crawler.await_idle().await;
    let _ = printer.await;
    crawler.shutdown_graceful().await;

    println!("Crawl complete: {} addresses discovered", crawler.discovered());
}
