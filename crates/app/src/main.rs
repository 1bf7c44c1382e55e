mod args;
mod logging;
mod terminal;
mod vm;

use log::info;
use services::{AppServices, Clock};

use crate::args::{Args, Command, Store, ensure_db_dir, print_usage};

async fn build_services(args: &Args) -> Result<AppServices, Box<dyn std::error::Error>> {
    let clock = Clock::default();
    let services = match &args.store {
        Store::Memory => AppServices::new_in_memory(clock, args.questions.clone()).await?,
        Store::Sqlite(db_url) => {
            ensure_db_dir(db_url)?;
            AppServices::new_sqlite(db_url, clock, args.questions.clone()).await?
        }
    };
    Ok(services)
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.command == Command::Help {
        print_usage();
        return Ok(());
    }

    logging::init_file_logger(&args.log_file, args.log_level);
    info!("quiz starting: {:?} ({:?})", args.command, args.store);

    let services = build_services(&args).await?;

    match args.command {
        Command::Play => {
            if !services.remote_enabled() {
                println!("No question source configured; set QUIZ_QUESTIONS_URL to fetch questions.");
            }
            terminal::run_play(&services).await?;
        }
        Command::History => {
            let ledger = services.ledger();
            println!("{}", vm::render_history(&ledger.records().await));
            let unreadable = ledger.unreadable_count().await;
            if unreadable > 0 {
                println!("  ({unreadable} older entries could not be read; they are kept as-is)");
            }
        }
        Command::ClearHistory => {
            let report = services.ledger().clear().await;
            println!("{}", vm::clear_message(&report));
        }
        Command::Help => print_usage(),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = run(args).await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
