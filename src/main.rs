use clap::Parser;
use exam_prep::{export_answer_sheet, logging, print_stats_report, Args, Command, Config, Quiz};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = Config::from(&args);

    let guard = match logging::init(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let result = match &args.command {
        None => Quiz::from_config(&config).run().await,
        Some(Command::Export { output }) => export_answer_sheet(&config.source, output.as_deref())
            .await
            .map(|_| ()),
        Some(Command::Stats) => print_stats_report(&config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("Error: {}", e);
        drop(guard);
        std::process::exit(1);
    }
}
