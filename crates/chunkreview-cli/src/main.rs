// ChunkReview CLI entry point

use clap::Parser;

use chunkreview_cli::{app, logging, output::OutputStyle, Cli};

#[tokio::main]
async fn main() {
    // A missing .env file is not an error
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let style = OutputStyle::default();
    match app::run(&cli).await {
        Ok(report) => println!("{}", report),
        Err(e) => {
            eprintln!("{}", style.error(&e.user_message()));
            if cli.verbose {
                eprintln!("{}", e.technical_details());
            }
            std::process::exit(e.exit_code());
        }
    }
}
