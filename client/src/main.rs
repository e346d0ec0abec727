use clap::Parser;
use client::input::spawn_stdin_reader;
use client::network::Client;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, env = "CODEBREAKER_ADDR", default_value = shared::DEFAULT_SERVER_ADDR)]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    info!("Connecting to: {}", args.server);
    let mut client = Client::connect(&args.server).await?;

    client
        .run(spawn_stdin_reader(), &mut std::io::stdout())
        .await
}
