use anyhow::{Context, Result, ensure};
use bandcamp_collection::bandcamp;
use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(version, author, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shows the fan the identity cookie belongs to
    Fan {
        #[command(flatten)]
        session: Session,
    },

    /// Lists purchased items with their tracks and download links
    Collection {
        #[command(flatten)]
        session: Session,
    },

    /// Lists wishlisted items with their tracks
    Wishlist {
        #[command(flatten)]
        session: Session,
    },

    /// Totals the cost of the collection in a currency
    Value {
        #[command(flatten)]
        session: Session,

        /// Currency to report the total in (e.g. `USD`)
        currency: String,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate the completions for
        #[arg(value_enum)]
        shell: clap_complete_command::Shell,
    },
}

#[derive(Args)]
struct Session {
    /// Value of the Bandcamp `identity` login cookie
    #[arg(short = 'I', long, env = "BANDCAMP_IDENTITY", hide_env_values = true)]
    identity: String,

    /// Bandcamp site to talk to
    #[arg(long, default_value = bandcamp::DEFAULT_SITE)]
    site: String,
}

impl Session {
    fn client(&self) -> Result<bandcamp::Client> {
        ensure!(
            bandcamp::validate_identity(&self.identity),
            "invalid identity cookie",
        );
        Ok(bandcamp::Client::with_site(&self.identity, &self.site)?)
    }
}

fn print_items(collection: &bandcamp::Collection) {
    for item in collection {
        println!("{item} \"{}\" by {}", item.title, item.band_name);
        if let Some(purchased) = item.purchased.as_datetime() {
            println!("  purchased {} ({})", purchased.format("%Y-%m-%d"), item.sale);
        }
        if item.price > 0.0 {
            println!("  {:.2} {}", item.price, item.currency);
        }
        if !item.download.is_empty() {
            println!("  {}", item.download);
        }
        for track in &item.tracks {
            if track.number > 0 {
                println!("  #{} {}", track.number, track.title);
            } else {
                println!("  {}", track.title);
            }
        }
    }
    println!("{} items", collection.len());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bandcamp_collection=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fan { session } => {
            let fan = session.client()?.fan().await?;
            println!("{} ({})", fan.username, fan.id);
            println!("{}", fan.url);
        }
        Commands::Collection { session } => {
            let client = session.client()?;
            let fan = client.fan().await?;
            let collection = client
                .collection(fan.id)
                .await
                .with_context(|| format!("failed to fetch collection of {}", fan.username))?;
            print_items(&collection);
        }
        Commands::Wishlist { session } => {
            let client = session.client()?;
            let fan = client.fan().await?;
            let wishlist = client
                .wishlist(fan.id)
                .await
                .with_context(|| format!("failed to fetch wishlist of {}", fan.username))?;
            print_items(&wishlist);
        }
        Commands::Value { session, currency } => {
            ensure!(bandcamp::validate_currency(&currency), "invalid currency");
            let client = session.client()?;
            let fan = client.fan().await?;
            let collection = client.collection(fan.id).await?;
            let total = client.value(&fan, &collection, &currency).await?;
            println!(
                "{:.2} {currency} across {} items",
                total,
                collection.len(),
            );
        }
        Commands::Completions { shell } => {
            shell.generate(&mut Cli::command(), &mut std::io::stdout());
        }
    }
    Ok(())
}
