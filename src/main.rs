use anyhow::Context;
use clap::Parser;
use picsum_gallery::config::Command;
use picsum_gallery::utils::error::ErrorSeverity;
use picsum_gallery::utils::{logger, validation::Validate};
use picsum_gallery::{
    CliConfig, DetailResolver, GalleryConfig, GalleryError, GallerySession, LoadOutcome, Photo,
    PicsumClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting picsum-gallery");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.load_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    let client = PicsumClient::new(&config.source).context("building HTTP client")?;

    let result = match &cli.command {
        Command::List { pages, json } => list(client, &config, *pages, *json).await,
        Command::Show { id, json } => show(client, &config, id, *json).await,
    };

    if let Err(e) = result {
        fail(e);
    }
    Ok(())
}

async fn list(
    client: PicsumClient,
    config: &GalleryConfig,
    pages: u32,
    json: bool,
) -> picsum_gallery::Result<()> {
    let session = GallerySession::new(client, config);
    session.start().await?;

    for _ in 1..pages {
        match session.request_next_page().await {
            LoadOutcome::Advanced { page, fetched } => {
                tracing::debug!("Page {} added {} records", page, fetched);
            }
            LoadOutcome::Failed { page, message } => {
                tracing::warn!("Stopped at page {}: {}", page, message);
                break;
            }
            _ => break,
        }
    }

    let photos = session.photos();
    if json {
        println!("{}", serde_json::to_string_pretty(&photos)?);
    } else {
        for photo in &photos {
            print_card(photo);
        }
        let view = session.view();
        for line in view.summary() {
            println!("{}", line);
        }
        if view.pagination.has_more && !session.more_available().await {
            println!("No further pages reported by the photo API");
        }
    }
    Ok(())
}

async fn show(
    client: PicsumClient,
    config: &GalleryConfig,
    id: &str,
    json: bool,
) -> picsum_gallery::Result<()> {
    let resolver = DetailResolver::new(client, &config.source, config.detail.clone());
    let photo = resolver.find(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&photo)?);
    } else {
        println!("Photo #{}", photo.id);
        println!("{}", photo.title);
        println!("Photographer: {}", photo.author);
        println!("Size: {}x{}", photo.width, photo.height);
        println!("Image: {}", photo.full_url);
        println!("Source: {}", photo.url);
        println!();
        println!("{}", photo.description);
    }
    Ok(())
}

fn print_card(photo: &Photo) {
    println!(
        "#{:<6} {:<28} {:>5}x{:<5} {}",
        photo.id, photo.author, photo.width, photo.height, photo.thumbnail_url
    );
}

fn fail(e: GalleryError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
