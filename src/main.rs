use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use digitscriber::draw::extract_sample;
use digitscriber::inference::{FeatureMode, HttpTransport, PredictionManager};
use digitscriber::input::StrokeScript;
use digitscriber::{App, AppOptions, Config, ui};

#[derive(Parser, Debug)]
#[command(name = "digitscriber")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DIGITSCRIBER_GIT_HASH"), ")"),
    about = "Handwritten digit sketch pad backed by a remote classifier"
)]
struct Cli {
    /// Stroke script (JSON) to replay onto the drawing surface
    #[arg(long, short = 's', value_name = "FILE")]
    strokes: Option<PathBuf>,

    /// Image file to load onto the surface (applied after strokes)
    #[arg(long, short = 'i', value_name = "FILE")]
    image: Option<PathBuf>,

    /// Feature mode sent with the sample (defaults to the config value)
    #[arg(long, short = 'f', value_enum, value_name = "MODE")]
    feature: Option<FeatureMode>,

    /// Classifier endpoint, overriding the config file
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Print the 28x28 sample before sending it
    #[arg(long)]
    preview: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let endpoint = cli
        .endpoint
        .clone()
        .unwrap_or_else(|| config.inference.endpoint.clone());
    let transport = HttpTransport::new(&endpoint, config.connect_timeout())?;
    log::info!("Using classifier at {}", transport.endpoint());

    let manager = PredictionManager::new(runtime.handle(), Arc::new(transport));
    let mut app = App::new(AppOptions::from_config(&config), manager)?;
    if let Some(mode) = cli.feature {
        app.select_feature(mode);
    }

    runtime.block_on(run(&cli, &mut app))
}

async fn run(cli: &Cli, app: &mut App) -> anyhow::Result<ExitCode> {
    if let Some(path) = &cli.strokes {
        let script = StrokeScript::from_path(path)?;
        app.replay(&script)?;
    }

    if let Some(path) = &cli.image {
        app.load_image(Some(path.as_path()))
            .await
            .with_context(|| format!("Could not load {}", path.display()))?;
    }

    if cli.preview {
        let sample = extract_sample(app.surface())?;
        print!("{}", ui::sample_preview(&sample));
    }

    app.predict()?;
    app.wait_for_outcome().await;

    let session = app.session();
    if let Some(error) = session.error() {
        eprintln!("{}", error);
        return Ok(ExitCode::FAILURE);
    }

    match session.result() {
        Some(result) => {
            println!(
                "Prediction: {} ({:.1}%) using {}",
                result.label,
                result.confidence,
                session.feature_mode().display_name()
            );
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No prediction received");
            Ok(ExitCode::FAILURE)
        }
    }
}
