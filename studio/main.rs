/// leafscan Studio
///
/// Single-page browser front end: upload a leaf photo, get a diagnosis,
/// severity and treatment. Served by a synchronous tiny_http server; no
/// JavaScript required.
///
/// Run with:
///   cargo run --bin studio --release -- --model models/plant_disease.json
/// Then open http://127.0.0.1:7878

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tiny_http::Server;
use tracing::info;

use leafscan::{Classifier, DiagnosisPipeline, NetworkClassifier};
use state::StudioState;

#[derive(Parser, Debug)]
#[command(name = "studio")]
#[command(version)]
#[command(about = "Local web front end for leaf disease diagnosis")]
struct Cli {
    /// Model artifact (JSON network), loaded once at startup
    #[arg(short, long, env = "LEAFSCAN_MODEL", default_value = "models/plant_disease.json")]
    model: PathBuf,

    /// Address to listen on
    #[arg(short, long, env = "LEAFSCAN_ADDR", default_value = "127.0.0.1:7878")]
    addr: String,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    leafscan::logging::init_logging(cli.verbose)?;

    // A model that cannot be loaded is fatal: no request is ever served without one.
    let classifier: Box<dyn Classifier> = Box::new(
        NetworkClassifier::load(&cli.model)
            .with_context(|| format!("loading model {}", cli.model.display()))?,
    );
    let pipeline = DiagnosisPipeline::plant_disease(classifier)?;
    let state = StudioState::new(pipeline, cli.model.display().to_string());

    let server = Server::http(&cli.addr)
        .map_err(|e| anyhow!("failed to bind {}: {}", cli.addr, e))?;
    info!(addr = %cli.addr, "studio listening, open http://{}", cli.addr);

    // One request at a time: each upload runs the whole pipeline before the
    // next request is read, and the model is never used concurrently.
    for request in server.incoming_requests() {
        routes::dispatch(request, &state);
    }
    Ok(())
}
