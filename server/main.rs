/// ironsight serve
///
/// A small synchronous HTTP service that answers image classification
/// requests with a pretrained model. One model is loaded and validated at
/// startup; every request after that is read-only, so the server spawns a
/// plain thread per request and shares the classifier behind an `Arc`
/// without any locking.
///
/// Run with:
///   cargo run --bin serve --release -- --model fashion.json
/// Then:
///   curl -F "file=@shirt.png" http://127.0.0.1:8000/predict

mod handlers;
mod multipart;
mod routes;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::info;
use tiny_http::Server;

use ironsight::Classifier;

#[derive(Debug, Parser)]
#[command(name = "serve", about = "Serve a pretrained image classifier over HTTP")]
struct ServeArgs {
    /// Path to the model weight file (JSON)
    #[arg(long)]
    model: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,
}

// `Server::http` hands back a `Box<dyn Error + Send + Sync>`, which only
// converts into an equally wide error box.
fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    env_logger::init();
    let args = ServeArgs::parse();

    // Fail fast: a model that cannot be loaded and validated should stop
    // the process here, not surface as 500s later.
    let classifier = Arc::new(Classifier::load(&args.model)?);
    info!(
        "loaded model from {}: {}",
        args.model.display(),
        classifier.describe()
    );

    let server = Server::http(&args.addr)?;
    info!("listening on http://{}", args.addr);

    for request in server.incoming_requests() {
        let ctx = Arc::clone(&classifier);
        std::thread::spawn(move || {
            routes::dispatch(request, &ctx);
        });
    }

    Ok(())
}
