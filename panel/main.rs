/// squarefit panel
///
/// Browser front end for the x² training run: one button that starts the
/// run and one text panel that fills with the transcript as it streams in.
/// Served by a synchronous tiny_http server.
///
/// Run with:
///   cargo run --bin panel --release
/// Then open http://127.0.0.1:7878

mod handlers;
mod render;
mod routes;
mod state;
mod util;

use std::env;

use anyhow::{anyhow, bail, Context};
use getopts::Options;
use log::info;
use tiny_http::Server;

use squarefit::RunConfig;

const DEFAULT_ADDR: &str = "127.0.0.1:7878";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let mut opts = Options::new();
    opts.optopt("a", "addr", "address to listen on (default 127.0.0.1:7878)", "HOST:PORT");
    opts.optopt("c", "config", "read the run configuration from a JSON file", "FILE");
    opts.optflag("h", "help", "print this help");

    let brief = format!("Usage: {} [options]", args[0]);
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => bail!("{}\n\n{}", e, opts.usage(&brief)),
    };
    if matches.opt_present("h") {
        print!("{}", opts.usage(&brief));
        return Ok(());
    }

    let config = match matches.opt_str("c") {
        Some(path) => RunConfig::load_json(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => RunConfig::default(),
    };
    config.validate().context("invalid configuration")?;

    let addr = matches.opt_str("a").unwrap_or_else(|| DEFAULT_ADDR.to_owned());
    let server = Server::http(addr.as_str()).map_err(|e| anyhow!("failed to bind {}: {}", addr, e))?;
    let shared_state = state::new_shared(config);

    info!("panel listening on http://{}", addr);

    // One thread per request: the event stream blocks for the whole run.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    Ok(())
}
