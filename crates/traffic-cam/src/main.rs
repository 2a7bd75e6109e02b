use clap::Parser;
use tracing::{debug, error, info};

use traffic_cam::{
    Result, commands,
    config::{Args, Command, Config, check_and_create_config},
    logging,
    sink::local::LocalImageSink,
};
use traffic_cam_client::TrafficCamClient;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args<Config> = Args::parse();

    // Only prompt for config setup if no config file was provided via --config
    if args.config.is_none() {
        check_and_create_config()
            .await
            .inspect_err(|err| error!(err = ?err, "Error checking for (or creating) config"))?;
    }

    let config = args
        .get_config()
        .inspect_err(|err| error!(err = ?err, "Error getting config"))?;

    logging::init_logging(config.logging.clone())?;
    debug!(base_url = %config.client.base_url, "Parsed config successfully");

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let mut client = TrafficCamClient::new(config.client.clone())?;
    let sink = LocalImageSink::new(config.images.clone());

    match args.command {
        Command::Cameras {
            bounds,
            max,
            images,
        } => {
            let max_results = max.unwrap_or(config.query.max_results);
            let sink = images.then_some(&sink as &dyn traffic_cam::sink::ImageSink);
            let parallel_fetches = config.images.parallel_fetches;
            commands::list_cameras(&mut client, bounds.into(), max_results, sink, parallel_fetches)
                .await
                .inspect_err(|err| error!(err = ?err, "Camera listing failed"))?;
        }
        Command::Snapshot { bounds, id } => {
            commands::snapshot(&mut client, bounds.into(), id, &sink)
                .await
                .inspect_err(|err| error!(err = ?err, camera_id = id, "Snapshot failed"))?;
        }
    }

    Ok(())
}
