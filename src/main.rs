use log::{error, info, LevelFilter};

async fn run() -> Result<(), rocket::Error> {
    info!("Configuring server...");
    let rocket = tripvote_backend::build().ignite().await?;
    info!("...server configured!");
    // Rocket's own launch logging is noise next to the logger fairing;
    // silence it from here on.
    log4rs_dynamic_filters::DynamicLevelFilter::set("rocket", LevelFilter::Off);
    let _ = rocket.launch().await?;
    Ok(())
}

#[rocket::main]
async fn main() {
    // Set up logging.
    log4rs::init_file("log4rs.yaml", log4rs_dynamic_filters::default_deserializers())
        .expect("Failed to initialise logging");
    info!("Initialised logging");

    // Launch server.
    if let Err(err) = run().await {
        error!("{err}");
        error!("Critical failure, shutting down");
        std::process::exit(1)
    }
}
