// This is the Lambda bootstrap entry point for the web application

use lambda_runtime::{Error, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    hello_layer::setup_logging();

    // Build the route table before the first event arrives
    let app = hello_layer::app::application();
    tracing::info!(routes = app.route_count(), "Application initialized");

    run(service_fn(hello_layer::api::handler)).await
}
