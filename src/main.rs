mod app;
mod components;
mod error;
mod message;
mod model;
mod sample;
mod utils;
mod views;

use crate::app::Capabilities;
use crate::sample::{SampleDatabase, SampleFitter, SampleLoader};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Site deployments wire their own database client, raw loader, and
    // fitter here; the sample capabilities make the app usable without one.
    let caps = Capabilities {
        query: Some(Arc::new(SampleDatabase::seeded())),
        loader: Arc::new(SampleLoader),
        fitter: Arc::new(SampleFitter::default()),
    };
    app::run(caps)
}
