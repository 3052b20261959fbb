#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI for the landcover map toolchain.
//!
//! Provides a unified entry point that lets users either run ROI
//! analyses from the terminal (year + ROI selection, per-class area
//! table) or start the API server that backs the map frontend.

mod analysis;

use dialoguer::Select;

/// Top-level tool selection for the landcover map toolchain.
enum Tool {
    Analyze,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::Analyze, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Analyze => "Analyze a region",
            Self::Server => "Start server",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    println!("Landcover Map Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Analyze => analysis::run().await?,
        Tool::Server => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(landcover_map_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}
