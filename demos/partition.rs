//! End-to-end decomposition demo.
//!
//! Carves a symmetric pair and a single block out of a unit cube and
//! prints the resulting components.
//!
//! ```text
//! cargo run --example partition
//! RUST_LOG=volcut=debug cargo run --example partition   # matching trace
//! ```

use volcut::math::Aabb;
use volcut::{
    BoxComplexKernel, CutChoice, CutRequest, MeshKernel, SearchConfig, SequenceDriver,
};

fn main() -> volcut::Result<()> {
    // Default: INFO for volcut. Override with RUST_LOG.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("volcut=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut kernel = BoxComplexKernel::new();
    let body = kernel.make_box(&Aabb::from_coords(0.0, 0.0, 0.0, 1.0, 1.0, 1.0));

    let requests = [
        CutRequest {
            volume_fraction: 0.18,
            aspect: [2.0, 1.0, 1.0],
            symmetric: true,
            name: Some("upper_arm".into()),
        },
        CutRequest {
            volume_fraction: 0.1,
            aspect: [1.0, 1.0, 1.0],
            symmetric: false,
            name: Some("head".into()),
        },
    ];

    let mut driver = SequenceDriver::new(&mut kernel, SearchConfig::default());
    let outcomes = driver.run(body, &requests, &[CutChoice::Best, CutChoice::Best])?;
    drop(driver);

    for outcome in &outcomes {
        for piece in &outcome.pieces {
            let label = match piece.side {
                Some(side) => format!("{}_{}", outcome.name, side.suffix()),
                None => outcome.name.clone(),
            };
            let dims = kernel.bounding_box(piece.solid)?.dims();
            println!(
                "{label}: score {:.3}, est fraction {:.3}, {:.2} x {:.2} x {:.2}",
                piece.score, piece.estimated_fraction, dims.x, dims.y, dims.z
            );
        }
    }
    println!("remaining volume: {:.3}", kernel.volume(body)?);
    Ok(())
}
