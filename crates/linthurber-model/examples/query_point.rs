//! Example: Query Vp, Vs and density at one point.
//!
//! Usage: cargo run --example query_point -- <lon> <lat> <depth_m> [base_dir] [label]
//!
//! Set `RUST_LOG=linthurber_model=debug` to see the load log.

use linthurber_model::{GeoPoint, VelocityModel};
use std::env;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: {} <lon> <lat> <depth_m> [base_dir] [label]", args[0]);
        eprintln!("Example: {} -121.5 36.5 1000 /opt/ucvm linthurber", args[0]);
        std::process::exit(1);
    }

    let lon: f64 = args[1].parse().expect("Invalid longitude");
    let lat: f64 = args[2].parse().expect("Invalid latitude");
    let depth: f64 = args[3].parse().expect("Invalid depth");
    let base_dir = args.get(4).map(|s| s.as_str()).unwrap_or(".");
    let label = args.get(5).map(|s| s.as_str()).unwrap_or("linthurber");

    println!("Loading {} model from {}...", VelocityModel::version(), base_dir);
    let start = Instant::now();

    let model = match VelocityModel::init(base_dir, label) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("{} (loaded in {:.3}s)", model.config_summary(), start.elapsed().as_secs_f64());

    let props = model.query_point(&GeoPoint::new(lon, lat, depth));
    if props.is_unknown() {
        println!("({}, {}, {} m) is outside the model", lon, lat, depth);
    } else {
        println!(
            "vp = {:.1} m/s, vs = {:.1} m/s, rho = {:.1} kg/m^3",
            props.vp, props.vs, props.rho
        );
    }

    if let Err(e) = model.finalize() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
