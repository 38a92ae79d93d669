use mapmode::{IPoint, MappingMode, SurfaceStore};
use std::error::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_JSON: &str = r#"
    {
        "device_caps": {
            "horz_size_mm": 320,
            "vert_size_mm": 240,
            "horz_res": 1024,
            "vert_res": 768
        },
        "map_mode": "isotropic",
        "window_ext": { "cx": 1000, "cy": 1000 },
        "viewport_ext": { "cx": 1024, "cy": -768 },
        "viewport_org": { "x": 512, "y": 384 }
    }
"#;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapmode=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Usage: mapmode [surface.json]
    let json_text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEMO_JSON.to_string(),
    };

    let store = SurfaceStore::new();
    let h = store.create_from_json(&json_text)?;

    let logical = vec![
        IPoint::new(0, 0),
        IPoint::new(500, 500),
        IPoint::new(-500, -500),
        IPoint::new(1000, 0),
    ];
    let mut device = logical.clone();
    store.lp_to_dp(h, &mut device)?;
    let mut back = device.clone();
    store.dp_to_lp(h, &mut back)?;

    println!("mode {:?}", store.map_mode(h)?);
    println!("window ext {:?} viewport ext {:?}", store.window_ext(h)?, store.viewport_ext(h)?);
    for ((l, d), b) in logical.iter().zip(&device).zip(&back) {
        println!("  logical ({:>5}, {:>5}) -> device ({:>5}, {:>5}) -> logical ({:>5}, {:>5})", l.x, l.y, d.x, d.y, b.x, b.y);
    }

    // Same points under each fixed preset, viewport origin unchanged.
    println!();
    for mode in MappingMode::ALL.into_iter().filter(|m| !m.has_adjustable_extents()) {
        store.set_mapping_mode(h, mode)?;
        let mut pts = logical.clone();
        store.lp_to_dp(h, &mut pts)?;
        println!("{mode:?}: {pts:?}");
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&store.snapshot(h)?)?);
    Ok(())
}
