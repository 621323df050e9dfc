//! Session replay entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: slidetext <session.json>");
        std::process::exit(2);
    };
    log::info!("Replaying {}", path);

    let outcome = match slidetext_app::replay::run_file(&path) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("Replay failed: {}", err);
            std::process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log::error!("Could not serialize outcome: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
