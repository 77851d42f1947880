//! Load a database document and log what it contains.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p rte-db --example load_database -- crates/rte-db/tests/data/scene.json
//! ```

use std::env;
use std::process::ExitCode;

use rte_db::{Database, DatabaseLoader, LoaderConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: load_database <document.json>");
        return ExitCode::FAILURE;
    };

    let loader = DatabaseLoader::new(LoaderConfig::default());
    let mut db = Database::new();
    if let Err(err) = loader.load_file(&path, &mut db) {
        log::error!("failed to load {path}: {err}");
        return ExitCode::FAILURE;
    }
    db.log_summary();

    for &root in db.resource_roots() {
        let Ok(walk) = db.resources().descendants(root) else {
            continue;
        };
        for (index, resource) in walk {
            println!(
                "resource {index}: user {:?} mesh {:?} material {:?}",
                resource.user_id, resource.mesh, resource.material
            );
        }
    }
    ExitCode::SUCCESS
}
