//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stockroom_core` linkage.
//! - Prove the store bootstraps to the expected schema version.

use stockroom_core::db::migrations::latest_version;
use stockroom_core::db::open_db_in_memory;

fn main() {
    println!("stockroom_core version={}", stockroom_core::core_version());

    match open_db_in_memory() {
        Ok(_conn) => {
            println!("stockroom_core store=ok schema_version={}", latest_version());
        }
        Err(err) => {
            eprintln!("stockroom_core store=error {err}");
            std::process::exit(1);
        }
    }
}
