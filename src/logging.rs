// src/logging.rs
use chrono::Utc;
use std::io::Write;

/// `timestamp | LEVEL | target | message`, filtered by `RUST_LOG` (default `info`).
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} | {} | {} | {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
