//! Streaming demo — scrolls a viewport across a generated level.
//!
//! Usage: cargo run --bin stream_demo -- [OPTIONS]
//!
//! Options:
//!   --steps <N>        Number of viewport moves (default: 40)
//!   --limit <N>        Resident chunk limit (default: 160)
//!   --chunk-size <U>   World units per chunk edge (default: 32.0)
//!   --speed <U>        Viewport movement per step (default: 24.0)
//!   --config <PATH>    JSON store config (overrides --limit / --chunk-size)
//!
//! Set RUST_LOG=chunk_stream=debug to watch loads and evictions.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chunk_stream::core::{logging, LoadError};
use chunk_stream::streaming::{
    Chunk, ChunkCoord, ChunkStore, EntityRecord, FnLoader, StoreConfig,
};

/// Viewport size in world units (a 320x180 screen)
const VIEW_W: f32 = 320.0;
const VIEW_H: f32 = 180.0;
/// Extra margin loaded around the viewport
const PADDING: f32 = 32.0;
/// Rows below this are void; the loader reports no chunk there
const VOID_BELOW_ROW: i32 = -4;
/// A padded 320x180 view touches up to 14x9 chunks of 32 units
const DEMO_CACHE_LIMIT: usize = 160;

/// Cheap deterministic hash so each chunk always generates the same content
fn hash_coord(coord: ChunkCoord) -> u32 {
    let mut h = (coord.x as u32).wrapping_mul(0x9E37_79B1) ^ (coord.y as u32).wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE3D);
    h ^ (h >> 13)
}

async fn generate_chunk(coord: ChunkCoord, chunk_size: f32) -> Result<Option<Chunk>, LoadError> {
    let seed = hash_coord(coord);

    // Simulated fetch latency, 1-8 ms
    tokio::time::sleep(Duration::from_millis(1 + (seed % 8) as u64)).await;

    if coord.y < VOID_BELOW_ROW {
        return Ok(None);
    }

    let origin_x = coord.x as f32 * chunk_size;
    let origin_y = coord.y as f32 * chunk_size;
    let count = seed % 5;
    let entities = (0..count)
        .map(|i| {
            let s = hash_coord(ChunkCoord::new(coord.x.wrapping_add(i as i32 * 7919), coord.y));
            let kind = match s % 4 {
                0 => "coin",
                1 => "spike",
                2 => "enemy",
                _ => "platform",
            };
            EntityRecord::new(
                format!("{}_{}_{}_{}", kind, coord.x, coord.y, i),
                kind,
                origin_x + (s % 1000) as f32 / 1000.0 * chunk_size,
                origin_y + ((s / 1000) % 1000) as f32 / 1000.0 * chunk_size,
            )
            .with_property("seed", s)
        })
        .collect();

    Ok(Some(Chunk::with_entities(coord, entities)))
}

#[tokio::main]
async fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let steps = parse_usize_arg(&args, "--steps").unwrap_or(40);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(24.0);

    let config = match parse_str_arg(&args, "--config") {
        Some(path) => match StoreConfig::load_sync(&PathBuf::from(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            let defaults = StoreConfig::default();
            StoreConfig::new(
                parse_f32_arg(&args, "--chunk-size").unwrap_or(defaults.chunk_size),
                parse_usize_arg(&args, "--limit").unwrap_or(DEMO_CACHE_LIMIT),
            )
        }
    };

    let chunk_size = config.chunk_size;
    let loader = FnLoader::new(move |coord| generate_chunk(coord, chunk_size));
    let store = match ChunkStore::new(config, loader) {
        Ok(store) => store,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    println!("=== Chunk Stream Demo ===");
    println!("Chunk size: {}", store.config().chunk_size);
    println!("Cache limit: {}", store.config().cache_limit);
    println!("Steps: {} at {} units/step", steps, speed);
    println!();

    let start = Instant::now();
    let (mut x, mut y) = (0.0_f32, 0.0_f32);

    for step in 0..steps {
        // Run right, dip down every tenth step
        x += speed;
        if step % 10 == 9 {
            y -= VIEW_H;
        }

        let report = match store.ensure_view(x, y, VIEW_W, VIEW_H, PADDING).await {
            Ok(report) => report,
            Err(e) => {
                log::error!("ensure_view failed: {}", e);
                continue;
            }
        };
        let visible = store.entities_in_rect(x, y, VIEW_W, VIEW_H).count();

        println!(
            "step {:3}  view ({:7.1}, {:7.1})  hits {:2}  loaded {:2}  void {:2}  evicted {:2}  resident {:3}  visible {:3}",
            step,
            x,
            y,
            report.hits.len(),
            report.loaded.len(),
            report.absent.len(),
            report.evicted.len(),
            store.resident_count(),
            visible,
        );
    }

    let stats = store.stats();
    println!();
    println!("Done in {:.2?}", start.elapsed());
    println!(
        "hits {}  loads {}  void {}  failures {}  evictions {}",
        stats.hits, stats.loads, stats.absent, stats.failures, stats.evictions
    );
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
