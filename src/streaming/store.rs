//! Chunk store: on-demand loading, LRU residency and viewport reconciliation
//!
//! The store owns the resident chunk set. Callers drive it with
//! [`ChunkStore::ensure_view`] as the viewport moves and read back what is
//! loaded with [`ChunkStore::entities_in_rect`]. The two are decoupled: a
//! query never triggers a load and only sees chunks that finished loading.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::error::{Error, LoadError};
use crate::core::types::Result;
use crate::math::Rect;
use crate::streaming::cache::ChunkCache;
use crate::streaming::chunk::Chunk;
use crate::streaming::chunk_loader::{ChunkLoader, LoadResult};
use crate::streaming::config::StoreConfig;
use crate::streaming::coord::{ChunkCoord, ChunkRange};
use crate::streaming::query::EntitiesInRect;

/// Cumulative counters since the store was created
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Requested coordinates that were already resident
    pub hits: u64,
    /// Loads that produced a resident chunk
    pub loads: u64,
    /// Loads that reported no chunk at the coordinate
    pub absent: u64,
    /// Loads that failed
    pub failures: u64,
    /// Chunks evicted to stay within the cache limit
    pub evictions: u64,
}

/// What a single [`ChunkStore::ensure`] call did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnsureReport {
    /// Already resident; moved to most recently used
    pub hits: Vec<ChunkCoord>,
    /// Loaded and inserted by this call
    pub loaded: Vec<ChunkCoord>,
    /// Loader reported no chunk; not cached
    pub absent: Vec<ChunkCoord>,
    /// Loader failed; not cached, retried on the next ensure
    pub failed: Vec<(ChunkCoord, LoadError)>,
    /// Chunks evicted while inserting this call's loads
    pub evicted: Vec<ChunkCoord>,
}

impl EnsureReport {
    /// Number of loader invocations issued by the call
    pub fn issued(&self) -> usize {
        self.loaded.len() + self.absent.len() + self.failed.len()
    }

    /// True if no load failed
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turn per-chunk failures into an aggregate error
    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(Error::Load { failed: self.failed })
        }
    }

    fn record(&mut self, result: LoadResult, evicted: Vec<ChunkCoord>) {
        match result {
            LoadResult::Loaded(coord) => self.loaded.push(coord),
            LoadResult::NotFound(coord) => self.absent.push(coord),
            LoadResult::Error(coord, err) => self.failed.push((coord, err)),
        }
        self.evicted.extend(evicted);
    }
}

/// Resident set plus counters, shared with in-flight load tasks
struct StoreState {
    cache: ChunkCache,
    stats: StoreStats,
}

impl StoreState {
    /// Apply a settled load. Returns the outcome and anything evicted.
    fn settle(
        &mut self,
        coord: ChunkCoord,
        result: std::result::Result<Option<Chunk>, LoadError>,
    ) -> (LoadResult, Vec<ChunkCoord>) {
        match result {
            Ok(Some(chunk)) if chunk.coord != coord => {
                self.stats.failures += 1;
                let err = LoadError::CoordMismatch {
                    requested: coord,
                    found: chunk.coord,
                };
                log::warn!("Rejected chunk {:?}: {}", coord, err);
                (LoadResult::Error(coord, err), Vec::new())
            }
            Ok(Some(chunk)) => {
                let evicted = self.cache.insert(coord, Arc::new(chunk));
                self.stats.loads += 1;
                self.stats.evictions += evicted.len() as u64;
                log::trace!("Loaded chunk {:?} ({} resident)", coord, self.cache.len());
                if !evicted.is_empty() {
                    log::debug!("Evicted {} chunk(s): {:?}", evicted.len(), evicted);
                }
                (LoadResult::Loaded(coord), evicted)
            }
            Ok(None) => {
                self.stats.absent += 1;
                log::trace!("No chunk at {:?}", coord);
                (LoadResult::NotFound(coord), Vec::new())
            }
            Err(err) => {
                self.stats.failures += 1;
                log::warn!("Failed to load chunk {:?}: {}", coord, err);
                (LoadResult::Error(coord, err), Vec::new())
            }
        }
    }
}

fn lock(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    // State is only mutated in short non-panicking sections
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bounded in-memory working set of world chunks
///
/// Each store is independent; run one per level. Methods that load must be
/// awaited inside a tokio runtime.
///
/// Loads issued by one `ensure` call are deduplicated. Overlapping calls are
/// not: two calls that both miss a coordinate each invoke the loader, and the
/// later result replaces the earlier one.
pub struct ChunkStore {
    config: StoreConfig,
    loader: Arc<dyn ChunkLoader>,
    state: Arc<Mutex<StoreState>>,
}

impl ChunkStore {
    /// Create a store, validating the configuration
    pub fn new<L: ChunkLoader + 'static>(config: StoreConfig, loader: L) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "Chunk store: chunk_size={} cache_limit={}",
            config.chunk_size, config.cache_limit
        );

        Ok(Self {
            state: Arc::new(Mutex::new(StoreState {
                cache: ChunkCache::new(config.cache_limit),
                stats: StoreStats::default(),
            })),
            loader: Arc::new(loader),
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn chunk_size(&self) -> f32 {
        self.config.chunk_size
    }

    // --- Loading ---

    /// Make the given chunks resident
    ///
    /// Resident coordinates are marked most recently used. Every other
    /// distinct coordinate gets exactly one loader call; all of them are
    /// issued before any is awaited. Returns once every load issued here has
    /// settled. Failures are reported, never propagated: call
    /// [`EnsureReport::into_result`] to treat them as an error.
    ///
    /// Each load runs as its own task and applies its result when it settles,
    /// so dropping this future does not cancel loads already issued.
    pub async fn ensure<I>(&self, coords: I) -> EnsureReport
    where
        I: IntoIterator<Item = ChunkCoord>,
    {
        let mut report = EnsureReport::default();
        let mut missing = Vec::new();

        {
            let mut state = lock(&self.state);
            let mut seen = HashSet::new();
            for coord in coords {
                if !seen.insert(coord) {
                    continue;
                }
                if state.cache.touch(coord) {
                    state.stats.hits += 1;
                    report.hits.push(coord);
                } else {
                    missing.push(coord);
                }
            }
        }

        if missing.is_empty() {
            return report;
        }
        log::debug!("Loading {} chunk(s), {} already resident", missing.len(), report.hits.len());

        let mut tasks = Vec::with_capacity(missing.len());
        for coord in missing {
            let load = self.loader.load(coord);
            let state = Arc::clone(&self.state);
            let handle = tokio::spawn(async move {
                let result = load.await;
                lock(&state).settle(coord, result)
            });
            tasks.push((coord, handle));
        }

        for (coord, handle) in tasks {
            match handle.await {
                Ok((result, evicted)) => report.record(result, evicted),
                Err(e) => {
                    let err = if e.is_panic() {
                        LoadError::Panicked(e.to_string())
                    } else {
                        LoadError::Other(format!("load task cancelled: {}", e))
                    };
                    log::warn!("Failed to load chunk {:?}: {}", coord, err);
                    lock(&self.state).stats.failures += 1;
                    report.failed.push((coord, err));
                }
            }
        }

        report
    }

    /// Chunk range covering a viewport grown by `padding` on every side
    pub fn view_range(&self, x: f32, y: f32, w: f32, h: f32, padding: f32) -> ChunkRange {
        let rect = Rect::from_xywh(x, y, w, h).padded(padding);
        ChunkRange::covering(&rect, self.config.chunk_size)
    }

    /// Make every chunk overlapping the padded viewport resident
    ///
    /// Covers `[x - padding, x + w + padding] x [y - padding, y + h + padding]`
    /// and requests the covering chunks in row-major order. Negative or
    /// non-finite padding is rejected before anything is loaded. A viewport
    /// that is inverted or not finite requests nothing.
    pub async fn ensure_view(
        &self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        padding: f32,
    ) -> Result<EnsureReport> {
        if !(padding.is_finite() && padding >= 0.0) {
            return Err(Error::InvalidPadding(padding));
        }

        let rect = Rect::from_xywh(x, y, w, h).padded(padding);
        if !rect.is_valid() {
            log::debug!("Ignoring degenerate viewport {:?}", rect);
            return Ok(EnsureReport::default());
        }

        let range = ChunkRange::covering(&rect, self.config.chunk_size);
        Ok(self.ensure(range.iter()).await)
    }

    // --- Queries ---

    /// Entities of resident chunks lying inside `[x, x + w] x [y, y + h]`
    ///
    /// Never loads and never changes recency. Chunks that are not resident
    /// are skipped. Membership is snapshotted now; see [`EntitiesInRect`].
    /// A rectangle with negative width or height contains nothing.
    pub fn entities_in_rect(&self, x: f32, y: f32, w: f32, h: f32) -> EntitiesInRect {
        let rect = Rect::from_xywh(x, y, w, h);
        if !rect.is_valid() {
            return EntitiesInRect::empty(rect);
        }

        let range = ChunkRange::covering(&rect, self.config.chunk_size);
        let state = lock(&self.state);

        // Walk whichever side is smaller: the covering range or the resident set
        let chunks = if range.len() <= state.cache.len() {
            range
                .iter()
                .filter_map(|coord| state.cache.peek(coord).cloned())
                .collect()
        } else {
            let mut coords: Vec<ChunkCoord> = state
                .cache
                .coords()
                .copied()
                .filter(|coord| range.contains(*coord))
                .collect();
            coords.sort_by_key(|c| (c.y, c.x));
            coords
                .into_iter()
                .filter_map(|coord| state.cache.peek(coord).cloned())
                .collect()
        };

        EntitiesInRect::new(rect, chunks)
    }

    /// Resident chunk at `coord`, without touching recency
    pub fn chunk(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        lock(&self.state).cache.peek(coord).cloned()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        lock(&self.state).cache.contains(coord)
    }

    /// Number of resident chunks
    pub fn resident_count(&self) -> usize {
        lock(&self.state).cache.len()
    }

    /// Resident coordinates, least recently used first
    pub fn resident_coords(&self) -> Vec<ChunkCoord> {
        lock(&self.state).cache.coords().copied().collect()
    }

    pub fn stats(&self) -> StoreStats {
        lock(&self.state).stats
    }

    // --- Eviction ---

    /// Evict the least recently used chunk. No-op on an empty store.
    pub fn evict_one(&self) -> Option<ChunkCoord> {
        let mut state = lock(&self.state);
        let evicted = state.cache.evict_oldest();
        if evicted.is_some() {
            state.stats.evictions += 1;
        }
        evicted
    }

    /// Drop a chunk regardless of recency
    pub fn remove(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        lock(&self.state).cache.remove(coord)
    }

    /// Drop every resident chunk. Loads still in flight will repopulate.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        log::debug!("Clearing {} resident chunk(s)", state.cache.len());
        state.cache.clear();
    }
}
