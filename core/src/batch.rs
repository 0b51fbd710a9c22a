use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use sampling::source::Source;
use tracing::warn;

use crate::{KitConfig, PheError, Result};

/// Cooperative cancellation flag shared between a kit and its callers.
///
/// Once [AbortHandle::abort] is called, every batch call of the kit fails
/// with [PheError::Aborted] at its next element boundary, until
/// [AbortHandle::reset]. Elements already in progress complete.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.aborted.store(false, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// Chunked data-parallel executor owned by a kit.
///
/// Every call returns either all outputs, index-aligned with the inputs, or
/// the error of the lowest failing index wrapped in [PheError::AtIndex].
pub(crate) struct BatchEngine {
    pool: ThreadPool,
    chunk_size: usize,
    abort: AbortHandle,
}

impl BatchEngine {
    pub(crate) fn new(config: &KitConfig) -> Result<Self> {
        let pool: ThreadPool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("phe-batch-{}", i))
            .build()?;
        Ok(Self {
            pool,
            chunk_size: config.chunk_size,
            abort: AbortHandle::new(),
        })
    }

    pub(crate) fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub(crate) fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub(crate) fn map<T, U, F>(&self, items: &[T], f: F) -> Result<Vec<U>>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> Result<U> + Sync,
    {
        let f: &F = &f;
        let results: Vec<Result<U>> = self.pool.install(|| {
            items
                .par_chunks(self.chunk_size)
                .flat_map_iter(|chunk| {
                    chunk.iter().map(move |item| {
                        self.checkpoint()?;
                        f(item)
                    })
                })
                .collect()
        });
        self.gather(results)
    }

    /// Same as [BatchEngine::map], with one child of `source` per chunk.
    pub(crate) fn map_with_source<T, U, F>(&self, items: &[T], source: &Mutex<Source>, f: F) -> Result<Vec<U>>
    where
        T: Sync,
        U: Send,
        F: Fn(&T, &mut Source) -> Result<U> + Sync,
    {
        let sources: Vec<Source> = source
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .branches(items.len().div_ceil(self.chunk_size));
        let f: &F = &f;
        let results: Vec<Result<U>> = self.pool.install(|| {
            items
                .par_chunks(self.chunk_size)
                .zip(sources.into_par_iter())
                .flat_map_iter(|(chunk, mut source)| {
                    chunk.iter().map(move |item| {
                        self.checkpoint()?;
                        f(item, &mut source)
                    })
                })
                .collect()
        });
        self.gather(results)
    }

    /// Applies `f` to every `(targets[i], others[i])`. The slices must have equal length.
    pub(crate) fn for_each_mut<A, B, F>(&self, targets: &mut [A], others: &[B], f: F) -> Result<()>
    where
        A: Send,
        B: Sync,
        F: Fn(&mut A, &B) -> Result<()> + Sync,
    {
        debug_assert_eq!(targets.len(), others.len());
        let f: &F = &f;
        let results: Vec<Result<()>> = self.pool.install(|| {
            targets
                .par_chunks_mut(self.chunk_size)
                .zip(others.par_chunks(self.chunk_size))
                .flat_map_iter(|(targets, others)| {
                    targets.iter_mut().zip(others).map(move |(a, b)| {
                        self.checkpoint()?;
                        f(a, b)
                    })
                })
                .collect()
        });
        self.gather(results).map(|_| ())
    }

    fn checkpoint(&self) -> Result<()> {
        if self.abort.is_aborted() {
            return Err(PheError::Aborted);
        }
        Ok(())
    }

    fn gather<U>(&self, results: Vec<Result<U>>) -> Result<Vec<U>> {
        let total: usize = results.len();
        let mut out: Vec<U> = Vec::with_capacity(total);
        for (i, res) in results.into_iter().enumerate() {
            match res {
                Ok(value) => out.push(value),
                Err(PheError::Aborted) => {
                    warn!(index = i, total, "batch aborted");
                    return Err(PheError::Aborted);
                }
                Err(err) => return Err(err.at(i)),
            }
        }
        Ok(out)
    }
}
