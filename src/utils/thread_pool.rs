use once_cell::sync::OnceCell;
use rayon::ThreadPoolBuilder;
use std::sync::Arc;

static THREAD_POOL: OnceCell<Arc<rayon::ThreadPool>> = OnceCell::new();

/// Initialize the global worker pool with an explicit thread count.
///
/// The pool bounds how many files are fingerprinted at once, which keeps
/// file-descriptor and memory use in check on large file sets. Call this
/// before the first snapshot build; afterwards the pool is fixed.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or was already initialized.
pub fn init_thread_pool(num_threads: usize) -> anyhow::Result<()> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("snapdiff-worker-{i}"))
        .build()?;

    THREAD_POOL
        .set(Arc::new(pool))
        .map_err(|_| anyhow::anyhow!("Thread pool already initialized"))?;

    Ok(())
}

/// Get the global worker pool, initializing with default settings if needed.
///
/// # Panics
///
/// Panics if the thread pool cannot be created.
pub fn get_thread_pool() -> Arc<rayon::ThreadPool> {
    THREAD_POOL
        .get_or_init(|| {
            let num_threads = num_cpus::get().min(8);
            let pool = ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .thread_name(|i| format!("snapdiff-worker-{i}"))
                .build()
                .expect("Failed to create thread pool");
            Arc::new(pool)
        })
        .clone()
}

/// Run a function inside the bounded worker pool.
pub fn run_in_pool<F, R>(f: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    let pool = get_thread_pool();
    pool.install(f)
}

mod num_cpus {
    use std::sync::LazyLock;

    static NUM_CPUS: LazyLock<usize> = LazyLock::new(|| {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1)
    });

    pub fn get() -> usize {
        *NUM_CPUS
    }
}
