//! Concurrent execution of file jobs.
//!
//! A tokio [`Semaphore`](tokio::sync::Semaphore) bounds how many jobs run at
//! once; the dispatcher acquires a permit before spawning each job. Results
//! flow back through an mpsc channel. A [`StopSignal`] stops dispatch without
//! interrupting running jobs.

mod stop;
mod traits;
mod types;
mod worker_pool;

pub use stop::StopSignal;
pub use traits::JobExecutor;
pub use types::PoolStatus;
pub use worker_pool::WorkerPool;
