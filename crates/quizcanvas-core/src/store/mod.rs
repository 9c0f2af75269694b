//! Storage abstraction for answer keys.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::eval::AnswerKey;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Answer key not found for question: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for answer-key storage backends.
///
/// One record per question: saving replaces any previously stored key for
/// that question id.
pub trait AnswerKeyStore: Send + Sync {
    /// Save the answer key for a question, replacing any prior record.
    fn save(&self, question_id: &str, key: &AnswerKey) -> BoxFuture<'_, StoreResult<()>>;

    /// Load the answer key for a question.
    fn load(&self, question_id: &str) -> BoxFuture<'_, StoreResult<AnswerKey>>;

    /// Delete the answer key for a question.
    fn delete(&self, question_id: &str) -> BoxFuture<'_, StoreResult<()>>;

    /// List all question ids with a stored key.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>>;

    /// Check if a question has a stored key.
    fn exists(&self, question_id: &str) -> BoxFuture<'_, StoreResult<bool>>;
}

#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    // Simple blocking executor for tests
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
