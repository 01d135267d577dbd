//! Mutation lifecycle tracking for forms and action buttons.

use crate::error::ApiError;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Debug, PartialEq)]
pub enum MutationState<T> {
    Idle,
    Pending,
    Success(T),
    Failed(ApiError),
}

/// State plus the number of the run that owns it. Both change under one lock.
#[derive(Debug)]
struct Slot<T> {
    state: MutationState<T>,
    generation: u64,
}

/// Shared handle to one mutation's state. A result that arrives after
/// [`Mutation::reset`] (or after a newer `run`) is returned to its caller but
/// not recorded.
#[derive(Debug)]
pub struct Mutation<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for Mutation<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Mutation<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                state: MutationState::Idle,
                generation: 0,
            })),
        }
    }
}

impl<T: Clone> Mutation<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn run<F>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let generation = {
            let mut slot = self.lock();
            slot.generation += 1;
            slot.state = MutationState::Pending;
            slot.generation
        };
        let result = operation.await;
        self.settle(generation, &result);
        result
    }

    /// Record `result` if run `generation` still owns the state.
    fn settle(&self, generation: u64, result: &Result<T, ApiError>) -> bool {
        let mut slot = self.lock();
        if slot.generation != generation {
            return false;
        }
        slot.state = match result {
            Ok(data) => MutationState::Success(data.clone()),
            Err(err) => MutationState::Failed(err.clone()),
        };
        true
    }

    pub fn state(&self) -> MutationState<T> {
        self.lock().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.lock().state, MutationState::Pending)
    }

    pub fn data(&self) -> Option<T> {
        match &self.lock().state {
            MutationState::Success(data) => Some(data.clone()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<ApiError> {
        match &self.lock().state {
            MutationState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    pub fn reset(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.state = MutationState::Idle;
    }
}
