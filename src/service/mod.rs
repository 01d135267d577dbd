//! The data-layer factory output and its helpers.

mod crud;
mod mutation;
mod validation;
pub use crud::Resource;
pub use mutation::{Mutation, MutationState};
pub use validation::{FieldDescriptor, FieldValue, FormSchema, Rule};
