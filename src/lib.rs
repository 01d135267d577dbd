//! coop-data: typed REST data layer and headless data table for the
//! cooperative banking front end.

pub mod cache;
pub mod case;
pub mod config;
pub mod domain;
pub mod error;
pub mod query;
pub mod response;
pub mod service;
pub mod state;
pub mod table;
pub mod transport;

pub use cache::QueryCache;
pub use config::{ClientConfig, ResourceDescriptor, ResourceRegistry};
pub use domain::Resources;
pub use error::{ApiError, ClientError, ConfigError, ErrorKind};
pub use query::{ListOptions, PageQuery, QueryKey};
pub use response::Page;
pub use service::{FormSchema, Mutation, MutationState, Resource};
pub use state::DataContext;
pub use table::{DataTable, TableMarkup, TableState};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
