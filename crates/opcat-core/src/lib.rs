pub mod catalog;
pub mod config;
pub mod error;
pub mod load;
pub mod resolve;
pub mod spec;

pub use catalog::{
    CatalogOptions, HttpMethod, Operation, ParameterLocation, create_path_operation,
    get_all_operations,
};
pub use error::{CatalogError, ResolveError};
pub use resolve::{resolve_ref, resolve_refs};
pub use spec::{Spec, SpecSource, get_spec, get_spec_sync};
