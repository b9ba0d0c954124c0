pub mod api;
pub mod errors;
pub mod model;
pub mod policy;

mod precheck;
mod runner;

pub use api::{FillExecutor, FillExecutorBuilder};
pub use errors::FillError;
pub use model::{FillKind, FillReport};
pub use policy::FillPolicyView;
