pub mod descriptor;
pub mod registry;
pub mod settings;

pub use descriptor::*;
pub use registry::*;
pub use settings::*;
