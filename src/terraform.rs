mod resource_data;
mod state;

pub use resource_data::ResourceData;
pub use state::{ResourceInstance, ResourceState, StateError, StateFile};
