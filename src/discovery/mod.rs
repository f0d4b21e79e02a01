mod contexts;
mod resources;

pub use contexts::{parse_contexts, select_context};
pub use resources::{ResourceChoices, ResourceList};
