use crate::object_store::ObjectStoreConstructor;

pub mod local;
pub mod memory;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;

pub(crate) fn builtin_plugins() -> Vec<(&'static str, ObjectStoreConstructor)> {
    vec![local::plugin_entry(), memory::plugin_entry()]
}
