pub mod event_router;
pub mod state_cache;
pub mod tree_loads;
