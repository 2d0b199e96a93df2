//! Flutter-facing bindings for the taskflow board core.

pub mod api;
