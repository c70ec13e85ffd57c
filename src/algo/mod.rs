//! Structural graph algorithms

mod coalesce;
mod connectivity;

pub(crate) use coalesce::coalesce;
pub(crate) use connectivity::{connected_component_of_node, connected_components};
