// Routing tables built from URI templates

mod keyed_table;
mod table;

pub use keyed_table::{KeyedRoutingTable, KeyedRoutingTableBuilder};
pub use table::{RoutingEntry, RoutingTable, RoutingTableBuilder, TemplateMatch};
