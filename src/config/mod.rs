// Route tables declared in YAML

mod route_settings;
mod routes;

pub use route_settings::RouteSettings;
pub use routes::{build_keyed_table, build_table, load_routes, parse_routes, DEFAULT_ROUTES_FILE};
