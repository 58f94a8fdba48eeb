use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::config::route_settings::RouteSettings;
use crate::routing::{KeyedRoutingTable, KeyedRoutingTableBuilder, RoutingTable, RoutingTableBuilder};

pub const DEFAULT_ROUTES_FILE: &str = "routes.yml";

/// Read and parse a YAML routes file.
pub fn load_routes(path: impl AsRef<Path>) -> Result<Vec<RouteSettings>> {
    let path = path.as_ref();
    let yml = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read routes file {}", path.display()))?;
    let routes = parse_routes(&yml)
        .with_context(|| format!("Invalid routes file {}", path.display()))?;

    debug!(path = %path.display(), routes = routes.len(), "loaded routes");
    Ok(routes)
}

pub fn parse_routes(yml: &str) -> Result<Vec<RouteSettings>> {
    let routes: Vec<RouteSettings> =
        serde_yaml::from_str(yml).context("Invalid yaml route configuration")?;
    Ok(routes)
}

/// Build a table in file order. A template listed twice is rejected since
/// the second entry could never be reached.
pub fn build_table(routes: &[RouteSettings]) -> Result<RoutingTable<String>> {
    let mut builder = RoutingTableBuilder::with_capacity(routes.len());
    let mut seen = HashSet::new();

    for route in routes {
        if !seen.insert(route.template.as_str()) {
            bail!("Duplicate route template: {}", route.template);
        }
        builder
            .add(&route.template, route.result.clone())
            .with_context(|| format!("Invalid template '{}'", route.template))?;
    }

    Ok(builder.build())
}

/// Build a verb-keyed table. Every route must name a verb.
pub fn build_keyed_table(routes: &[RouteSettings]) -> Result<KeyedRoutingTable<String, String>> {
    let mut builder = KeyedRoutingTableBuilder::new();
    let mut seen = HashSet::new();

    for route in routes {
        let verb = match &route.verb {
            Some(verb) => verb,
            None => bail!("Route '{}' has no verb", route.template),
        };
        if !seen.insert((route.template.as_str(), verb.as_str())) {
            bail!("Duplicate route: {} {}", verb, route.template);
        }
        builder
            .add(&route.template, verb.clone(), route.result.clone())
            .with_context(|| format!("Invalid template '{}'", route.template))?;
    }

    Ok(builder.build())
}
