// urimatch: compile RFC 6570 URI templates and match URIs against them
//
// A template compiles once into an immutable `UriTemplate` that any number of
// threads can match against. Routing tables pick the first of many templates
// that matches a candidate, and the parameter caches collect captured values
// in pooled storage.

pub mod config;
pub mod error;
pub mod params;
pub mod provider;
pub mod routing;
pub mod template;

pub use error::{ParameterError, TemplateError};
pub use params::{ParameterCache, ParameterPool, Parameters, RangeParameterCache};
pub use provider::{ParameterProvider, VariableProcessingState, VariableSpecification};
pub use routing::{KeyedRoutingTable, KeyedRoutingTableBuilder, RoutingTable, RoutingTableBuilder, TemplateMatch};
pub use template::{Capture, MatchMode, Operator, ParameterName, RangeCapture, UriTemplate, VariableSpec};
