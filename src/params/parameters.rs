// Owned view over the parameters of one successful match

use std::borrow::Cow;

use crate::error::ParameterError;
use crate::template::UriTemplate;

use super::range_cache::RangeParameterCache;

/// Parameters captured from `uri` by `template`.
///
/// Values borrow from the candidate string and names from the template, so
/// lookups never copy. The backing storage goes back to the shared pool when
/// this is dropped.
pub struct Parameters<'t, 'u> {
    template: &'t UriTemplate,
    uri: &'u str,
    cache: RangeParameterCache<'static>,
}

impl<'t, 'u> Parameters<'t, 'u> {
    pub(crate) fn capture(template: &'t UriTemplate, uri: &'u str, initial_capacity: usize) -> Option<Self> {
        let mut cache = RangeParameterCache::rent(initial_capacity);
        match cache.capture(template, uri) {
            Ok(true) => Some(Self { template, uri, cache }),
            _ => None,
        }
    }

    pub fn template(&self) -> &'t UriTemplate {
        self.template
    }

    /// Raw value of the first parameter called `name`
    pub fn get(&self, name: &str) -> Option<&'u str> {
        let uri = self.uri;
        self.cache
            .try_get(self.template, name)
            .map(|range| &uri[range])
    }

    /// Percent-decoded value. Values that don't decode to UTF-8 come back raw.
    pub fn get_decoded(&self, name: &str) -> Result<Cow<'u, str>, ParameterError> {
        let raw = self
            .get(name)
            .ok_or_else(|| ParameterError::Missing(name.to_string()))?;

        Ok(urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw)))
    }

    /// `(name, value)` pairs in capture order
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, &'u str)> + '_ {
        let template = self.template;
        let uri = self.uri;
        self.cache.iter().filter_map(move |(handle, range)| {
            template
                .parameter_name(handle)
                .map(|name| (name, &uri[range]))
        })
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let template = UriTemplate::compile("/games/{gameId}/Players/{playerId}").unwrap();
        let params = template.parameters("/games/chess/Players/alice").unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("gameId"), Some("chess"));
        assert_eq!(params.get("playerId"), Some("alice"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.template().as_str(), "/games/{gameId}/Players/{playerId}");
    }

    #[test]
    fn test_iter_pairs() {
        let template = UriTemplate::compile("/foo{?x,y}").unwrap();
        let params = template.parameters("/foo?x=1&y=2").unwrap();
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("x", "1"), ("y", "2")]);
    }

    #[test]
    fn test_get_decoded() {
        let template = UriTemplate::compile("/search/{term}").unwrap();
        let params = template.parameters("/search/hello%20world").unwrap();

        assert_eq!(params.get("term"), Some("hello%20world"));
        assert_eq!(params.get_decoded("term").unwrap(), "hello world");
        assert_eq!(
            params.get_decoded("other"),
            Err(ParameterError::Missing("other".to_string()))
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let template = UriTemplate::compile("/foo/{bar}").unwrap();
        assert!(template.parameters("/baz").is_none());
    }
}
