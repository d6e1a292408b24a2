use itertools::Itertools;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in query values (RFC 3986 unreserved).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn param(name: &str, value: &str) -> String {
    format!("{}={}", name, utf8_percent_encode(value, QUERY_VALUE))
}

/// Primary registry source plus alternative sources searched alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySources {
    pub primary: String,
    pub alternatives: Vec<String>,
}

impl RegistrySources {
    pub fn new(primary: impl Into<String>) -> RegistrySources {
        RegistrySources {
            primary: primary.into(),
            alternatives: vec![],
        }
    }

    fn iter(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.primary).chain(self.alternatives.iter())
    }
}

/// Parameters of a registry `search` request.
///
/// ```
/// use rpsl_peering::registry::{RegistryQuery, RegistrySources};
///
/// let url = RegistryQuery::new("AS199664")
///     .inverse_attribute("origin")
///     .type_filter("route6")
///     .to_url("https://rest.db.ripe.net", &RegistrySources::new("RIPE"));
/// assert_eq!(
///     url,
///     "https://rest.db.ripe.net/search.xml?query-string=AS199664&source=RIPE\
///      &inverse-attribute=origin&type-filter=route6"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryQuery {
    pub query_string: String,
    pub inverse_attribute: Option<String>,
    pub type_filters: Vec<String>,
    pub flags: Vec<String>,
}

impl RegistryQuery {
    pub fn new(query_string: impl Into<String>) -> RegistryQuery {
        RegistryQuery {
            query_string: query_string.into(),
            inverse_attribute: None,
            type_filters: vec![],
            flags: vec![],
        }
    }

    pub fn inverse_attribute(mut self, attribute: impl Into<String>) -> RegistryQuery {
        self.inverse_attribute = Some(attribute.into());
        self
    }

    pub fn type_filter(mut self, object_type: impl Into<String>) -> RegistryQuery {
        self.type_filters.push(object_type.into());
        self
    }

    pub fn flag(mut self, flag: impl Into<String>) -> RegistryQuery {
        self.flags.push(flag.into());
        self
    }

    /// Builds the search URL under `base_url`. Parameter values are percent-encoded.
    pub fn to_url(&self, base_url: &str, sources: &RegistrySources) -> String {
        let mut params = vec![param("query-string", &self.query_string)];
        params.extend(sources.iter().map(|s| param("source", s)));
        if let Some(attribute) = &self.inverse_attribute {
            params.push(param("inverse-attribute", attribute));
        }
        params.extend(self.type_filters.iter().map(|t| param("type-filter", t)));
        params.extend(self.flags.iter().map(|f| param("flags", f)));

        format!(
            "{}/search.xml?{}",
            base_url.trim_end_matches('/'),
            params.iter().join("&")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_alternatives_and_flags() {
        let sources = RegistrySources {
            primary: "RIPE".to_string(),
            alternatives: vec!["RADB".to_string(), "ARIN".to_string()],
        };
        let url = RegistryQuery::new("AS3333")
            .inverse_attribute("origin")
            .type_filter("route")
            .type_filter("route6")
            .flag("r")
            .to_url("https://rest.db.ripe.net/", &sources);
        assert_eq!(
            url,
            "https://rest.db.ripe.net/search.xml?query-string=AS3333&source=RIPE&source=RADB\
             &source=ARIN&inverse-attribute=origin&type-filter=route&type-filter=route6&flags=r"
        );
    }

    #[test]
    fn test_url_encodes_values() {
        let url = RegistryQuery::new("AS1:AS-FOO^+ & more")
            .flag("r")
            .to_url("https://rest.db.ripe.net", &RegistrySources::new("RIPE"));
        assert_eq!(
            url,
            "https://rest.db.ripe.net/search.xml?query-string=AS1%3AAS-FOO%5E%2B%20%26%20more\
             &source=RIPE&flags=r"
        );
    }
}
