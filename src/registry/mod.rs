/*!
Client for the RIPE-style registry REST search API.

The client only builds queries and hands them to a [RegistryTransport]; the default
[HttpTransport] (feature `remote`) performs blocking HTTP requests. The convenience lookups
treat any failure as "no data": they log the error and return `None`.
*/
mod error;
#[cfg(feature = "remote")]
mod http;
mod query;

pub use error::RegistryError;
#[cfg(feature = "remote")]
pub use http::HttpTransport;
pub use query::{RegistryQuery, RegistrySources};

use log::{debug, error};

/// Base URL of the RIPE database REST API.
pub const RIPE_REST_URL: &str = "https://rest.db.ripe.net";

/// Fetches the raw document behind a search URL.
pub trait RegistryTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, RegistryError>;
}

impl<T: RegistryTransport + ?Sized> RegistryTransport for &T {
    fn get(&self, url: &str) -> Result<Vec<u8>, RegistryError> {
        (**self).get(url)
    }
}

/// Registry search client over a [RegistryTransport].
#[derive(Debug, Clone)]
pub struct RegistryClient<T> {
    base_url: String,
    sources: RegistrySources,
    transport: T,
}

#[cfg(feature = "remote")]
impl RegistryClient<HttpTransport> {
    /// Creates a client querying `source` at `base_url` over HTTP.
    pub fn new(base_url: &str, source: &str) -> RegistryClient<HttpTransport> {
        RegistryClient::with_transport(base_url, source, HttpTransport::new())
    }
}

impl<T: RegistryTransport> RegistryClient<T> {
    pub fn with_transport(base_url: &str, source: &str, transport: T) -> RegistryClient<T> {
        RegistryClient {
            base_url: base_url.to_string(),
            sources: RegistrySources::new(source),
            transport,
        }
    }

    /// Adds alternative sources searched together with the primary one.
    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> RegistryClient<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources
            .alternatives
            .extend(alternatives.into_iter().map(Into::into));
        self
    }

    pub fn sources(&self) -> &RegistrySources {
        &self.sources
    }

    /// Runs a search and returns the raw XML document.
    pub fn search(&self, query: &RegistryQuery) -> Result<Vec<u8>, RegistryError> {
        let url = query.to_url(&self.base_url, &self.sources);
        debug!("registry search: {}", url);
        self.transport.get(&url)
    }

    /// The aut-num object (with its policy) of `autnum`.
    pub fn policy_by_autnum(&self, autnum: &str) -> Option<Vec<u8>> {
        match self.search(&RegistryQuery::new(autnum).flag("r")) {
            Ok(reply) => {
                debug!("policy received for {}", autnum);
                Some(reply)
            }
            Err(e) => {
                error!("failed to receive policy for {}: {}", autnum, e);
                None
            }
        }
    }

    /// An as-set, route-set or filter-set object.
    pub fn filter_set(&self, name: &str) -> Option<Vec<u8>> {
        self.search(&RegistryQuery::new(name).flag("r"))
            .map_err(|e| error!("get filter failed for {}: {}", name, e))
            .ok()
    }

    /// All route (and with `ipv6`, route6) objects originated by `autnum`.
    pub fn routes_by_autnum(&self, autnum: &str, ipv6: bool) -> Option<Vec<u8>> {
        let mut query = RegistryQuery::new(autnum)
            .inverse_attribute("origin")
            .type_filter("route");
        if ipv6 {
            query = query.type_filter("route6");
        }
        self.search(&query.flag("r"))
            .map_err(|e| error!("get all routes failed for {}: {}", autnum, e))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Answers from a fixed table and records every requested URL.
    #[derive(Debug, Default)]
    struct MockTransport {
        replies: HashMap<String, Result<Vec<u8>, RegistryError>>,
        requested: RefCell<Vec<String>>,
    }

    impl RegistryTransport for MockTransport {
        fn get(&self, url: &str) -> Result<Vec<u8>, RegistryError> {
            self.requested.borrow_mut().push(url.to_string());
            self.replies
                .get(url)
                .cloned()
                .unwrap_or(Err(RegistryError::NotFound))
        }
    }

    #[test]
    fn test_policy_by_autnum() {
        let mut transport = MockTransport::default();
        transport.replies.insert(
            "http://registry/search.xml?query-string=AS1&source=RIPE&source=RADB&flags=r"
                .to_string(),
            Ok(b"<objects/>".to_vec()),
        );
        let client = RegistryClient::with_transport("http://registry", "RIPE", &transport)
            .with_alternatives(["RADB"]);

        assert_eq!(client.policy_by_autnum("AS1"), Some(b"<objects/>".to_vec()));
        // failures become absent results
        assert_eq!(client.policy_by_autnum("AS2"), None);
        assert_eq!(transport.requested.borrow().len(), 2);
    }

    #[test]
    fn test_client_debug() {
        let transport = MockTransport::default();
        let client = RegistryClient::with_transport("http://registry", "RIPE", &transport)
            .with_alternatives(["RADB"]);
        let text = format!("{:?}", client);
        assert!(text.contains("http://registry"));
        assert!(text.contains("RADB"));
    }

    #[test]
    fn test_routes_query() {
        let mut transport = MockTransport::default();
        transport.replies.insert(
            "http://registry/search.xml?query-string=AS1&source=RIPE&inverse-attribute=origin\
             &type-filter=route&type-filter=route6&flags=r"
                .to_string(),
            Err(RegistryError::QueryLimitExceeded),
        );
        let client = RegistryClient::with_transport("http://registry", "RIPE", &transport);

        assert_eq!(client.routes_by_autnum("AS1", true), None);
        assert_eq!(client.filter_set("AS-FOO"), None);
        let requested = transport.requested.borrow();
        assert!(requested[0].ends_with("type-filter=route&type-filter=route6&flags=r"));
        assert_eq!(
            requested[1],
            "http://registry/search.xml?query-string=AS-FOO&source=RIPE&flags=r"
        );
        drop(requested);

        let query = RegistryQuery::new("AS1")
            .inverse_attribute("origin")
            .type_filter("route")
            .type_filter("route6")
            .flag("r");
        assert_eq!(
            client.search(&query).unwrap_err(),
            RegistryError::QueryLimitExceeded
        );
    }
}
