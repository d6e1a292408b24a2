use crate::registry::{RegistryError, RegistryTransport};
use log::warn;
use std::io::Read;
use std::time::Duration;

/// Blocking HTTP transport backed by a shared `ureq` agent.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new() -> HttpTransport {
        HttpTransport::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> HttpTransport {
        HttpTransport {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport::new()
    }
}

impl RegistryTransport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, RegistryError> {
        let response = match self.agent.get(url).set("Accept", "application/xml").call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                let err = RegistryError::from_status(status);
                warn!("registry API: {}", err);
                return Err(err);
            }
            Err(e) => return Err(RegistryError::Transport(e.to_string())),
        };

        if response.status() != 200 {
            let err = RegistryError::Unknown(response.status());
            warn!("registry API: {}", err);
            return Err(err);
        }

        let mut body = vec![];
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| RegistryError::Transport(e.to_string()))?;
        Ok(body)
    }
}
