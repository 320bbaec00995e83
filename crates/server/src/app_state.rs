use reqwest::Client;
use shared::endpoints::ServiceEndpoints;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) http: Client,
    pub(crate) endpoints: ServiceEndpoints,
}

impl AppState {
    pub(crate) fn new(endpoints: ServiceEndpoints) -> Self {
        Self {
            http: Client::new(),
            endpoints,
        }
    }
}
