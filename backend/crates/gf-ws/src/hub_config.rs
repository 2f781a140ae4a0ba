/// Configuration for one stream's hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub stream_id: String,
    /// Registrations beyond this are rejected
    pub max_subscribers: usize,
}

impl HubConfig {
    pub fn new(stream_id: impl Into<String>, max_subscribers: usize) -> Self {
        Self {
            stream_id: stream_id.into(),
            max_subscribers,
        }
    }
}
