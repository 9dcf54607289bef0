use super::*;

/// Trait for shaping crawl events before they reach a sink.
///
/// An `EventFormatter` defines how a [`CrawlEvent`] is converted into the
/// output type carried on the event channel, and how a sink recognizes the
/// idle signal that marks the end of a run.
pub trait EventFormatter: Send + Sync + 'static {
    type Output: Send + Sync + 'static + Clone + Debug;

    fn format(&self, event: &CrawlEvent) -> Self::Output;

    /// The value broadcast when the crawl becomes idle.
    fn idle_output(&self) -> Self::Output;

    /// `true` when `output` is the idle signal.
    fn is_idle_signal(&self, output: &Self::Output) -> bool;
}

/// Emits events as structured Rust values ([`CrawlEvent`]).
pub struct StructuredFormatter;
/// Emits events as JSON strings.
pub struct JsonFormatter;

impl EventFormatter for StructuredFormatter {
    type Output = CrawlEvent;

    fn format(&self, event: &CrawlEvent) -> Self::Output {
        event.clone()
    }

    fn idle_output(&self) -> Self::Output {
        CrawlEvent::Idle
    }

    fn is_idle_signal(&self, output: &Self::Output) -> bool {
        matches!(output, CrawlEvent::Idle)
    }
}

impl Default for StructuredFormatter {
    fn default() -> Self {
        Self
    }
}

impl EventFormatter for JsonFormatter {
    type Output = String;

    fn format(&self, event: &CrawlEvent) -> Self::Output {
        serde_json::to_string(event).unwrap()
    }

    fn idle_output(&self) -> Self::Output {
        serde_json::to_string(&CrawlEvent::Idle).unwrap()
    }

    fn is_idle_signal(&self, output: &Self::Output) -> bool {
        *output == self.idle_output()
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchErrorKind;

    #[test]
    fn test_formatter_structured_passes_events_through() {
        let event = CrawlEvent::Crawled {
            address: "http://a/".to_string(),
        };
        assert_eq!(StructuredFormatter.format(&event), event);
        assert!(StructuredFormatter.is_idle_signal(&StructuredFormatter.idle_output()));
        assert!(!StructuredFormatter.is_idle_signal(&event));
    }

    #[test]
    fn test_formatter_json_round_trips() {
        let event = CrawlEvent::FetchFailed {
            address: "http://x/".to_string(),
            reason: FetchErrorKind::ConnectFailure,
        };
        let json = JsonFormatter.format(&event);
        let back: CrawlEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert!(JsonFormatter.is_idle_signal(&JsonFormatter.idle_output()));
        assert!(!JsonFormatter.is_idle_signal(&json));
    }
}
