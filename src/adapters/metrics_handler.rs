use prometheus::{CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;

pub struct MetricsCollector {
    registry: Registry,

    // Relay metrics
    pub relay_requests_total: CounterVec,
    pub relay_duration: Histogram,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let relay_requests_total = CounterVec::new(
            Opts::new(
                "segment_builder_relay_requests_total",
                "Total number of segments relayed, by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(relay_requests_total.clone()))?;

        let relay_duration = Histogram::with_opts(HistogramOpts::new(
            "segment_builder_relay_duration_seconds",
            "Time spent forwarding a segment to the webhook",
        ))?;
        registry.register(Box::new(relay_duration.clone()))?;

        Ok(Self {
            registry,
            relay_requests_total,
            relay_duration,
        })
    }

    /// Count one relay attempt under the given outcome label
    pub fn record_relay(&self, outcome: &str, seconds: f64) {
        self.relay_requests_total
            .with_label_values(&[outcome])
            .inc();
        self.relay_duration.observe(seconds);
    }

    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsHandler {
    collector: Arc<MetricsCollector>,
}

impl MetricsHandler {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }

    pub async fn metrics(&self) -> String {
        self.collector.encode().unwrap_or_else(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
            String::from("# Error encoding metrics\n")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new();
        assert!(collector.is_ok());
    }

    #[test]
    fn test_metrics_encoding() {
        let collector = MetricsCollector::new().unwrap();

        collector.record_relay("delivered", 0.05);
        collector.record_relay("transport", 1.2);

        let metrics_text = collector.encode().unwrap();
        assert!(metrics_text.contains("segment_builder_relay_requests_total"));
        assert!(metrics_text.contains("outcome=\"delivered\""));
        assert!(metrics_text.contains("segment_builder_relay_duration_seconds"));
    }

    #[tokio::test]
    async fn test_metrics_handler() {
        let collector = Arc::new(MetricsCollector::new().unwrap());
        let handler = MetricsHandler::new(collector.clone());

        collector.record_relay("rejected", 0.01);

        let metrics = handler.metrics().await;
        assert!(metrics.contains("outcome=\"rejected\""));
    }
}
