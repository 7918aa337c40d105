use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub snapshot_refreshes_total: IntCounter,
    pub renders_total: IntCounterVec,
    pub render_latency_seconds: HistogramVec,
    pub map_overlays: IntGauge,
    pub calendar_sessions: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let snapshot_refreshes_total = IntCounter::new(
            "snapshot_refreshes_total",
            "Total number of trip/driver snapshot replacements",
        )
        .expect("valid snapshot_refreshes_total metric");

        let renders_total = IntCounterVec::new(
            Opts::new("renders_total", "Total view renders by view"),
            &["view"],
        )
        .expect("valid renders_total metric");

        let render_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "render_latency_seconds",
                "Latency of view derivation in seconds",
            ),
            &["view"],
        )
        .expect("valid render_latency_seconds metric");

        let map_overlays = IntGauge::new("map_overlays", "Overlays currently placed on the map")
            .expect("valid map_overlays metric");

        let calendar_sessions = IntGauge::new("calendar_sessions", "Open calendar sessions")
            .expect("valid calendar_sessions metric");

        registry
            .register(Box::new(snapshot_refreshes_total.clone()))
            .expect("register snapshot_refreshes_total");
        registry
            .register(Box::new(renders_total.clone()))
            .expect("register renders_total");
        registry
            .register(Box::new(render_latency_seconds.clone()))
            .expect("register render_latency_seconds");
        registry
            .register(Box::new(map_overlays.clone()))
            .expect("register map_overlays");
        registry
            .register(Box::new(calendar_sessions.clone()))
            .expect("register calendar_sessions");

        Self {
            registry,
            snapshot_refreshes_total,
            renders_total,
            render_latency_seconds,
            map_overlays,
            calendar_sessions,
        }
    }

    pub fn observe_render(&self, view: &str, elapsed_seconds: f64) {
        self.renders_total.with_label_values(&[view]).inc();
        self.render_latency_seconds
            .with_label_values(&[view])
            .observe(elapsed_seconds);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
