use prometheus::{Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub orders_processed_total: IntCounterVec,
    pub deliveries_total: IntCounterVec,
    pub drivers_available: IntGauge,
    pub preparation_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let orders_processed_total = IntCounterVec::new(
            Opts::new(
                "orders_processed_total",
                "Total preparation runs by outcome",
            ),
            &["outcome"],
        )
        .expect("valid orders_processed_total metric");

        let deliveries_total = IntCounterVec::new(
            Opts::new("deliveries_total", "Total delivery completions by outcome"),
            &["outcome"],
        )
        .expect("valid deliveries_total metric");

        let drivers_available = IntGauge::new(
            "drivers_available",
            "Current number of available drivers",
        )
        .expect("valid drivers_available metric");

        let preparation_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "preparation_seconds",
                "Simulated preparation latency in seconds",
            ),
            &["outcome"],
        )
        .expect("valid preparation_seconds metric");

        registry
            .register(Box::new(orders_processed_total.clone()))
            .expect("register orders_processed_total");
        registry
            .register(Box::new(deliveries_total.clone()))
            .expect("register deliveries_total");
        registry
            .register(Box::new(drivers_available.clone()))
            .expect("register drivers_available");
        registry
            .register(Box::new(preparation_seconds.clone()))
            .expect("register preparation_seconds");

        Self {
            registry,
            orders_processed_total,
            deliveries_total,
            drivers_available,
            preparation_seconds,
        }
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
