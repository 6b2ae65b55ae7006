use std::collections::HashSet;
use std::sync::Arc;

use prometheus::{
    Encoder, Gauge, GaugeVec, Registry, TextEncoder, register_gauge_vec_with_registry,
    register_gauge_with_registry,
};

use crate::errors::ApiError;
use crate::services::{RefreshService, TelemetryService, TelemetrySnapshot};

pub const SERIAL_NUMBER_LABEL: &str = "serialNumber";

/// Turns each scrape into a fresh device round-trip. Nothing is cached between scrapes.
pub struct MetricsService {
    refresh_service: Arc<RefreshService>,
    telemetry_service: Arc<TelemetryService>,
}

impl MetricsService {
    pub fn new(
        refresh_service: Arc<RefreshService>,
        telemetry_service: Arc<TelemetryService>,
    ) -> Self {
        Self {
            refresh_service,
            telemetry_service,
        }
    }

    /// Collects a snapshot with the current credential and renders it in the text exposition
    /// format.
    pub async fn scrape(&self) -> Result<String, ApiError> {
        let credential = self.refresh_service.current().await;
        let snapshot = self.telemetry_service.collect(&credential).await?;

        Ok(encode_snapshot(&snapshot)?)
    }
}

struct SnapshotGauges {
    registry: Registry,
    system_connected: Gauge,
    database_size: Gauge,
    database_percent: Gauge,
    watthours_today: Gauge,
    watthours_lifetime: Gauge,
    watts_now: Gauge,
    inverter_last_reported_watts: GaugeVec,
    inverter_max_reported_watts: GaugeVec,
}

impl SnapshotGauges {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let system_connected = register_gauge_with_registry!(
            "envoy_system_connected",
            "If the system is connected to the cloud",
            registry
        )?;

        let database_size = register_gauge_with_registry!(
            "envoy_database_size",
            "The size of the internal database",
            registry
        )?;

        let database_percent = register_gauge_with_registry!(
            "envoy_database_percent",
            "Percentage of the internal database",
            registry
        )?;

        let watthours_today = register_gauge_with_registry!(
            "envoy_production_watthours_today",
            "Amount of watt-hours produced today",
            registry
        )?;

        let watthours_lifetime = register_gauge_with_registry!(
            "envoy_production_watthours_lifetime",
            "Amount of watt-hours produced in total lifetime",
            registry
        )?;

        let watts_now = register_gauge_with_registry!(
            "envoy_production_watts_now",
            "Amount of watts currently produced",
            registry
        )?;

        let inverter_last_reported_watts = register_gauge_vec_with_registry!(
            "envoy_production_inverter_last_reported_watts",
            "Last reported amount of watts of an inverter",
            &[SERIAL_NUMBER_LABEL],
            registry
        )?;

        let inverter_max_reported_watts = register_gauge_vec_with_registry!(
            "envoy_production_inverter_max_reported_watts",
            "Max reported amount of watts of an inverter",
            &[SERIAL_NUMBER_LABEL],
            registry
        )?;

        Ok(Self {
            registry,
            system_connected,
            database_size,
            database_percent,
            watthours_today,
            watthours_lifetime,
            watts_now,
            inverter_last_reported_watts,
            inverter_max_reported_watts,
        })
    }

    fn observe(&self, snapshot: &TelemetrySnapshot) {
        let home = &snapshot.home;
        let production = &snapshot.production;

        self.system_connected.set(if home.network.web_comm { 1.0 } else { 0.0 });
        self.database_size.set(home.db_size as f64);
        self.database_percent.set(parse_percent(&home.db_percent_full));

        self.watthours_today.set(production.watt_hours_today as f64);
        self.watthours_lifetime.set(production.watt_hours_lifetime as f64);
        self.watts_now.set(production.watts_now as f64);

        // A repeated serial maps onto the same series; the later entry overwrites the earlier.
        let mut seen = HashSet::new();
        for inverter in &snapshot.inverters {
            if !seen.insert(inverter.serial_number.as_str()) {
                tracing::warn!(
                    serial_number = %inverter.serial_number,
                    "inverter reported more than once, keeping the last reading"
                );
            }
            let labels = [inverter.serial_number.as_str()];

            self.inverter_last_reported_watts
                .with_label_values(&labels)
                .set(inverter.last_report_watts as f64);
            self.inverter_max_reported_watts
                .with_label_values(&labels)
                .set(inverter.max_report_watts as f64);
        }
    }

    fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

/// Renders a snapshot into a registry of its own, so inverters that left the device do not
/// linger in later scrapes.
pub fn encode_snapshot(snapshot: &TelemetrySnapshot) -> Result<String, prometheus::Error> {
    let gauges = SnapshotGauges::new()?;
    gauges.observe(snapshot);
    gauges.encode()
}

/// Parses the device's padded percentage string. Unparseable input counts as zero.
pub fn parse_percent(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(percent) => percent,
        Err(e) => {
            tracing::warn!("database percent {value:?} is not a number, reporting 0: {e}");
            0.0
        }
    }
}
