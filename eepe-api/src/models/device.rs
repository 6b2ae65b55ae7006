use serde::{Deserialize, Serialize};

/// `GET /api/v1/production`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub watt_hours_today: i64,
    pub watt_hours_lifetime: i64,
    pub watts_now: i64,
}

/// One element of `GET /api/v1/production/inverters`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InverterProduction {
    pub serial_number: String,
    pub last_report_watts: i64,
    pub max_report_watts: i64,
}

/// `GET /home.json`, reduced to the fields that are exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub db_size: i64,
    /// Reported as a padded numeric string, e.g. `"  3"`.
    pub db_percent_full: String,
    pub network: HomeNetwork,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeNetwork {
    pub web_comm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_ignores_unexported_fields() {
        let home: Home = serde_json::from_str(
            r#"{
                "software_build_epoch": 1690000000,
                "db_size": 512,
                "db_percent_full": "  10",
                "network": {"web_comm": true, "ever_reported_to_enlighten": true}
            }"#,
        )
        .unwrap();

        assert_eq!(home.db_size, 512);
        assert_eq!(home.db_percent_full, "  10");
        assert!(home.network.web_comm);
    }

    #[test]
    fn test_inverters_keep_device_order() {
        let inverters: Vec<InverterProduction> = serde_json::from_str(
            r#"[
                {"serialNumber":"B","lastReportDate":1,"devType":1,"lastReportWatts":10,"maxReportWatts":20},
                {"serialNumber":"A","lastReportDate":1,"devType":1,"lastReportWatts":11,"maxReportWatts":21}
            ]"#,
        )
        .unwrap();

        let serials: Vec<_> = inverters.iter().map(|i| i.serial_number.as_str()).collect();
        assert_eq!(serials, ["B", "A"]);
    }

    #[test]
    fn test_production_rejects_wrong_shape() {
        assert!(serde_json::from_str::<Production>(r#"{"wattsNow":"many"}"#).is_err());
    }
}
