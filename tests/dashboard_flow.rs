//! End-to-end dashboard flow against a loopback API stub.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use forestcast::config::DashboardConfig;
use forestcast::egui_app::controller::DashboardController;
use forestcast::format;

const FORECASTS_JSON: &str = r#"[
    {"Region": "NCR", "Year": 2024, "SARIMAX_Forecast": 1050.0},
    {"Region": "NCR", "Year": 2025, "SARIMAX_Forecast": 950.0},
    {"Region": "CAR", "Year": 2024, "SARIMAX_Forecast": 510.0},
    {"Region": "CAR", "Year": 2025, "SARIMAX_Forecast": 520.0}
]"#;

const COMPARISON_JSON: &str = r#"[
    {"Region": "NCR", "Year": 2023, "Actual": 1000.0, "SARIMAX_Forecast": 940.0, "AE": 60.0, "APE": 6.0},
    {"Region": "NCR", "Year": 2024, "Actual": 1100.0, "SARIMAX_Forecast": 1050.0, "AE": 50.0, "APE": 4.5},
    {"Region": "CAR", "Year": 2024, "Actual": 600.0, "SARIMAX_Forecast": 510.0, "AE": 90.0, "APE": 15.0}
]"#;

const DRIVERS_JSON: &str = r#"[
    {"Region": "NCR", "Driver": "const", "Coefficient": 1200.0, "PValue": 0.9},
    {"Region": "NCR", "Driver": "Logging", "Coefficient": -0.52, "PValue": 0.0002},
    {"Region": "NCR", "Driver": "Roads_km", "Coefficient": 0.25, "PValue": 0.000123}
]"#;

#[derive(Clone, Copy)]
enum Endpoint {
    Json(&'static str),
    Status(u16),
}

fn handle(mut stream: TcpStream, drivers: Endpoint, forecasts: Endpoint, comparison: Endpoint) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(read) => request.extend_from_slice(&chunk[..read]),
        }
    }
    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/");
    let endpoint = match path {
        "/drivers" => drivers,
        "/forecasts" => forecasts,
        "/comparison" => comparison,
        _ => Endpoint::Status(404),
    };
    let response = match endpoint {
        Endpoint::Json(body) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        ),
        Endpoint::Status(code) => {
            format!("HTTP/1.1 {code} Error\r\nContent-Length: 0\r\n\r\n")
        }
    };
    let _ = stream.write_all(response.as_bytes());
}

fn spawn_api(drivers: Endpoint, forecasts: Endpoint, comparison: Endpoint) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        while let Ok((stream, _)) = listener.accept() {
            handle(stream, drivers, forecasts, comparison);
        }
    });
    format!("http://{addr}")
}

fn controller_for(base_url: String) -> DashboardController {
    let config = DashboardConfig {
        api_base_url: base_url,
        forecast_target_year: 2025,
        flag_threshold_pct: 5.0,
    };
    let mut controller = DashboardController::new(config);
    controller.start_load();
    controller
}

fn wait_until_loaded(controller: &mut DashboardController) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !controller.is_loaded() {
        assert!(
            Instant::now() < deadline,
            "load did not settle; status: {}",
            controller.ui.status.text
        );
        controller.poll_jobs();
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn full_load_populates_every_section() {
    let base = spawn_api(
        Endpoint::Json(DRIVERS_JSON),
        Endpoint::Json(FORECASTS_JSON),
        Endpoint::Json(COMPARISON_JSON),
    );
    let mut controller = controller_for(base);
    wait_until_loaded(&mut controller);

    assert_eq!(controller.ui.regions, ["CAR", "NCR"]);
    assert_eq!(controller.ui.accuracy.table.rows.len(), 3);

    let summary = controller.ui.overview.summary.clone().unwrap();
    // (60 + 50 + 90) / 3
    assert_eq!(summary.mean_ae, "67 ha");
    assert_eq!(summary.region_count, "2");
    assert_eq!(summary.comparison_span, "2023-2024");
}

#[test]
fn region_selection_drives_stats_chart_and_cards() {
    let base = spawn_api(
        Endpoint::Json(DRIVERS_JSON),
        Endpoint::Json(FORECASTS_JSON),
        Endpoint::Json(COMPARISON_JSON),
    );
    let mut controller = controller_for(base);
    wait_until_loaded(&mut controller);

    controller.select_forecast_region(Some("NCR".into()));
    let stats = controller.ui.forecast.stats.clone();
    assert_eq!(stats.current_caption, "Actual tree cover, 2024");
    assert_eq!(stats.current_value, "1,100 ha");
    assert_eq!(stats.forecast_value, "950 ha");
    // mean AE = 55 over latest actual 1100 -> 5%
    assert_eq!(stats.mean_ae_pct, "5.00%");
    assert_eq!(stats.mean_ape_pct, "5.25%");
    assert!(controller.chart().instance().is_some());

    // Re-selecting replaces the chart instead of stacking instances.
    controller.select_forecast_region(Some("NCR".into()));
    assert_eq!(controller.chart().renders(), 2);
    assert_eq!(controller.chart().instance().unwrap().generation(), 2);

    controller.select_driver_region(Some("NCR".into()));
    let cards = &controller.ui.drivers.cards;
    let logging = cards.iter().find(|c| c.driver == "Logging").unwrap();
    assert_eq!(logging.coefficient, "-0.5200");
    assert_eq!(logging.positive, Some(false));
    let roads = cards.iter().find(|c| c.driver == "Roads").unwrap();
    assert_eq!(roads.coefficient, "0.2500");
    assert_eq!(roads.p_value, "1.23e-4");

    controller.select_accuracy_region(Some("CAR".into()));
    let table = &controller.ui.accuracy.table;
    assert_eq!(table.rows.len(), 1);
    assert!(table.rows[0].ae_flagged);
    assert!(table.rows[0].ape_flagged);
}

#[test]
fn failed_forecast_fetch_degrades_without_crashing() {
    let base = spawn_api(
        Endpoint::Json(DRIVERS_JSON),
        Endpoint::Status(503),
        Endpoint::Json(COMPARISON_JSON),
    );
    let mut controller = controller_for(base);
    wait_until_loaded(&mut controller);

    assert!(controller.ui.regions.is_empty());
    // Comparison data still renders even though forecasts failed.
    assert_eq!(controller.ui.accuracy.table.rows.len(), 3);

    controller.select_forecast_region(Some("NCR".into()));
    let stats = controller.ui.forecast.stats.clone();
    assert_eq!(stats.current_value, "1,100 ha");
    assert_eq!(stats.forecast_value, format::UNAVAILABLE);
}
