//! Background fetch jobs for the dashboard collections.
//!
//! Each endpoint is fetched on its own short-lived thread; results are sent
//! over a channel the controller drains once per frame. The controller only
//! applies a load once every endpoint has reported.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

use crate::api::{ApiClient, ApiError, ComparisonRecord, DriverRecord, ForecastRecord};

/// One settled endpoint fetch.
pub(crate) enum FetchMessage {
    Drivers(Result<Vec<DriverRecord>, ApiError>),
    Forecasts(Result<Vec<ForecastRecord>, ApiError>),
    Comparison(Result<Vec<ComparisonRecord>, ApiError>),
}

/// Accumulates endpoint results until all three have settled.
#[derive(Default)]
pub(crate) struct PendingLoad {
    pub drivers: Option<Result<Vec<DriverRecord>, ApiError>>,
    pub forecasts: Option<Result<Vec<ForecastRecord>, ApiError>>,
    pub comparison: Option<Result<Vec<ComparisonRecord>, ApiError>>,
}

impl PendingLoad {
    pub fn accept(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Drivers(result) => self.drivers = Some(result),
            FetchMessage::Forecasts(result) => self.forecasts = Some(result),
            FetchMessage::Comparison(result) => self.comparison = Some(result),
        }
    }

    /// True once every endpoint has reported.
    pub fn settled(&self) -> bool {
        self.drivers.is_some() && self.forecasts.is_some() && self.comparison.is_some()
    }
}

pub(crate) struct ControllerJobs {
    message_tx: Sender<FetchMessage>,
    message_rx: Receiver<FetchMessage>,
    fetch_in_progress: bool,
}

impl ControllerJobs {
    pub fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            message_tx,
            message_rx,
            fetch_in_progress: false,
        }
    }

    pub fn try_recv_message(&self) -> Result<FetchMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    #[cfg(test)]
    pub fn message_sender(&self) -> Sender<FetchMessage> {
        self.message_tx.clone()
    }

    pub fn fetch_in_progress(&self) -> bool {
        self.fetch_in_progress
    }

    pub fn clear_fetch(&mut self) {
        self.fetch_in_progress = false;
    }

    /// Issue the three endpoint fetches concurrently.
    pub fn spawn_fetch_all(&mut self, client: ApiClient) {
        self.fetch_in_progress = true;

        let tx = self.message_tx.clone();
        let drivers_client = client.clone();
        thread::spawn(move || {
            let _ = tx.send(FetchMessage::Drivers(drivers_client.drivers()));
        });

        let tx = self.message_tx.clone();
        let forecasts_client = client.clone();
        thread::spawn(move || {
            let _ = tx.send(FetchMessage::Forecasts(forecasts_client.forecasts()));
        });

        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let _ = tx.send(FetchMessage::Comparison(client.comparison()));
        });
    }
}
