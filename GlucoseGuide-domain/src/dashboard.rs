use std::sync::Arc;
use tracing::{debug, info};

use glucose_guide_data::{Clock, ReadingRepositoryTrait};
use crate::entities::{CreateReadingRequest, HealthAdvice, Period, Reading, Stats};
use crate::presentation::{self, ChartPoint};
use crate::services::{
    calculate_stats, filter_by_period, generate_health_advice, validate_create_request,
    ReadingServiceError,
};

/// View state behind the dashboard screen
///
/// Owns the loaded readings, the selected period and everything derived from
/// them. Every mutation re-derives the filtered list and stats in full.
#[derive(Debug)]
pub struct GlucoseDashboard<R: ReadingRepositoryTrait> {
    repository: R,
    clock: Arc<dyn Clock>,
    records: Vec<Reading>,
    period: Period,
    filtered_records: Vec<Reading>,
    stats: Stats,
}

impl<R: ReadingRepositoryTrait> GlucoseDashboard<R> {
    /// Create an empty dashboard; call [`GlucoseDashboard::load`] to populate it
    pub fn new(repository: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            records: Vec::new(),
            period: Period::default(),
            filtered_records: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Refetch all readings and re-derive the view
    pub fn load(&mut self) {
        self.records = self.repository.get_all();
        self.refresh();
        info!(
            "Loaded {} readings, {} in {} period",
            self.records.len(),
            self.filtered_records.len(),
            self.period
        );
    }

    /// Record a reading and reload
    pub fn add_record(&mut self, date: &str, value: u32) -> Reading {
        let reading = self.repository.add(date, value);
        self.load();
        reading
    }

    /// Validate a form submission, then record it
    pub fn submit(&mut self, request: &CreateReadingRequest) -> Result<Reading, ReadingServiceError> {
        validate_create_request(request)?;
        Ok(self.add_record(&request.date, request.value))
    }

    /// Delete a reading and reload
    pub fn delete_record(&mut self, id: &str) {
        self.repository.delete(id);
        self.load();
    }

    /// Switch period using the readings already loaded
    pub fn set_period(&mut self, period: Period) {
        self.period = period;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.filtered_records = filter_by_period(&self.records, self.period, self.clock.as_ref());
        self.stats = calculate_stats(&self.filtered_records);
        debug!("Recomputed stats for {} period: {:?}", self.period, self.stats);
    }

    /// Health assessment for the current period
    pub fn advice(&self) -> HealthAdvice {
        generate_health_advice(&self.stats, &self.filtered_records)
    }

    /// Trend chart points for the current period, oldest first
    pub fn chart_series(&self) -> Vec<ChartPoint> {
        presentation::chart_series(&self.filtered_records)
    }

    pub fn records(&self) -> &[Reading] {
        &self.records
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn filtered_records(&self) -> &[Reading] {
        &self.filtered_records
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// The repository the dashboard reads and writes through
    pub fn repository(&self) -> &R {
        &self.repository
    }
}
