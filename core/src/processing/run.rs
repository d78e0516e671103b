use crate::prelude::{BoundingBox, DispResult, DisplacementError, RunSettings, SeriesSource};
use crate::processing::displacement::{
    compute_displacement, Displacement, ReferenceCorrection, StationOutcome,
};
use crate::records::{parse_series, parse_station_line, Provider, SeriesSample, StationLocation};
use crate::telemetry::{LogManager, RunMetrics};

/// Stations of a directory listing that fall inside `bbox`, in listing order.
pub fn select_stations(
    lines: &[String],
    provider: Provider,
    bbox: &BoundingBox,
    metrics: &RunMetrics,
) -> Vec<StationLocation> {
    lines
        .iter()
        .filter_map(|line| {
            let station = parse_station_line(line, provider);
            if station.is_none() {
                metrics.record_malformed(1);
            }
            station
        })
        .filter(|station| bbox.contains(station.longitude, station.latitude))
        .collect()
}

/// Outcome of a whole displacement run.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub displacements: Vec<Displacement>,
    /// Set when the reference station lacked data; no rows are produced then.
    pub reference_gap: bool,
}

/// Drives retrieval and displacement computation for every selected station.
pub struct DisplacementRun {
    settings: RunSettings,
    logger: LogManager,
    metrics: RunMetrics,
}

impl DisplacementRun {
    pub fn new(settings: RunSettings) -> Self {
        Self {
            settings,
            logger: LogManager::new(),
            metrics: RunMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    fn load_series(&self, source: &dyn SeriesSource, station: &str) -> DispResult<Vec<SeriesSample>> {
        let lines = source.series(station)?;
        let (samples, skipped) = parse_series(&lines, self.settings.provider);
        self.metrics.record_malformed(skipped);
        Ok(samples)
    }

    fn resolve_reference(
        &self,
        source: &dyn SeriesSource,
    ) -> DispResult<Option<ReferenceCorrection>> {
        let Some(reference) = self.settings.reference.as_deref() else {
            return Ok(Some(ReferenceCorrection::default()));
        };
        let samples = self.load_series(source, reference)?;
        match ReferenceCorrection::from_series(
            reference,
            &samples,
            &self.settings.window1,
            &self.settings.window2,
        ) {
            Ok(correction) => {
                self.logger.record(&format!(
                    "reference {} correction E {:.3} N {:.3} U {:.3} mm",
                    reference, correction.delta_east, correction.delta_north, correction.delta_up
                ));
                Ok(Some(correction))
            }
            Err(DisplacementError::ReferenceDataGap { station }) => {
                self.logger
                    .warn(&format!("reference site {} has missing data", station));
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Resolves the reference first, then processes stations in directory order.
    ///
    /// A reference data gap yields an empty outcome with `reference_gap` set;
    /// transport failures and zero-sigma samples abort the run.
    pub fn execute(&self, source: &dyn SeriesSource) -> DispResult<RunOutcome> {
        let directory = source.station_directory()?;

        let Some(reference) = self.resolve_reference(source)? else {
            return Ok(RunOutcome {
                displacements: Vec::new(),
                reference_gap: true,
            });
        };

        let stations = select_stations(
            &directory,
            self.settings.provider,
            &self.settings.bbox,
            &self.metrics,
        );
        self.logger.record(&format!(
            "{} stations inside the box from {} directory rows",
            stations.len(),
            directory.len()
        ));

        let mut displacements = Vec::with_capacity(stations.len());
        for station in &stations {
            self.metrics.record_considered();
            let samples = self.load_series(source, &station.id)?;
            match compute_displacement(
                station,
                &samples,
                &self.settings.window1,
                &self.settings.window2,
                &reference,
                self.settings.absolute_vertical,
            )? {
                StationOutcome::Displaced(disp) => {
                    self.metrics.record_emitted();
                    displacements.push(disp);
                }
                StationOutcome::Skip { epoch } => {
                    self.metrics.record_skipped();
                    self.logger.record(&format!(
                        "skipping {}: {}",
                        station.id,
                        DisplacementError::InsufficientEpochData {
                            station: station.id.clone(),
                            epoch,
                        }
                    ));
                }
            }
        }

        let snapshot = self.metrics.snapshot();
        self.logger.record(&format!(
            "run complete: {} considered, {} emitted, {} skipped, {} malformed lines",
            snapshot.considered, snapshot.emitted, snapshot.skipped, snapshot.malformed
        ));

        Ok(RunOutcome {
            displacements,
            reference_gap: false,
        })
    }
}
