use anyhow::Context;
use dispcore::prelude::{DispResult, DisplacementError, SeriesSource};
use log::debug;
use tokio::runtime::{Builder as TokioBuilder, Runtime};

/// Remote tables for one analysis center.
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoints {
    pub station_directory: String,
    pub series_template: String,
}

impl Endpoints {
    pub fn series_url(&self, station: &str) -> String {
        self.series_template.replace("{station}", station)
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Blocking HTTP retrieval of station tables and time series.
pub struct HttpSource {
    client: reqwest::Client,
    runtime: Runtime,
    endpoints: Endpoints,
}

impl HttpSource {
    pub fn new(endpoints: Endpoints) -> anyhow::Result<Self> {
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for data retrieval")?;
        let client = reqwest::Client::builder()
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            runtime,
            endpoints,
        })
    }

    fn fetch_lines(&self, url: &str) -> DispResult<Vec<String>> {
        debug!("fetching {}", url);
        let source_error =
            |err: reqwest::Error| DisplacementError::Source(format!("{}: {}", url, err));
        self.runtime.block_on(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(source_error)?;
            let text = response.text().await.map_err(source_error)?;
            Ok(split_lines(&text))
        })
    }
}

impl SeriesSource for HttpSource {
    fn station_directory(&self) -> DispResult<Vec<String>> {
        self.fetch_lines(&self.endpoints.station_directory)
    }

    fn series(&self, station: &str) -> DispResult<Vec<String>> {
        self.fetch_lines(&self.endpoints.series_url(station))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispcore::records::Provider;

    #[test]
    fn series_url_substitutes_station() {
        let endpoints = Endpoints {
            station_directory: Provider::Ngl.station_directory_url().to_string(),
            series_template: Provider::Ngl.series_url_template().to_string(),
        };
        assert_eq!(
            endpoints.series_url("P500"),
            "http://geodesy.unr.edu/gps_timeseries/tenv3/IGS14/P500.tenv3"
        );
    }

    #[test]
    fn response_text_splits_on_any_newline() {
        assert_eq!(split_lines("a b\r\nc d\n"), vec!["a b", "c d"]);
    }

    #[test]
    fn unreachable_host_is_a_source_error() {
        let source = HttpSource::new(Endpoints {
            station_directory: "http://127.0.0.1:9/table".into(),
            series_template: "http://127.0.0.1:9/{station}".into(),
        })
        .unwrap();
        let err = source.series("ABCD").unwrap_err();
        assert!(matches!(err, DisplacementError::Source(ref msg) if msg.contains("/ABCD")));
    }
}
