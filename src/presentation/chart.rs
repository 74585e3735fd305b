use serde::Serialize;

use crate::metrics::MetricSeries;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricDimension {
    Cpu,
    Memory,
    Disk,
}

impl MetricDimension {
    pub const ALL: [Self; 3] = [Self::Cpu, Self::Memory, Self::Disk];

    pub fn label(self) -> &'static str {
        match self {
            Self::Cpu => "CPU Usage (%)",
            Self::Memory => "Memory Usage (%)",
            Self::Disk => "Disk Usage (%)",
        }
    }

    pub fn border_color(self) -> &'static str {
        match self {
            Self::Cpu => "rgb(75, 192, 192)",
            Self::Memory => "rgb(255, 99, 132)",
            Self::Disk => "rgb(54, 162, 235)",
        }
    }

    pub fn background_color(self) -> &'static str {
        match self {
            Self::Cpu => "rgba(75, 192, 192, 0.2)",
            Self::Memory => "rgba(255, 99, 132, 0.2)",
            Self::Disk => "rgba(54, 162, 235, 0.2)",
        }
    }

    pub fn values(self, series: &MetricSeries) -> &[f64] {
        match self {
            Self::Cpu => &series.cpu,
            Self::Memory => &series.memory,
            Self::Disk => &series.disk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: &'static str,
    pub data: Vec<f64>,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub fill: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Shapes a series for the chart renderer: one shared label axis and one
/// dataset per dimension. Whatever lengths the input has are passed through.
pub fn chart_data(series: &MetricSeries) -> ChartData {
    ChartData {
        labels: series.timestamps.clone(),
        datasets: MetricDimension::ALL
            .into_iter()
            .map(|dimension| ChartDataset {
                label: dimension.label(),
                data: dimension.values(series).to_vec(),
                border_color: dimension.border_color(),
                background_color: dimension.background_color(),
                fill: true,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::metrics::MetricSeries;

    use super::{MetricDimension, chart_data};

    #[test]
    fn one_dataset_per_dimension_sharing_the_axis() {
        let series = MetricSeries {
            timestamps: vec!["t0".into(), "t1".into(), "t2".into(), "t3".into()],
            cpu: vec![10.0, 20.0, 30.0, 40.0],
            memory: vec![11.0, 21.0, 31.0, 41.0],
            disk: vec![12.0, 22.0, 32.0, 42.0],
        };

        let chart = chart_data(&series);

        assert_eq!(chart.labels, series.timestamps);
        assert_eq!(chart.datasets.len(), 3);
        for (dataset, dimension) in chart.datasets.iter().zip(MetricDimension::ALL) {
            assert_eq!(dataset.data.len(), series.len());
            assert_eq!(dataset.label, dimension.label());
            assert!(dataset.fill);
        }
        assert_eq!(chart.datasets[1].data, series.memory);
    }

    #[test]
    fn empty_series_yields_empty_datasets() {
        let chart = chart_data(&MetricSeries::default());

        assert!(chart.labels.is_empty());
        assert_eq!(chart.datasets.len(), 3);
        assert!(chart.datasets.iter().all(|dataset| dataset.data.is_empty()));
    }

    #[test]
    fn partial_series_is_passed_through() {
        let series = MetricSeries {
            timestamps: vec!["t0".into(), "t1".into()],
            cpu: vec![10.0, 20.0],
            memory: vec![],
            disk: vec![12.0],
        };

        let chart = chart_data(&series);

        assert_eq!(chart.datasets[0].data.len(), 2);
        assert!(chart.datasets[1].data.is_empty());
        assert_eq!(chart.datasets[2].data, vec![12.0]);
    }

    #[test]
    fn serializes_in_chart_library_shape() {
        let chart = chart_data(&MetricSeries::default());
        let value = serde_json::to_value(&chart).expect("chart should serialize");

        assert_eq!(value["datasets"][0]["borderColor"], "rgb(75, 192, 192)");
        assert_eq!(
            value["datasets"][2]["backgroundColor"],
            "rgba(54, 162, 235, 0.2)"
        );
    }
}
