use clap::ValueEnum;
use gremlab_core::{GremlabConfig, QueryResultAdapter, RenderedChart};
use tabled::Tabled;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
    Pie,
    Bar,
}

/// A key/value line of the effective configuration
#[derive(Tabled)]
pub struct ConfigRow {
    pub key: String,
    pub value: String,
}

impl ConfigRow {
    fn new(key: &str, value: impl ToString) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn from_config(config: &GremlabConfig) -> Vec<Self> {
        vec![
            Self::new("connection.host", &config.connection.host),
            Self::new("connection.port", config.connection.port),
            Self::new("connection.traversal_source", &config.connection.traversal_source),
            Self::new("display.output_dir", config.display.output_dir.display()),
        ]
    }
}

pub fn present(
    adapter: &QueryResultAdapter,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => {
            let table = adapter.to_table()?;
            if table.is_empty() {
                return Ok("NO RECORDS FOUND".to_string());
            }
            Ok(table.render())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&adapter.serialize())?),
        OutputFormat::Pie => Ok(chart_written("pie", adapter.plot_pie()?)),
        OutputFormat::Bar => Ok(chart_written("bar", adapter.plot_bar()?)),
    }
}

fn chart_written(kind: &str, chart: RenderedChart) -> String {
    format!("{} chart written to {}", kind, chart.path.display())
}
