//! traffic-predict entrypoint: classify the flows of one extracted-features CSV and
//! append the results to a result directory.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use traffic_predict::{
    config::{ExcessColumns, PredictConfig},
    features::{CsvFeatureLoader, FeatureSource, IpFilter},
    logging::{RunReport, StructuredLogger},
    model::OnnxClassifier,
    pipeline::PredictionPipeline,
};

#[derive(Parser, Debug)]
#[command(
    name = "traffic-predict",
    about = "Label extracted network flows as attack or normal",
    version
)]
struct Args {
    /// Extracted flow features CSV
    csv_path: PathBuf,
    /// Serialized ONNX model
    model_path: PathBuf,
    /// Directory that accumulates predictions and stats
    result_path: PathBuf,
    /// Optional JSON array of IPs to keep, e.g. '["10.0.0.5","10.0.0.6"]'
    filter_ips_json: Option<String>,
    /// JSON config file
    #[arg(long, env = "TRAFFIC_PREDICT_CONFIG", default_value = "config.json")]
    config: PathBuf,
    /// Policy when the table has more feature columns than the model takes
    #[arg(long, value_enum)]
    on_excess: Option<ExcessArg>,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExcessArg {
    Truncate,
    Fail,
}

impl From<ExcessArg> for ExcessColumns {
    fn from(arg: ExcessArg) -> Self {
        match arg {
            ExcessArg::Truncate => ExcessColumns::Truncate,
            ExcessArg::Fail => ExcessColumns::FailFast,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let (mut config, config_error) = match PredictConfig::load(&args.config) {
        Ok(c) => (c, None),
        Err(e) => (PredictConfig::default(), Some(e)),
    };
    let level = match args.verbose {
        0 => config.log.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    StructuredLogger::init(config.log.json, &level);
    if let Some(error) = config_error {
        warn!(%error, "using default config");
    }
    if let Some(excess) = args.on_excess {
        config.reconcile.excess_columns = excess.into();
    }

    let filter = IpFilter::from_arg(args.filter_ips_json.as_deref());
    let table = CsvFeatureLoader::new(&args.csv_path).load(filter.as_ref())?;
    if table.identifiers.is_empty() {
        if let Some(f) = &filter {
            warn!(ips = f.len(), "no traffic matches the filter ips");
        }
    }

    let pipeline = PredictionPipeline::new(&args.result_path, &config);
    let width_override = config.model.input_width;
    let summary = pipeline.run(table, || OnnxClassifier::load(&args.model_path, width_override))?;

    info!("Total flows: {}", summary.batch.total);
    info!("Number of attacks: {}", summary.batch.attack);
    info!("Number of normals: {}", summary.batch.normal);

    if config.log.json {
        let result_dir = args.result_path.display().to_string();
        let report = RunReport {
            result_dir: &result_dir,
            summary: &summary,
            ip_filter: filter.as_ref().map(IpFilter::len),
        };
        StructuredLogger::emit_json(&report, &mut std::io::stdout())?;
    }
    Ok(())
}
