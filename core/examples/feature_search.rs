// conveyor/examples/feature_search.rs

use conveyor::features::{Dataset, FeatureSelector, FormulaGenerator, ModelScore};
use conveyor::{Context, Executor, Pipeline, PipelineData, Step};
use tracing::info;

type Data = PipelineData<Dataset, Vec<ModelScore>>;

/// Stand-in for a model-selection step: scores each feature by its absolute
/// correlation with the target.
fn correlation_scores(data: Data, _ctx: &Context) -> anyhow::Result<Data> {
  let dataset = &data.payload;
  let Some(target) = dataset.target.as_ref() else {
    anyhow::bail!("correlation scoring needs a target column");
  };

  let importances: Vec<f64> = (0..dataset.n_features())
    .map(|i| correlation(&dataset.column(i), target).abs())
    .collect();
  let score = importances.iter().cloned().fold(0.0, f64::max);

  let record = ModelScore::new("correlation", score).with_importances(importances);
  Ok(data.set_auxiliary(vec![record]))
}

fn correlation(x: &[f64], y: &[f64]) -> f64 {
  let n = x.len() as f64;
  let mean_x = x.iter().sum::<f64>() / n;
  let mean_y = y.iter().sum::<f64>() / n;
  let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
  for (a, b) in x.iter().zip(y) {
    cov += (a - mean_x) * (b - mean_y);
    var_x += (a - mean_x).powi(2);
    var_y += (b - mean_y).powi(2);
  }
  if var_x == 0.0 || var_y == 0.0 {
    return 0.0;
  }
  cov / (var_x.sqrt() * var_y.sqrt())
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Feature Search Example ---");

  // y = x0 * x1, which no single input column explains.
  let rows: Vec<Vec<f64>> = (1..=20).map(|i| vec![i as f64, (i % 7) as f64 + 1.0, (i % 3) as f64]).collect();
  let target: Vec<f64> = rows.iter().map(|r| r[0] * r[1]).collect();
  let dataset = Dataset::new(rows, Some(target))?;

  let pipeline = Pipeline::<Dataset, Vec<ModelScore>>::builder()
    .named("feature_search")
    .then(FormulaGenerator::from_symbols(["+", "-", "*"])?.with_limit(6).with_seed(3).into_step("generate"))
    .then(Step::new("score", correlation_scores))
    .then(FeatureSelector::new(3).into_step("select"))
    .build()?;

  let (_ctx, result) = Executor::new().with_epochs(4).run(&pipeline, dataset)?;

  info!("Features kept: {}", result.payload.n_features());
  for record in result.auxiliary.unwrap_or_default() {
    info!("{} best correlation: {:.3}", record.model, record.score);
  }

  Ok(())
}
