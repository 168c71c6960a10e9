//! Plot commands (`peak`, `line`, `euclidean`)

use anyhow::Result;
use console::style;
use std::path::Path;
use tracing::{debug, info};

use super::PlotArgs;
use crate::config::load_plot_config;
use crate::git::{CommitSource, GitCommitSource};
use crate::models::TimeUnit;
use crate::peaks::TurningPoints;
use crate::render::{self, commits_title, terminal, Chart, OutputFormat, RenderMode};
use crate::transform::{process, ShiftDirection, TransformOptions};

/// Run a plot command
pub fn run(mode: RenderMode, args: &PlotArgs, config_path: Option<&Path>) -> Result<()> {
    // Validate everything before touching any repository
    let unit: TimeUnit = args.timeunit.parse()?;
    let shift = ShiftDirection::from_flag(args.shift.as_deref())?;
    if let Some(out) = &args.out {
        let format = OutputFormat::from_path(out)?;
        debug!("Output format: {}", format);
    }
    let config = load_plot_config(config_path)?;

    let options = TransformOptions {
        accumulate: args.acc,
        normalise: args.norm,
        shift,
        on_constant: config.normalise.on_constant,
    };

    let source = GitCommitSource::new(config.history.clone());
    let chart = build_chart(mode, &source, &args.ids, unit, &options)?;

    if let Some(out) = &args.out {
        println!("Save figure to {}", style(out.display()).cyan());
        render::write_file(&chart, out, &config.chart)?;
    }

    if !args.hide {
        terminal::show(&chart)?;
    }
    Ok(())
}

/// Fetch, transform and assemble a chart for `ids`.
pub(crate) fn build_chart(
    mode: RenderMode,
    source: &dyn CommitSource,
    ids: &[String],
    unit: TimeUnit,
    options: &TransformOptions,
) -> Result<Chart> {
    let dataset = source.get_commit_frequencies(ids, unit)?;
    let dataset = process(&dataset, options)?;
    info!(
        "Plotting {} series in {} mode (acc={}, norm={}, shift={})",
        dataset.len(),
        mode,
        options.accumulate,
        options.normalise,
        options.shift
    );
    let chart = Chart::assemble(mode, &dataset, &TurningPoints, commits_title(unit))?;
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::history::tests::create_test_repo;
    use crate::models::{Dataset, Keys, Series};
    use crate::render::AxisKind;
    use crate::transform::{DegeneratePolicy, TransformError};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    /// Serves canned series instead of reading repositories
    struct FakeSource {
        series: Vec<Series>,
    }

    impl CommitSource for FakeSource {
        fn get_commit_frequencies(&self, ids: &[String], unit: TimeUnit) -> Result<Dataset> {
            let series = ids
                .iter()
                .zip(&self.series)
                .map(|(id, s)| Series::new(id.clone(), s.x.clone(), s.y.clone()))
                .collect();
            Ok(Dataset::new(unit, series))
        }
    }

    fn days(n: u32) -> Keys {
        Keys::Dates(
            (1..=n)
                .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date"))
                .collect(),
        )
    }

    fn args(ids: Vec<String>, out: Option<PathBuf>) -> PlotArgs {
        PlotArgs {
            ids,
            timeunit: "day".to_string(),
            hide: true,
            out,
            shift: None,
            norm: false,
            acc: false,
        }
    }

    #[test]
    fn test_build_chart_applies_transforms() -> Result<()> {
        let source = FakeSource {
            series: vec![Series::new("", days(4), vec![1.0, 0.0, 2.0, 1.0])],
        };
        let options = TransformOptions {
            accumulate: true,
            normalise: true,
            shift: ShiftDirection::Left,
            ..Default::default()
        };
        let chart = build_chart(
            RenderMode::Line,
            &source,
            &["repo".to_string()],
            TimeUnit::Day,
            &options,
        )?;

        assert_eq!(chart.title, "Number of commits over time (days)");
        assert_eq!(chart.axis, AxisKind::Offsets);
        let ys: Vec<f64> = chart.series[0].points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![0.0, 0.0, 2.0 / 3.0, 1.0]);
        assert_eq!(chart.series[0].label, "repo");
        Ok(())
    }

    #[test]
    fn test_build_chart_shape_error_aborts() {
        let source = FakeSource {
            series: vec![Series::new("", days(3), vec![1.0, 2.0])],
        };
        let err = build_chart(
            RenderMode::Peak,
            &source,
            &["bad".to_string()],
            TimeUnit::Day,
            &TransformOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransformError>(),
            Some(TransformError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_constant_series_policy() {
        let source = FakeSource {
            series: vec![Series::new("", days(3), vec![2.0, 2.0, 2.0])],
        };
        let mut options = TransformOptions {
            normalise: true,
            ..Default::default()
        };
        let ids = ["flat".to_string()];
        let chart = build_chart(RenderMode::Line, &source, &ids, TimeUnit::Day, &options)
            .expect("zero policy");
        assert!(chart.series[0].points.iter().all(|p| p.y == 0.0));

        options.on_constant = DegeneratePolicy::Error;
        assert!(build_chart(RenderMode::Line, &source, &ids, TimeUnit::Day, &options).is_err());
    }

    #[test]
    fn test_run_writes_output_file() -> Result<()> {
        let repo = create_test_repo(&[1_700_000_000, 1_700_100_000, 1_700_400_000])?;
        let out_dir = tempfile::tempdir()?;
        let config = out_dir.path().join("commitplot.toml");
        std::fs::write(&config, "[chart]\nwidth = 400\n")?;
        let out = out_dir.path().join("chart.svg");

        let ids = vec![repo.path().to_string_lossy().to_string()];
        run(RenderMode::Peak, &args(ids, Some(out.clone())), Some(&config))?;

        let svg = std::fs::read_to_string(&out)?;
        assert!(svg.contains(r#"width="400""#));
        assert!(svg.contains("Number of commits over time (days)"));
        Ok(())
    }

    #[test]
    fn test_run_rejects_bad_extension_before_fetch() {
        // The id does not exist; the extension error must come first
        let out = PathBuf::from("chart.png");
        let err = run(
            RenderMode::Line,
            &args(vec!["/nonexistent/repo".to_string()], Some(out)),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unsupported output format"));
    }

    #[test]
    fn test_run_rejects_bad_timeunit() {
        let mut bad = args(vec![".".to_string()], None);
        bad.timeunit = "fortnight".to_string();
        let err = run(RenderMode::Line, &bad, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransformError>(),
            Some(TransformError::InvalidConfiguration(_))
        ));
    }
}
