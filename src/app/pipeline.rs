//! Shared analysis pipeline used by both the `analyze` and `summary` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV filter -> empty-window check -> threshold statistics
//!
//! The command handlers can then focus on presentation (tables vs summary).

use crate::analysis::compute_threshold;
use crate::domain::{AnalyzeConfig, ThresholdSummary};
use crate::error::AppError;
use crate::io::ingest::{self, FilteredData};

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: FilteredData,
    pub summary: ThresholdSummary,
}

/// Execute the full pipeline and return the computed outputs.
///
/// The filter itself treats an empty result as valid; here, at the
/// application layer, "no readings in the window" aborts the run (exit
/// code 3) because there is nothing to compute a threshold from.
pub fn run_analysis(config: &AnalyzeConfig) -> Result<RunOutput, AppError> {
    let ingest = ingest::filter_csv_file(&config.csv_path, &config.window)?;

    if ingest.readings.is_empty() {
        return Err(AppError::new(
            3,
            format!(
                "No readings fell inside the {} window in '{}'.",
                config.window.display_label(),
                config.csv_path.display()
            ),
        ));
    }

    let summary = compute_threshold(&ingest.readings);

    Ok(RunOutput { ingest, summary })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::domain::HourWindow;

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn config_for(csv_path: PathBuf) -> AnalyzeConfig {
        AnalyzeConfig {
            csv_path,
            window: HourWindow::OVERNIGHT,
            export_readings: None,
            export_summary: None,
        }
    }

    #[test]
    fn all_rows_outside_window_abort_with_exit_code_3() {
        let path = write_temp_csv(
            "dma_pipeline_outside_window.csv",
            "DateTime,Meter,C2Flow\n\
             02/01/2024 06:00,M1,1.0\n\
             02/01/2024 12:30,M1,2.0\n",
        );
        let err = run_analysis(&config_for(path.clone())).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("01:00-04:59"));
    }

    #[test]
    fn filter_and_calculator_compose_end_to_end() {
        let path = write_temp_csv(
            "dma_pipeline_end_to_end.csv",
            "DateTime,Meter,C2Flow\n\
             02/01/2024 02:15,M1,10.0\n\
             02/01/2024 03:00,M1,5.0\n\
             02/01/2024 06:00,M1,1.0\n\
             03/01/2024 01:30,M1,20.0\n",
        );
        let run = run_analysis(&config_for(path.clone())).unwrap();
        fs::remove_file(&path).ok();

        // The hour-6 row is filtered out; the rest flow into the calculator.
        assert_eq!(run.ingest.rows_read, 4);
        assert_eq!(run.ingest.rows_kept, 3);
        assert_eq!(run.summary.daily_minimums.len(), 2);
        assert_eq!(run.summary.daily_minimums[0].min_flow, 5.0);
        assert_eq!(run.summary.daily_minimums[1].min_flow, 20.0);
        assert_eq!(run.summary.mean_of_daily_minimums, 12.5);
        assert_eq!(run.summary.threshold, 16.25);
    }
}
