use crate::error::ExperimentError;
use crate::metrics::SimulationResult;

pub(crate) fn export_to_json_impl(
    results: &[SimulationResult],
    file: std::fs::File,
) -> Result<(), ExperimentError> {
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), results)?;
    Ok(())
}
