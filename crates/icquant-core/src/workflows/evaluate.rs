use super::collaborators::{Aligner, CollaboratorError, Reconstructor, StructureSource};
use crate::core::models::backbone::ReconstructionMode;
use crate::engine::compressor::CoordinateCompressor;
use crate::engine::error::CompressionError;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Structure '{id}': {source}")]
    Collaborator {
        id: String,
        source: CollaboratorError,
    },

    #[error("Structure '{id}': {source}")]
    Compression {
        id: String,
        source: CompressionError,
    },

    #[error("Failed to write report to '{path}': {source}")]
    Report { path: String, source: csv::Error },
}

/// A structure to evaluate: identifier (usually a file path) and chain selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureTarget {
    pub id: String,
    pub chain: char,
}

impl StructureTarget {
    pub fn new(id: impl Into<String>, chain: char) -> Self {
        Self {
            id: id.into(),
            chain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureResult {
    pub id: String,
    pub chain: char,
    pub residue_count: usize,
    /// Backbone RMSD (Å) between the reference and the reconstruction after superposition.
    pub rmsd: f64,
}

/// Per-structure accuracy of one compressor configuration, in target order.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub bits_per_residue: u32,
    pub results: Vec<StructureResult>,
}

impl EvaluationReport {
    pub fn mean_rmsd(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let sum: f64 = self.results.iter().map(|r| r.rmsd).sum();
        Some(sum / self.results.len() as f64)
    }

    pub fn max_rmsd(&self) -> Option<f64> {
        self.results.iter().map(|r| r.rmsd).reduce(f64::max)
    }

    pub fn total_residues(&self) -> usize {
        self.results.iter().map(|r| r.residue_count).sum()
    }

    /// True when the mean RMSD is strictly below `threshold`. An empty report meets no target.
    pub fn meets_target(&self, threshold: f64) -> bool {
        self.mean_rmsd().is_some_and(|mean| mean < threshold)
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), EvaluationError> {
        let report_error = |source: csv::Error| EvaluationError::Report {
            path: path.to_string_lossy().to_string(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(report_error)?;
        for result in &self.results {
            writer.serialize(result).map_err(report_error)?;
        }
        writer.flush().map_err(|e| report_error(e.into()))
    }
}

/// Runs compress, decompress, reconstruct and superpose for a batch of reference structures.
///
/// The evaluator only measures. Reconstruction and alignment are delegated to the
/// collaborators it was built with.
pub struct RoundTripEvaluator<'a, S, R, A> {
    source: &'a S,
    reconstructor: &'a R,
    aligner: &'a A,
}

impl<'a, S, R, A> RoundTripEvaluator<'a, S, R, A>
where
    S: StructureSource + Sync,
    R: Reconstructor + Sync,
    A: Aligner + Sync,
{
    pub fn new(source: &'a S, reconstructor: &'a R, aligner: &'a A) -> Self {
        Self {
            source,
            reconstructor,
            aligner,
        }
    }

    #[instrument(skip_all, name = "round_trip_evaluation")]
    pub fn evaluate<C: CoordinateCompressor + Sync>(
        &self,
        compressor: &C,
        targets: &[StructureTarget],
        reporter: &ProgressReporter,
    ) -> Result<EvaluationReport, EvaluationError> {
        let bits_per_residue = compressor.config().bits_per_residue();
        info!(
            structures = targets.len(),
            bits_per_residue, "Evaluating round-trip accuracy."
        );
        reporter.report(Progress::EvaluationStart {
            total_structures: targets.len() as u64,
        });

        #[cfg(not(feature = "parallel"))]
        let iterator = targets.iter();

        #[cfg(feature = "parallel")]
        let iterator = targets.par_iter();

        let results = iterator
            .map(|target| -> Result<StructureResult, EvaluationError> {
                reporter.report(Progress::StructureStart {
                    id: target.id.clone(),
                });
                let result = self.evaluate_structure(compressor, target)?;
                reporter.report(Progress::StructureFinish {
                    id: target.id.clone(),
                    rmsd: result.rmsd,
                });
                Ok(result)
            })
            .collect::<Result<Vec<_>, EvaluationError>>()?;

        let report = EvaluationReport {
            bits_per_residue,
            results,
        };
        if let Some(mean) = report.mean_rmsd() {
            reporter.report(Progress::Message(format!(
                "Mean backbone RMSD {:.4} Å at {} bits per residue",
                mean, bits_per_residue
            )));
        }
        reporter.report(Progress::EvaluationFinish);
        info!(
            mean_rmsd = report.mean_rmsd(),
            max_rmsd = report.max_rmsd(),
            "Round-trip evaluation complete."
        );
        Ok(report)
    }

    pub fn evaluate_structure<C: CoordinateCompressor>(
        &self,
        compressor: &C,
        target: &StructureTarget,
    ) -> Result<StructureResult, EvaluationError> {
        let collaborator_error = |source| EvaluationError::Collaborator {
            id: target.id.clone(),
            source,
        };

        let reference = self
            .source
            .load(&target.id, target.chain)
            .map_err(collaborator_error)?;
        let restored = compressor
            .round_trip(&reference.internal)
            .map_err(|source| EvaluationError::Compression {
                id: target.id.clone(),
                source,
            })?;
        let rebuilt = self
            .reconstructor
            .reconstruct(&restored, ReconstructionMode::Sequential)
            .map_err(collaborator_error)?;
        let rmsd = self
            .aligner
            .rmsd(rebuilt.atoms(), reference.backbone.atoms())
            .map_err(collaborator_error)?;

        let residue_count = reference.backbone.residue_count();
        debug!(id = %target.id, chain = %target.chain, residue_count, rmsd, "Structure evaluated.");

        Ok(StructureResult {
            id: target.id.clone(),
            chain: target.chain,
            residue_count,
            rmsd,
        })
    }
}
