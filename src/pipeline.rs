// THEORY:
// The `pipeline` module is the top-level API of the crate. A pipeline is an
// ordered list of interferences; applying it folds a frame through each stage in
// turn and returns the final frame. It is also the configuration boundary: a
// JSON list of `{"type": ..., "params": {...}}` records is parsed, every stage is
// validated, and only then does a pipeline exist. A pipeline serializes back to
// the same schema, so a configuration can be loaded, inspected and re-emitted.

use crate::core_modules::error::Result;
use crate::core_modules::frame::Frame;
use crate::core_modules::interference::{Interfere, Interference, InterferenceSpec};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

// Re-export key data structures for the public API.
pub use crate::core_modules::error::InterferenceError;

/// The serializable form of a pipeline.
///
/// Accepts either a bare JSON array of records or an object with a `stages`
/// array; always serializes as the object form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPipelineConfig")]
pub struct PipelineConfig {
    pub stages: Vec<InterferenceSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPipelineConfig {
    Stages(Vec<InterferenceSpec>),
    Wrapped { stages: Vec<InterferenceSpec> },
}

impl From<RawPipelineConfig> for PipelineConfig {
    fn from(raw: RawPipelineConfig) -> Self {
        match raw {
            RawPipelineConfig::Stages(stages) | RawPipelineConfig::Wrapped { stages } => {
                Self { stages }
            }
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// An ordered sequence of interferences applied one after another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterferencePipeline {
    stages: Vec<Interference>,
}

impl InterferencePipeline {
    pub fn new(stages: Vec<Interference>) -> Self {
        Self { stages }
    }

    /// Validates and builds every stage of `config`. The first invalid stage
    /// fails the whole pipeline.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let stages = config
            .stages
            .iter()
            .map(InterferenceSpec::build)
            .collect::<Result<Vec<_>>>()?;
        debug!("built interference pipeline with {} stages", stages.len());
        Ok(Self { stages })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_config(&PipelineConfig::from_json(json)?)
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            stages: self.stages.iter().map(Interference::spec).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        self.config().to_json()
    }

    /// Appends a stage, builder style.
    pub fn with(mut self, stage: impl Into<Interference>) -> Self {
        self.stages.push(stage.into());
        self
    }

    pub fn push(&mut self, stage: impl Into<Interference>) {
        self.stages.push(stage.into());
    }

    pub fn stages(&self) -> &[Interference] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Interfere for InterferencePipeline {
    /// Folds `frame` through every stage in order. An empty pipeline returns a copy.
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> Result<Frame> {
        let mut current = frame.clone();
        for (index, stage) in self.stages.iter().enumerate() {
            current = stage.interfere(&current, rng)?;
            debug!(
                "stage {index} ({}) -> {}x{}",
                stage.name(),
                current.width(),
                current.height()
            );
        }
        Ok(current)
    }
}
