//! The YAML description of pitch spaces and tuning jobs.
//!
//! ```yaml
//! pitch-spaces:
//!   - name: pentatonic
//!     relations: ["9/8", "5/4", "3/2", "5/3", "2"]
//!     signatures:
//!       triad: [0, 2, 3]
//! tuning:
//!   pitch-space: pentatonic
//!   signature: triad
//!   degrees: 7
//!   weight-cutoff: 0.001
//!   weighting:
//!     kind: tenney-height
//!     curve: 1.5
//! ```

use std::{collections::BTreeMap, error::Error, fmt, fs, io, path::Path};

use serde_derive::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::{
    interval::Fraction,
    pitchspace::{PitchSpace, PitchSpaceErr, FULL_SIGNATURE},
    presets::PresetRegistry,
    scale::{Scale, ScaleErr},
    weighting::WeightingPolicy,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub pitch_spaces: Vec<PitchSpaceConfig>,
    #[serde(default)]
    pub tuning: Option<TuningConfig>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct PitchSpaceConfig {
    pub name: String,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub relations: Vec<Fraction>,
    #[serde(default)]
    pub signatures: BTreeMap<String, Vec<i64>>,
}

impl PitchSpaceConfig {
    pub fn realize(&self) -> Result<PitchSpace<Fraction>, ConfigErr> {
        let in_space = |source| ConfigErr::PitchSpace {
            name: self.name.clone(),
            source,
        };
        let mut space = PitchSpace::new(self.relations.clone()).map_err(in_space)?;
        for (name, degrees) in &self.signatures {
            space.add_signature(name.clone(), degrees).map_err(in_space)?;
        }
        Ok(space)
    }
}

fn default_signature() -> String {
    FULL_SIGNATURE.into()
}

fn default_weight_cutoff() -> f64 {
    0.0001
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct TuningConfig {
    pub pitch_space: String,
    #[serde(default = "default_signature")]
    pub signature: String,
    /// How many degrees of the (repeated) signature to tune.
    pub degrees: usize,
    #[serde(default)]
    pub root: usize,
    #[serde(default = "default_weight_cutoff")]
    pub weight_cutoff: f64,
    #[serde(default)]
    pub weighting: WeightingPolicy,
}

impl TuningConfig {
    /// The configured cutoff, forced into `[0, 1]`.
    pub fn weight_cutoff(&self) -> f64 {
        if self.weight_cutoff.is_nan() {
            return 0.0;
        }
        self.weight_cutoff.clamp(0.0, 1.0)
    }

    /// Build the [Scale] this job describes, with its dummy indices set.
    pub fn realize(&self, registry: &PresetRegistry) -> Result<Scale, ConfigErr> {
        let space = registry
            .get(&self.pitch_space)
            .ok_or_else(|| ConfigErr::UnknownPitchSpace(self.pitch_space.clone()))?;

        if space.get_signature(&self.signature).is_none() {
            return Err(ConfigErr::UnknownSignature {
                pitch_space: self.pitch_space.clone(),
                signature: self.signature.clone(),
            });
        }

        if self.degrees <= 1 {
            return Err(ConfigErr::TooFewDegrees(self.degrees));
        }

        let relations = space
            .make_ranged_scale_relations(&self.signature, self.degrees)
            .ok_or_else(|| ConfigErr::OutOfRange {
                pitch_space: self.pitch_space.clone(),
                degrees: self.degrees,
            })?;

        let mut scale = Scale::new(self.weighting.apply(&relations))?;
        scale.set_dummy_indices(space.get_dummy_indices(&self.signature, self.degrees));
        scale.set_name(format!("{}/{}", self.pitch_space, self.signature));
        Ok(scale)
    }
}

impl Config {
    pub fn from_yaml(s: &str) -> Result<Self, ConfigErr> {
        Ok(serde_yml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigErr> {
        let file = fs::File::open(path)?;
        Ok(serde_yml::from_reader(file)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigErr> {
        Ok(serde_yml::to_string(self)?)
    }

    /// The built-in presets, plus (and possibly overridden by) the configured pitch spaces.
    pub fn registry(&self) -> Result<PresetRegistry, ConfigErr> {
        let mut registry = PresetRegistry::with_builtin().map_err(|source| {
            ConfigErr::PitchSpace {
                name: "built-in".into(),
                source,
            }
        })?;
        for space in &self.pitch_spaces {
            if registry.insert(space.name.clone(), space.realize()?).is_some() {
                log::info!("configured pitch space '{}' replaces a preset", space.name);
            }
        }
        Ok(registry)
    }
}

#[derive(Debug)]
pub enum ConfigErr {
    Io(io::Error),
    Yaml(serde_yml::Error),
    PitchSpace {
        name: String,
        source: PitchSpaceErr,
    },
    UnknownPitchSpace(String),
    UnknownSignature {
        pitch_space: String,
        signature: String,
    },
    TooFewDegrees(usize),
    /// The exact relations between the outermost degrees are too big to represent.
    OutOfRange {
        pitch_space: String,
        degrees: usize,
    },
    Scale(ScaleErr),
}

impl fmt::Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::Io(_) => write!(f, "could not read configuration"),
            ConfigErr::Yaml(_) => write!(f, "could not parse configuration"),
            ConfigErr::PitchSpace { name, .. } => write!(f, "invalid pitch space '{name}'"),
            ConfigErr::UnknownPitchSpace(name) => write!(f, "unknown pitch space '{name}'"),
            ConfigErr::UnknownSignature {
                pitch_space,
                signature,
            } => write!(
                f,
                "pitch space '{pitch_space}' has no signature '{signature}'"
            ),
            ConfigErr::TooFewDegrees(n) => {
                write!(f, "a scale needs at least two degrees, got {n}")
            }
            ConfigErr::OutOfRange {
                pitch_space,
                degrees,
            } => write!(
                f,
                "{degrees} degrees of pitch space '{pitch_space}' span too wide a range"
            ),
            ConfigErr::Scale(_) => write!(f, "could not build scale"),
        }
    }
}

impl Error for ConfigErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigErr::Io(e) => Some(e),
            ConfigErr::Yaml(e) => Some(e),
            ConfigErr::PitchSpace { source, .. } => Some(source),
            ConfigErr::Scale(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_yml::Error> for ConfigErr {
    fn from(value: serde_yml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<ScaleErr> for ConfigErr {
    fn from(value: ScaleErr) -> Self {
        Self::Scale(value)
    }
}
