use crate::core::models::coordinates::{COMPONENTS_PER_RESIDUE, CoordinateClass};
use crate::core::quantization::QuantizationError;
use crate::core::quantization::spec::{OutOfRangePolicy, QuantizationSpec};
use serde::Deserialize;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing quantization spec for coordinate class: {0}")]
    MissingSpec(CoordinateClass),

    #[error("Invalid spec for coordinate class '{class}': {source}")]
    Spec {
        class: CoordinateClass,
        source: QuantizationError,
    },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// One quantization spec per coordinate class, immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorConfig {
    lengths: QuantizationSpec,
    angles: QuantizationSpec,
    dihedrals: QuantizationSpec,
}

impl CompressorConfig {
    pub fn builder() -> CompressorConfigBuilder {
        CompressorConfigBuilder::new()
    }

    /// Builds a config from a class-keyed mapping. Every class must be present.
    pub fn from_map(
        mut specs: HashMap<CoordinateClass, QuantizationSpec>,
    ) -> Result<Self, ConfigError> {
        let mut take = |class| specs.remove(&class).ok_or(ConfigError::MissingSpec(class));
        Ok(Self {
            lengths: take(CoordinateClass::Lengths)?,
            angles: take(CoordinateClass::Angles)?,
            dihedrals: take(CoordinateClass::Dihedrals)?,
        })
    }

    /// 96 bits per residue: 6-bit length and 12-bit angle deviations, 14-bit dihedrals.
    pub fn backbone_96() -> Self {
        Self {
            lengths: QuantizationSpec::preset(6, -0.2, 0.2, true),
            angles: QuantizationSpec::preset(12, -0.35, 0.35, true),
            dihedrals: QuantizationSpec::preset(14, -PI, PI, true),
        }
    }

    pub fn lengths(&self) -> &QuantizationSpec {
        &self.lengths
    }

    pub fn angles(&self) -> &QuantizationSpec {
        &self.angles
    }

    pub fn dihedrals(&self) -> &QuantizationSpec {
        &self.dihedrals
    }

    pub fn spec(&self, class: CoordinateClass) -> &QuantizationSpec {
        match class {
            CoordinateClass::Lengths => &self.lengths,
            CoordinateClass::Angles => &self.angles,
            CoordinateClass::Dihedrals => &self.dihedrals,
        }
    }

    /// Total code bits spent on one residue across all classes and components.
    pub fn bits_per_residue(&self) -> u32 {
        CoordinateClass::ALL
            .iter()
            .map(|&class| self.spec(class).bits() * COMPONENTS_PER_RESIDUE as u32)
            .sum()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Toml { source, .. } => ConfigError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: "<string>".to_string(),
            source: e,
        })?;

        let mut builder = Self::builder();
        for (class, entry) in [
            (CoordinateClass::Lengths, file.lengths),
            (CoordinateClass::Angles, file.angles),
            (CoordinateClass::Dihedrals, file.dihedrals),
        ] {
            if let Some(entry) = entry {
                let spec = entry
                    .into_spec()
                    .map_err(|source| ConfigError::Spec { class, source })?;
                builder = builder.spec(class, spec);
            }
        }
        builder.build()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    lengths: Option<SpecEntry>,
    angles: Option<SpecEntry>,
    dihedrals: Option<SpecEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpecEntry {
    bits: u32,
    min_val: f64,
    max_val: f64,
    #[serde(default)]
    signed: bool,
    #[serde(default)]
    out_of_range: OutOfRangePolicy,
}

impl SpecEntry {
    fn into_spec(self) -> Result<QuantizationSpec, QuantizationError> {
        QuantizationSpec::builder()
            .bits(self.bits)
            .range(self.min_val, self.max_val)
            .signed(self.signed)
            .out_of_range(self.out_of_range)
            .build()
    }
}

#[derive(Default)]
pub struct CompressorConfigBuilder {
    lengths: Option<QuantizationSpec>,
    angles: Option<QuantizationSpec>,
    dihedrals: Option<QuantizationSpec>,
}

impl CompressorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lengths(mut self, spec: QuantizationSpec) -> Self {
        self.lengths = Some(spec);
        self
    }
    pub fn angles(mut self, spec: QuantizationSpec) -> Self {
        self.angles = Some(spec);
        self
    }
    pub fn dihedrals(mut self, spec: QuantizationSpec) -> Self {
        self.dihedrals = Some(spec);
        self
    }
    pub fn spec(self, class: CoordinateClass, spec: QuantizationSpec) -> Self {
        match class {
            CoordinateClass::Lengths => self.lengths(spec),
            CoordinateClass::Angles => self.angles(spec),
            CoordinateClass::Dihedrals => self.dihedrals(spec),
        }
    }

    pub fn build(self) -> Result<CompressorConfig, ConfigError> {
        Ok(CompressorConfig {
            lengths: self
                .lengths
                .ok_or(ConfigError::MissingSpec(CoordinateClass::Lengths))?,
            angles: self
                .angles
                .ok_or(ConfigError::MissingSpec(CoordinateClass::Angles))?,
            dihedrals: self
                .dihedrals
                .ok_or(ConfigError::MissingSpec(CoordinateClass::Dihedrals))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn spec(bits: u32) -> QuantizationSpec {
        QuantizationSpec::new(bits, -1.0, 1.0, true).unwrap()
    }

    #[test]
    fn builder_succeeds_with_all_classes() {
        let config = CompressorConfig::builder()
            .lengths(spec(6))
            .angles(spec(12))
            .dihedrals(spec(14))
            .build()
            .unwrap();
        assert_eq!(config.lengths().bits(), 6);
        assert_eq!(config.spec(CoordinateClass::Angles).bits(), 12);
        assert_eq!(config.dihedrals().bits(), 14);
    }

    #[test]
    fn accessors_agree_with_class_lookup() {
        let config = CompressorConfig::backbone_96();
        assert_eq!(config.lengths(), config.spec(CoordinateClass::Lengths));
        assert_eq!(config.angles(), config.spec(CoordinateClass::Angles));
        assert_eq!(config.dihedrals(), config.spec(CoordinateClass::Dihedrals));
        assert_eq!(config.angles().bits(), 12);
    }

    #[test]
    fn builder_fails_when_a_class_is_missing() {
        let result = CompressorConfig::builder()
            .lengths(spec(6))
            .dihedrals(spec(14))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingSpec(CoordinateClass::Angles))
        ));
    }

    #[test]
    fn from_map_requires_every_class() {
        let mut specs = HashMap::new();
        specs.insert(CoordinateClass::Lengths, spec(6));
        specs.insert(CoordinateClass::Angles, spec(12));
        assert!(matches!(
            CompressorConfig::from_map(specs.clone()),
            Err(ConfigError::MissingSpec(CoordinateClass::Dihedrals))
        ));

        specs.insert(CoordinateClass::Dihedrals, spec(14));
        let config = CompressorConfig::from_map(specs).unwrap();
        assert_eq!(config.bits_per_residue(), 96);
    }

    #[test]
    fn backbone_96_preset_spends_96_bits_per_residue() {
        let config = CompressorConfig::backbone_96();
        assert_eq!(config.bits_per_residue(), 96);
        assert_eq!(config.dihedrals().min_val(), -PI);
        assert_eq!(config.dihedrals().max_val(), PI);
        assert!(config.lengths().signed());
    }

    #[test]
    fn loads_config_successfully_from_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("codec.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(
            file,
            r#"
            [lengths]
            bits = 6
            min_val = -0.2
            max_val = 0.2
            signed = true

            [angles]
            bits = 12
            min_val = -0.35
            max_val = 0.35
            signed = true
            out_of_range = "clamp"

            [dihedrals]
            bits = 14
            min_val = -3.1416
            max_val = 3.1416
            "#
        )
        .unwrap();

        let config = CompressorConfig::load(&file_path).unwrap();

        assert_eq!(config.lengths().bits(), 6);
        assert_eq!(config.lengths().out_of_range(), OutOfRangePolicy::Reject);
        assert_eq!(config.angles().out_of_range(), OutOfRangePolicy::Clamp);
        assert!(!config.dihedrals().signed());
        assert_eq!(config.bits_per_residue(), 96);
    }

    #[test]
    fn returns_missing_spec_error_for_incomplete_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "[lengths]\nbits = 6\nmin_val = -0.2\nmax_val = 0.2\n"
        )
        .unwrap();

        let result = CompressorConfig::load(file.path());

        assert!(matches!(
            result,
            Err(ConfigError::MissingSpec(CoordinateClass::Angles))
        ));
    }

    #[test]
    fn returns_spec_error_for_invalid_bits() {
        let content = r#"
[lengths]
bits = 0
min_val = -0.2
max_val = 0.2

[angles]
bits = 12
min_val = -0.35
max_val = 0.35

[dihedrals]
bits = 14
min_val = -3.2
max_val = 3.2
"#;
        let result = CompressorConfig::from_toml_str(content);

        assert!(matches!(
            result,
            Err(ConfigError::Spec {
                class: CoordinateClass::Lengths,
                source: QuantizationError::InvalidSpec { .. },
            })
        ));
    }

    #[test]
    fn returns_io_error_for_nonexistent_file() {
        let result = CompressorConfig::load(Path::new("nonexistent_codec_config.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn returns_toml_error_with_path_for_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "this is not valid toml").unwrap();

        let result = CompressorConfig::load(file.path());

        match result {
            Err(ConfigError::Toml { path, .. }) => {
                assert_eq!(path, file.path().to_string_lossy());
            }
            other => panic!("expected TOML error, got {:?}", other),
        }
    }

    #[test]
    fn returns_toml_error_for_unknown_fields() {
        let content = "[lengths]\nbits = 6\nmin_val = 0.0\nmax_val = 1.0\nprecision = 3\n";
        let result = CompressorConfig::from_toml_str(content);
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
    }
}
