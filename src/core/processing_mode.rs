use std::fmt;
use std::str::FromStr;

/// Processing mode.
///
/// JSON-LD 1.1 features are available unless the processing mode is
/// [`ProcessingMode::JsonLd1_0`].
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessingMode {
	#[cfg_attr(feature = "serde", serde(rename = "json-ld-1.0"))]
	JsonLd1_0,

	#[default]
	#[cfg_attr(feature = "serde", serde(rename = "json-ld-1.1"))]
	JsonLd1_1,
}

impl ProcessingMode {
	#[inline(always)]
	pub fn as_str(&self) -> &'static str {
		match self {
			ProcessingMode::JsonLd1_0 => "json-ld-1.0",
			ProcessingMode::JsonLd1_1 => "json-ld-1.1",
		}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("unknown processing mode `{0}`")]
pub struct UnknownProcessingMode(pub String);

impl FromStr for ProcessingMode {
	type Err = UnknownProcessingMode;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		match name {
			"json-ld-1.0" => Ok(ProcessingMode::JsonLd1_0),
			"json-ld-1.1" => Ok(ProcessingMode::JsonLd1_1),
			_ => Err(UnknownProcessingMode(name.to_owned())),
		}
	}
}

impl fmt::Display for ProcessingMode {
	#[inline(always)]
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
