use crate::models::error::SError;
use camino::Utf8Path;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

pub struct Json;

impl Json {
    /// Writes `data` as JSON indented by four spaces.
    pub fn write<T: Serialize>(path: &Utf8Path, data: &T) -> Result<(), SError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        data.serialize(&mut ser)?;
        std::fs::write(path, buf).map_err(|e| SError::IOError(format!("{path}: {e}")))
    }

    pub fn read<T: serde::de::DeserializeOwned>(path: &Utf8Path) -> Result<T, SError> {
        let s = std::fs::read_to_string(path).map_err(|e| SError::IOError(format!("{path}: {e}")))?;
        serde_json::from_str::<T>(s.trim_start_matches('\u{feff}'))
            .map_err(|e| SError::ParseError(format!("{path}: {e}")))
    }

    /// Reads `path`, falling back to `T::default()` when it is absent.
    pub fn read_or_default<T>(path: &Utf8Path) -> Result<T, SError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(T::default());
        }
        Self::read(path)
    }
}
