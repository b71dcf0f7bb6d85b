//! Un codec por formato de artifact.
//!
//! Cada codec es independiente y cumple `decode(encode(x)) == x` para todo
//! valor que acepta. Un valor de forma incorrecta se rechaza con
//! `StoreError::Format`, nunca se convierte.
mod array;
mod binary;
mod json;
mod table;
mod yaml;

pub use array::ArrayCodec;
pub use binary::BinaryCodec;
pub use json::JsonCodec;
pub use table::TableCodec;
pub use yaml::YamlCodec;

use reco_core::{ArtifactFormat, ArtifactFormatError, ArtifactValue};

use crate::error::StoreError;

pub trait Codec: Send + Sync {
    fn format(&self) -> ArtifactFormat;
    fn encode(&self, value: &ArtifactValue) -> Result<Vec<u8>, StoreError>;
    fn decode(&self, bytes: &[u8]) -> Result<ArtifactValue, StoreError>;
}

pub fn codec_for(format: ArtifactFormat) -> &'static dyn Codec {
    match format {
        ArtifactFormat::Json => &JsonCodec,
        ArtifactFormat::Yaml => &YamlCodec,
        ArtifactFormat::Binary => &BinaryCodec,
        ArtifactFormat::Array => &ArrayCodec,
        ArtifactFormat::Table => &TableCodec,
    }
}

fn wrong_kind(format: ArtifactFormat, value: &ArtifactValue) -> StoreError {
    StoreError::Format(ArtifactFormatError { format,
                                             found: value.kind_name().to_string() })
}

/// Cabecera común de los formatos binarios propios: magic (4 bytes) + versión.
pub(crate) fn write_header(out: &mut Vec<u8>, magic: &[u8; 4], version: u8) {
    out.extend_from_slice(magic);
    out.push(version);
}

/// Valida la cabecera y devuelve el resto del payload.
pub(crate) fn read_header<'a>(bytes: &'a [u8], magic: &[u8; 4], version: u8) -> Result<&'a [u8], StoreError> {
    if bytes.len() < 5 || &bytes[..4] != magic {
        return Err(StoreError::Corrupt(format!("bad magic, expected {:?}", String::from_utf8_lossy(magic))));
    }
    if bytes[4] != version {
        return Err(StoreError::Corrupt(format!("unsupported version {}", bytes[4])));
    }
    Ok(&bytes[5..])
}
