//! On-disk Collection Format
//!
//! A collection file is two JSON documents separated by a newline:
//!
//! ```text
//! {"format":"gfxstate","version":1,"key":{...},"variant_count":2,"state_count":3}
//! {"variants":[{"shader":"Lit","sub_shader":0,"pass":1,"keywords":["_FOG"],"states":["<base64>"]}]}
//! ```
//!
//! The header line carries the [`PlatformKey`], so the index can learn a
//! file's key by reading a single line instead of decoding the whole variant
//! table. State blobs are opaque and stored base64-encoded.

use std::io::{BufRead, Write};
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use gfxstate_core::errors::{GfxStateError, Result};
use gfxstate_core::{Collection, PassId, PlatformKey, StateRecord, VariantRecord};

pub const FORMAT_TAG: &str = "gfxstate";
pub const FORMAT_VERSION: u32 = 1;

/// File extension of collection files (without the dot).
pub const COLLECTION_EXTENSION: &str = "gfxstate";

/// First line of every collection file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionHeader {
    pub format: String,
    pub version: u32,
    pub key: PlatformKey,
    pub variant_count: usize,
    pub state_count: usize,
}

impl CollectionHeader {
    #[must_use]
    pub fn for_collection(collection: &Collection) -> Self {
        Self {
            format: FORMAT_TAG.to_string(),
            version: FORMAT_VERSION,
            key: collection.key().clone(),
            variant_count: collection.variant_count(),
            state_count: collection.total_state_count(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CollectionBody {
    variants: Vec<VariantDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VariantDto {
    shader: String,
    sub_shader: u32,
    pass: u32,
    keywords: Vec<String>,
    states: Vec<String>,
}

/// Serializes a collection (header line + body).
pub fn write_collection<W: Write>(mut writer: W, collection: &Collection) -> Result<()> {
    serde_json::to_writer(&mut writer, &CollectionHeader::for_collection(collection))?;
    writer.write_all(b"\n")?;

    let body = CollectionBody {
        variants: collection
            .entries()
            .map(|entry| {
                let variant = entry.variant();
                VariantDto {
                    shader: variant.shader.name().to_string(),
                    sub_shader: variant.pass.sub_shader_index,
                    pass: variant.pass.pass_index,
                    keywords: variant.keywords.iter().map(str::to_string).collect(),
                    states: entry
                        .states()
                        .iter()
                        .map(|s| STANDARD.encode(s.as_bytes()))
                        .collect(),
                }
            })
            .collect(),
    };
    serde_json::to_writer(&mut writer, &body)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads and validates only the header line.
pub fn read_header<R: BufRead>(reader: &mut R, path: &Path) -> Result<CollectionHeader> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(invalid(path, "file is empty"));
    }

    let header: CollectionHeader =
        serde_json::from_str(line.trim_end()).map_err(|e| invalid(path, &e.to_string()))?;
    if header.format != FORMAT_TAG {
        return Err(invalid(path, &format!("unknown format tag '{}'", header.format)));
    }
    if header.version != FORMAT_VERSION {
        return Err(GfxStateError::UnsupportedVersion {
            found: header.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(header)
}

/// Reads a complete collection.
pub fn read_collection<R: BufRead>(mut reader: R, path: &Path) -> Result<Collection> {
    let header = read_header(&mut reader, path)?;
    let body: CollectionBody =
        serde_json::from_reader(reader).map_err(|e| invalid(path, &e.to_string()))?;

    let mut collection = Collection::new(header.key);
    for dto in body.variants {
        let variant = VariantRecord::new(
            &dto.shader,
            PassId::new(dto.sub_shader, dto.pass),
            &dto.keywords,
        );
        collection.add_variant(variant.clone());
        for encoded in &dto.states {
            let bytes = STANDARD
                .decode(encoded)
                .map_err(|e| GfxStateError::StateDecodeError(format!("{}: {e}", path.display())))?;
            collection.add_state(&variant, StateRecord::from_bytes(bytes));
        }
    }

    if collection.variant_count() != header.variant_count
        || collection.total_state_count() != header.state_count
    {
        return Err(invalid(
            path,
            &format!(
                "header declares {} variants / {} states, body holds {} / {}",
                header.variant_count,
                header.state_count,
                collection.variant_count(),
                collection.total_state_count()
            ),
        ));
    }
    Ok(collection)
}

fn invalid(path: &Path, reason: &str) -> GfxStateError {
    GfxStateError::InvalidFormat {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfxstate_core::{GraphicsDeviceType, RuntimePlatform};
    use std::io::Cursor;

    fn sample() -> Collection {
        let mut c = Collection::new(PlatformKey::new(
            RuntimePlatform::OSXPlayer,
            GraphicsDeviceType::Metal,
            "Medium",
        ));
        let lit = VariantRecord::new("Lit", PassId::new(0, 1), ["_FOG", "_ALPHATEST"]);
        c.add_state(&lit, StateRecord::from_bytes(vec![0, 1, 2, 255]));
        c.add_state(&lit, StateRecord::from_bytes(vec![7]));
        c.add_variant(VariantRecord::new("Unlit", PassId::default(), Vec::<&str>::new()));
        c
    }

    #[test]
    fn test_write_then_read_preserves_content() {
        let original = sample();
        let mut buf = Vec::new();
        write_collection(&mut buf, &original).unwrap();

        let loaded = read_collection(Cursor::new(buf), Path::new("mem")).unwrap();
        assert_eq!(loaded.key(), original.key());
        assert_eq!(loaded.variant_count(), 2);
        assert_eq!(loaded.total_state_count(), 2);
        assert!(original.pairs().eq(loaded.pairs()));
    }

    #[test]
    fn test_header_only_read() {
        let mut buf = Vec::new();
        write_collection(&mut buf, &sample()).unwrap();

        let header = read_header(&mut Cursor::new(buf), Path::new("mem")).unwrap();
        assert_eq!(header.key.graphics_device_type, GraphicsDeviceType::Metal);
        assert_eq!(header.variant_count, 2);
        assert_eq!(header.state_count, 2);
    }

    #[test]
    fn test_rejects_foreign_files() {
        let err =
            read_header(&mut Cursor::new(b"not json\n".to_vec()), Path::new("x")).unwrap_err();
        assert!(matches!(err, GfxStateError::InvalidFormat { .. }));

        let err = read_header(&mut Cursor::new(Vec::new()), Path::new("x")).unwrap_err();
        assert!(matches!(err, GfxStateError::InvalidFormat { .. }));
    }

    #[test]
    fn test_rejects_future_version() {
        let line = r#"{"format":"gfxstate","version":9,"key":{"runtime_platform":"Android","graphics_device_type":"Vulkan","quality_level_name":"Low"},"variant_count":0,"state_count":0}"#;
        let err = read_header(&mut Cursor::new(format!("{line}\n").into_bytes()), Path::new("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            GfxStateError::UnsupportedVersion { found: 9, .. }
        ));
    }
}
