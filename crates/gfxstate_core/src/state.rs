//! Graphics State Records
//!
//! A [`StateRecord`] is one resolved pipeline configuration attached to a
//! shader variant. The record itself is an opaque blob: the host rendering
//! backend decides what goes in it. Equality is byte equality, accelerated by
//! an xxh3 fingerprint computed once at construction.
//!
//! [`GraphicsStateDesc`] is a structured description that callers without a
//! backend-specific encoding can use instead. It mirrors the fields relevant
//! for pipeline identity with hashable types (floats are stored as bit
//! patterns) and encodes deterministically into a record.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::errors::{GfxStateError, Result};

/// One concrete pipeline state snapshot.
#[derive(Clone)]
pub struct StateRecord {
    bytes: Arc<[u8]>,
    fingerprint: u64,
}

impl StateRecord {
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Arc<[u8]> = bytes.into().into();
        let fingerprint = xxh3_64(&bytes);
        Self { bytes, fingerprint }
    }

    /// Encodes a structured description into a record.
    pub fn from_desc(desc: &GraphicsStateDesc) -> Result<Self> {
        Ok(Self::from_bytes(serde_json::to_vec(desc)?))
    }

    /// Decodes a record written by [`StateRecord::from_desc`].
    pub fn to_desc(&self) -> Result<GraphicsStateDesc> {
        serde_json::from_slice(&self.bytes)
            .map_err(|e| GfxStateError::StateDecodeError(e.to_string()))
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for StateRecord {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint && self.bytes == other.bytes
    }
}

impl Eq for StateRecord {}

impl Hash for StateRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

impl fmt::Debug for StateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRecord")
            .field("len", &self.bytes.len())
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint))
            .finish()
    }
}

// ─── Structured Description ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendFactor {
    Zero,
    One,
    Src,
    OneMinusSrc,
    SrcAlpha,
    OneMinusSrcAlpha,
    Dst,
    OneMinusDst,
    DstAlpha,
    OneMinusDstAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendOperation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StencilOperation {
    Keep,
    Zero,
    Replace,
    Invert,
    IncrementClamp,
    DecrementClamp,
    IncrementWrap,
    DecrementWrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CullMode {
    Off,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrontFace {
    Ccw,
    Cw,
}

/// Render target formats that appear in traced states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgb10a2Unorm,
    Rg11b10Float,
    Rgba16Float,
    Rgba32Float,
    Depth16Unorm,
    Depth24PlusStencil8,
    Depth32Float,
    Depth32FloatStencil8,
}

bitflags! {
    /// Colour channels written by a render target.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ColorWrites: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const COLOR = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
        const ALL = Self::COLOR.bits() | Self::ALPHA.bits();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendComponentKey {
    pub src_factor: BlendFactor,
    pub dst_factor: BlendFactor,
    pub operation: BlendOperation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendStateKey {
    pub color: BlendComponentKey,
    pub alpha: BlendComponentKey,
}

impl BlendStateKey {
    /// Straight (non-premultiplied) alpha blending.
    pub const ALPHA_BLENDING: Self = Self {
        color: BlendComponentKey {
            src_factor: BlendFactor::SrcAlpha,
            dst_factor: BlendFactor::OneMinusSrcAlpha,
            operation: BlendOperation::Add,
        },
        alpha: BlendComponentKey {
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::OneMinusSrcAlpha,
            operation: BlendOperation::Add,
        },
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorTargetKey {
    pub format: TargetFormat,
    pub blend: Option<BlendStateKey>,
    pub write_mask: ColorWrites,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StencilFaceKey {
    pub compare: CompareFunction,
    pub fail_op: StencilOperation,
    pub depth_fail_op: StencilOperation,
    pub pass_op: StencilOperation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StencilStateKey {
    pub front: StencilFaceKey,
    pub back: StencilFaceKey,
    pub read_mask: u32,
    pub write_mask: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepthStencilKey {
    pub format: TargetFormat,
    pub depth_write_enabled: bool,
    pub depth_compare: CompareFunction,
    pub stencil: Option<StencilStateKey>,
}

/// Rasterizer state; float biases are kept as bit patterns so the key hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RasterStateKey {
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub depth_bias: i32,
    pub slope_scale_bits: u32,
    pub depth_clip: bool,
}

impl RasterStateKey {
    #[must_use]
    pub fn new(cull_mode: CullMode, depth_bias: i32, slope_scale: f32) -> Self {
        Self {
            cull_mode,
            front_face: FrontFace::Ccw,
            depth_bias,
            slope_scale_bits: slope_scale.to_bits(),
            depth_clip: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn slope_scale(&self) -> f32 {
        f32::from_bits(self.slope_scale_bits)
    }
}

impl Default for RasterStateKey {
    fn default() -> Self {
        Self::new(CullMode::Back, 0, 0.0)
    }
}

/// Full pipeline state description for one draw configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphicsStateDesc {
    pub topology: PrimitiveTopology,
    pub raster: RasterStateKey,
    pub color_targets: Vec<ColorTargetKey>,
    pub depth_stencil: Option<DepthStencilKey>,
    pub sample_count: u32,
}

impl Default for GraphicsStateDesc {
    fn default() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            raster: RasterStateKey::default(),
            color_targets: vec![ColorTargetKey {
                format: TargetFormat::Rgba8UnormSrgb,
                blend: None,
                write_mask: ColorWrites::ALL,
            }],
            depth_stencil: Some(DepthStencilKey {
                format: TargetFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: CompareFunction::LessEqual,
                stencil: None,
            }),
            sample_count: 1,
        }
    }
}
