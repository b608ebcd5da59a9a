//! Platform Keys
//!
//! A [`PlatformKey`] identifies the environment a collection was captured
//! for: the runtime platform, the graphics API and the quality level name.
//! Pipeline states are not portable across any of those three dimensions, so
//! every lookup and merge compares keys by exact equality.
//!
//! [`BuildTarget`] is the packaging-side counterpart used when stripping
//! collections from a build.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The platform an application is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuntimePlatform {
    WindowsEditor,
    WindowsPlayer,
    OSXEditor,
    OSXPlayer,
    LinuxEditor,
    LinuxPlayer,
    IPhonePlayer,
    Android,
    WebGLPlayer,
}

impl RuntimePlatform {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WindowsEditor => "WindowsEditor",
            Self::WindowsPlayer => "WindowsPlayer",
            Self::OSXEditor => "OSXEditor",
            Self::OSXPlayer => "OSXPlayer",
            Self::LinuxEditor => "LinuxEditor",
            Self::LinuxPlayer => "LinuxPlayer",
            Self::IPhonePlayer => "IPhonePlayer",
            Self::Android => "Android",
            Self::WebGLPlayer => "WebGLPlayer",
        }
    }
}

impl fmt::Display for RuntimePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The graphics API a collection was traced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphicsDeviceType {
    Direct3D11,
    Direct3D12,
    Vulkan,
    Metal,
    OpenGLES3,
    OpenGLCore,
    WebGPU,
    Null,
}

impl GraphicsDeviceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct3D11 => "Direct3D11",
            Self::Direct3D12 => "Direct3D12",
            Self::Vulkan => "Vulkan",
            Self::Metal => "Metal",
            Self::OpenGLES3 => "OpenGLES3",
            Self::OpenGLCore => "OpenGLCore",
            Self::WebGPU => "WebGPU",
            Self::Null => "Null",
        }
    }
}

impl fmt::Display for GraphicsDeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── PlatformKey ──────────────────────────────────────────────────────────────

/// Identity of the environment a collection belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformKey {
    pub runtime_platform: RuntimePlatform,
    pub graphics_device_type: GraphicsDeviceType,
    pub quality_level_name: String,
}

impl PlatformKey {
    #[must_use]
    pub fn new(
        runtime_platform: RuntimePlatform,
        graphics_device_type: GraphicsDeviceType,
        quality_level_name: impl Into<String>,
    ) -> Self {
        Self {
            runtime_platform,
            graphics_device_type,
            quality_level_name: quality_level_name.into(),
        }
    }

    /// Lists every attribute in which `other` differs from `self`.
    ///
    /// Empty when the keys are equal.
    #[must_use]
    pub fn mismatches(&self, other: &PlatformKey) -> Vec<KeyMismatch> {
        let mut out = Vec::new();
        if self.runtime_platform != other.runtime_platform {
            out.push(KeyMismatch {
                field: KeyField::RuntimePlatform,
                expected: self.runtime_platform.to_string(),
                found: other.runtime_platform.to_string(),
            });
        }
        if self.graphics_device_type != other.graphics_device_type {
            out.push(KeyMismatch {
                field: KeyField::GraphicsDeviceType,
                expected: self.graphics_device_type.to_string(),
                found: other.graphics_device_type.to_string(),
            });
        }
        if self.quality_level_name != other.quality_level_name {
            out.push(KeyMismatch {
                field: KeyField::QualityLevel,
                expected: self.quality_level_name.clone(),
                found: other.quality_level_name.clone(),
            });
        }
        out
    }

    /// Default file stem for a collection traced with this key,
    /// e.g. `GfxState_WindowsPlayer_Direct3D11_HighQuality`.
    #[must_use]
    pub fn default_collection_name(&self, prefix: &str) -> String {
        let quality: String = self
            .quality_level_name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        format!(
            "{prefix}_{}_{}_{quality}",
            self.runtime_platform, self.graphics_device_type
        )
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, \"{}\"}}",
            self.runtime_platform, self.graphics_device_type, self.quality_level_name
        )
    }
}

/// One attribute of a [`PlatformKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    RuntimePlatform,
    GraphicsDeviceType,
    QualityLevel,
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RuntimePlatform => "platform",
            Self::GraphicsDeviceType => "graphics API",
            Self::QualityLevel => "quality level",
        })
    }
}

/// A single differing attribute between two keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMismatch {
    pub field: KeyField,
    pub expected: String,
    pub found: String,
}

/// The attributes that differ between two platform keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMismatches(pub Vec<KeyMismatch>);

impl fmt::Display for KeyMismatches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mismatch) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{mismatch}")?;
        }
        Ok(())
    }
}

impl fmt::Display for KeyMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} != {}", self.field, self.found, self.expected)
    }
}

// ─── BuildTarget ──────────────────────────────────────────────────────────────

/// The platform a build is being packaged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildTarget {
    StandaloneWindows,
    StandaloneWindows64,
    StandaloneOSX,
    StandaloneLinux64,
    #[serde(rename = "iOS")]
    IOS,
    Android,
    WebGL,
}

impl BuildTarget {
    /// The only runtime platform whose collections ship with this target.
    ///
    /// Targets without a mapping ship no collections at all.
    #[must_use]
    pub const fn runtime_platform(self) -> Option<RuntimePlatform> {
        match self {
            Self::StandaloneWindows | Self::StandaloneWindows64 => {
                Some(RuntimePlatform::WindowsPlayer)
            }
            Self::StandaloneOSX => Some(RuntimePlatform::OSXPlayer),
            Self::IOS => Some(RuntimePlatform::IPhonePlayer),
            Self::Android => Some(RuntimePlatform::Android),
            Self::StandaloneLinux64 | Self::WebGL => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn matches(self, platform: RuntimePlatform) -> bool {
        self.runtime_platform() == Some(platform)
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StandaloneWindows => "StandaloneWindows",
            Self::StandaloneWindows64 => "StandaloneWindows64",
            Self::StandaloneOSX => "StandaloneOSX",
            Self::StandaloneLinux64 => "StandaloneLinux64",
            Self::IOS => "iOS",
            Self::Android => "Android",
            Self::WebGL => "WebGL",
        })
    }
}

impl FromStr for BuildTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standalonewindows" | "win" | "windows" => Ok(Self::StandaloneWindows),
            "standalonewindows64" | "win64" => Ok(Self::StandaloneWindows64),
            "standaloneosx" | "osx" | "macos" => Ok(Self::StandaloneOSX),
            "standalonelinux64" | "linux" | "linux64" => Ok(Self::StandaloneLinux64),
            "ios" => Ok(Self::IOS),
            "android" => Ok(Self::Android),
            "webgl" => Ok(Self::WebGL),
            other => Err(format!("unknown build target '{other}'")),
        }
    }
}
