#[cfg(feature = "linux")]
pub mod linux;


#[cfg(feature = "windows")]
pub mod windows;

pub mod report;
pub mod simd;

use std::io;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};



/// One startup diagnostics report.
///
/// This struct holds everything the probe prints at launch: process
/// identity, SIMD capability flags, OS version, display extents, and the
/// invoking command line. It is populated exactly once by
/// [`SystemReport::collect`] and rendered by [`SystemReport::write_to`];
/// a query that failed is `None` and its line(s) are omitted from the
/// printout.
///
/// # Examples
///
/// ```no_run
/// use startup_probe::SystemReport;
///
/// let platform = startup_probe::platform();
/// let report = SystemReport::collect(&platform);
/// let _ = report.write_to(&mut std::io::stdout().lock());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SystemReport {
    /// Process id (the parent's id on POSIX targets)
    pub pid: i64,
    /// SIMD capability flags, evaluated once
    pub simd: SimdFeatures,
    /// Formatted OS version line, if the query succeeded
    pub os_version: Option<String>,
    /// Display extents, if the query succeeded
    pub display: Option<DisplayMetrics>,
    /// Invoking command line, reassembled as one string
    pub command_line: String,
}



/// CPU SIMD capability flags.
///
/// Write-once values: each flag reflects exactly one hardware query,
/// performed by [`SimdFeatures::detect`]. The SSE generation is ranked by
/// [`SimdFeatures::sse_tier`]; MMX and 3DNow are independent of that
/// ranking.
///
/// # Examples
///
/// ```
/// use startup_probe::SimdFeatures;
///
/// let simd = SimdFeatures {
///     sse: true,
///     sse2: true,
///     sse3: false,
///     mmx: true,
///     three_d_now: false,
/// };
/// assert_eq!(simd.sse_tier(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimdFeatures {
    /// SSE support
    pub sse: bool,
    /// SSE2 support
    pub sse2: bool,
    /// SSE3 support
    pub sse3: bool,
    /// MMX support
    pub mmx: bool,
    /// AMD 3DNow support
    pub three_d_now: bool,
}

/// Width and height of one display mode, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extent {
    /// Horizontal extent in pixels
    pub width: i32,
    /// Vertical extent in pixels
    pub height: i32,
}

/// Primary and aggregate display extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayMetrics {
    /// The primary display's desktop mode
    pub desktop: Extent,
    /// Per-component width/height sums across every attached display;
    /// not a bounding box of the monitor layout
    pub virtual_desktop: Extent,
}

/// Failure of a single platform query.
///
/// No variant is fatal. [`SystemReport::collect`] logs the error at debug
/// level and drops the affected output line(s); the probe never aborts or
/// exits non-zero because a query failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The windowing subsystem backing the query never came up.
    #[error("subsystem unavailable: {0}")]
    Subsystem(String),
    /// A display-mode or screen-metrics query failed.
    #[error("display query failed: {0}")]
    Display(String),
    /// The OS version descriptor could not be read.
    #[error("OS version query failed: {0}")]
    OsVersion(io::Error),
}

/// Capability provider for one target family.
///
/// Each platform module implements this trait once; the build selects the
/// implementation through the `linux` (default) and `windows` cargo
/// features, and [`platform()`] hands back the configured provider. Call
/// sites stay free of conditional compilation: [`SystemReport::collect`]
/// is the single consumer and is platform-agnostic.
pub trait Platform {
    /// Process id reported at startup.
    ///
    /// The POSIX provider reports the parent process id; the Windows
    /// provider reports the probe's own id.
    fn identity(&self) -> i64;

    /// One formatted OS version line, e.g. `OS version: 6.8.0-41-generic`.
    fn os_version(&self) -> Result<String, ProbeError>;

    /// Primary display extent and the per-component sums over all
    /// attached displays.
    fn display_metrics(&self) -> Result<DisplayMetrics, ProbeError>;

    /// The invocation, reassembled as a single string.
    fn command_line(&self) -> String;
}

/// Builds the capability provider configured at compile time.
#[cfg(feature = "linux")]
pub fn platform() -> linux::PosixPlatform {
    linux::PosixPlatform::new()
}

/// Builds the capability provider configured at compile time.
#[cfg(all(feature = "windows", not(feature = "linux")))]
pub fn platform() -> windows::WindowsPlatform {
    windows::WindowsPlatform::new()
}
