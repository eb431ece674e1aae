use std::env;
use std::ffi::CStr;
use std::io;

use tracing::debug;

use crate::{DisplayMetrics, Extent, Platform, ProbeError};

/// POSIX capability provider.
///
/// Owns the SDL context and its video and audio subsystems for the
/// process lifetime; teardown happens on drop, on every exit path. A
/// subsystem that fails to come up is tolerated: the provider is still
/// constructed and the queries backed by the missing subsystem report
/// [`ProbeError::Subsystem`] instead.
pub struct PosixPlatform {
    _context: Option<sdl2::Sdl>,
    video: Option<sdl2::VideoSubsystem>,
    _audio: Option<sdl2::AudioSubsystem>,
}

#[cfg(feature = "linux")]
impl PosixPlatform {
    /// Brings up the video and audio subsystems.
    ///
    /// Audio is initialized alongside video although nothing queries it;
    /// both are released together when the provider drops.
    pub fn new() -> Self {
        let context = match sdl2::init() {
            Ok(context) => Some(context),
            Err(error) => {
                debug!(%error, "SDL init failed");
                None
            }
        };

        let video = context.as_ref().and_then(|sdl| match sdl.video() {
            Ok(video) => Some(video),
            Err(error) => {
                debug!(%error, "video subsystem unavailable");
                None
            }
        });

        let audio = context.as_ref().and_then(|sdl| match sdl.audio() {
            Ok(audio) => Some(audio),
            Err(error) => {
                debug!(%error, "audio subsystem unavailable");
                None
            }
        });

        Self {
            _context: context,
            video,
            _audio: audio,
        }
    }

    /// Reads the kernel release field from `uname`.
    fn kernel_release() -> Result<String, ProbeError> {
        let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
        if unsafe { libc::uname(&mut uts) } != 0 {
            return Err(ProbeError::OsVersion(io::Error::last_os_error()));
        }

        let release = unsafe { CStr::from_ptr(uts.release.as_ptr()) };
        Ok(release.to_string_lossy().into_owned())
    }
}

impl Default for PosixPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for PosixPlatform {
    fn identity(&self) -> i64 {
        // The parent's pid, not the probe's own.
        i64::from(unsafe { libc::getppid() })
    }

    fn os_version(&self) -> Result<String, ProbeError> {
        Ok(format!("OS version: {}", Self::kernel_release()?))
    }

    fn display_metrics(&self) -> Result<DisplayMetrics, ProbeError> {
        let video = self.video.as_ref().ok_or_else(|| {
            ProbeError::Subsystem("video subsystem not initialized".to_string())
        })?;

        let primary = video
            .desktop_display_mode(0)
            .map_err(|error| ProbeError::Display(error.to_string()))?;

        let displays = video
            .num_video_displays()
            .map_err(|error| ProbeError::Display(error.to_string()))?;

        let modes = (0..displays).filter_map(|index| match video.desktop_display_mode(index) {
            Ok(mode) => Some(Extent {
                width: mode.w,
                height: mode.h,
            }),
            Err(error) => {
                debug!(display = index, %error, "desktop display mode query failed");
                None
            }
        });

        Ok(DisplayMetrics {
            desktop: Extent {
                width: primary.w,
                height: primary.h,
            },
            virtual_desktop: Extent::component_sum(modes),
        })
    }

    fn command_line(&self) -> String {
        concat_args(env::args())
    }
}

/// Joins argument tokens into one line with no separator between them.
fn concat_args<I>(args: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut line = String::new();
    for arg in args {
        line.push_str(arg.as_ref());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn args_concatenate_without_separators() {
        assert_eq!(concat_args(["prog", "--flag", "value"]), "prog--flagvalue");
    }

    #[test]
    fn no_args_concatenate_to_an_empty_line() {
        assert_eq!(concat_args(Vec::<String>::new()), "");
    }

    #[test]
    fn kernel_release_carries_a_payload() {
        let release = PosixPlatform::kernel_release().unwrap();
        assert!(!release.is_empty());
    }
}
