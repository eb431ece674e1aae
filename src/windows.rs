use std::io;

use windows::Win32::System::Environment::GetCommandLineW;
use windows::Win32::System::SystemInformation::{GetVersionExW, OSVERSIONINFOW};
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXSCREEN, SM_CXVIRTUALSCREEN, SM_CYSCREEN, SM_CYVIRTUALSCREEN,
};

use crate::{DisplayMetrics, Extent, Platform, ProbeError};

/// Win32 capability provider.
///
/// Screen extents come straight from the system-metrics API, so no
/// windowing subsystem handle is acquired on this family.
pub struct WindowsPlatform;

#[cfg(feature = "windows")]
impl WindowsPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for WindowsPlatform {
    fn identity(&self) -> i64 {
        // The probe's own pid on this family.
        i64::from(unsafe { GetCurrentProcessId() })
    }

    fn os_version(&self) -> Result<String, ProbeError> {
        let mut info = OSVERSIONINFOW {
            dwOSVersionInfoSize: size_of::<OSVERSIONINFOW>() as u32,
            ..Default::default()
        };
        unsafe { GetVersionExW(&mut info) }
            .map_err(|error| ProbeError::OsVersion(io::Error::other(error)))?;

        let csd_len = info
            .szCSDVersion
            .iter()
            .position(|&unit| unit == 0)
            .unwrap_or(info.szCSDVersion.len());
        let csd = String::from_utf16_lossy(&info.szCSDVersion[..csd_len]);

        Ok(format!(
            "OS Version: {}.{}.{} {}",
            info.dwMajorVersion, info.dwMinorVersion, info.dwBuildNumber, csd
        ))
    }

    fn display_metrics(&self) -> Result<DisplayMetrics, ProbeError> {
        let width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
        let height = unsafe { GetSystemMetrics(SM_CYSCREEN) };
        if width == 0 || height == 0 {
            return Err(ProbeError::Display("screen metrics unavailable".to_string()));
        }

        Ok(DisplayMetrics {
            desktop: Extent { width, height },
            virtual_desktop: Extent {
                width: unsafe { GetSystemMetrics(SM_CXVIRTUALSCREEN) },
                height: unsafe { GetSystemMetrics(SM_CYVIRTUALSCREEN) },
            },
        })
    }

    fn command_line(&self) -> String {
        let raw = unsafe { GetCommandLineW() };
        String::from_utf16_lossy(unsafe { raw.as_wide() })
    }
}
