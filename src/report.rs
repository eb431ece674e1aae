use std::io::{self, Write};

use tracing::debug;

use crate::{DisplayMetrics, Extent, Platform, SimdFeatures, SystemReport};

const SEPARATOR: &str = "-----------------------------------------------------------";

impl Extent {
    /// Sums widths and heights independently across display modes.
    ///
    /// The result is not a bounding box of the monitor layout: two
    /// side-by-side displays contribute both their heights to the total.
    ///
    /// # Examples
    ///
    /// ```
    /// use startup_probe::Extent;
    ///
    /// let total = Extent::component_sum([
    ///     Extent { width: 800, height: 600 },
    ///     Extent { width: 1024, height: 768 },
    /// ]);
    /// assert_eq!(total, Extent { width: 1824, height: 1368 });
    /// ```
    pub fn component_sum<I>(modes: I) -> Self
    where
        I: IntoIterator<Item = Extent>,
    {
        modes.into_iter().fold(
            Extent {
                width: 0,
                height: 0,
            },
            |total, mode| Extent {
                width: total.width + mode.width,
                height: total.height + mode.height,
            },
        )
    }
}

impl SystemReport {
    /// Collects one report from the given provider.
    ///
    /// Every fallible query is contained here: a failure is logged at
    /// debug level, the field stays `None`, and no other field is
    /// affected. Nothing in this function can abort the probe.
    pub fn collect<P: Platform>(platform: &P) -> Self {
        let os_version = match platform.os_version() {
            Ok(line) => Some(line),
            Err(error) => {
                debug!(%error, "OS version query failed");
                None
            }
        };

        let display = match platform.display_metrics() {
            Ok(metrics) => Some(metrics),
            Err(error) => {
                debug!(%error, "display metrics query failed");
                None
            }
        };

        Self {
            pid: platform.identity(),
            simd: SimdFeatures::detect(),
            os_version,
            display,
            command_line: platform.command_line(),
        }
    }

    /// Writes the report as its fixed line sequence.
    ///
    /// Line order is significant. A field that is `None` suppresses its
    /// own line(s) and nothing else: the OS version is one line, the
    /// display extents are two.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "PID: {}", self.pid)?;
        writeln!(
            out,
            "SIMD: SSE={} , 3DNow={} , MMX={}",
            self.simd.sse_tier(),
            u8::from(self.simd.three_d_now),
            u8::from(self.simd.mmx),
        )?;

        if let Some(os_version) = &self.os_version {
            writeln!(out, "{os_version}")?;
        }

        if let Some(display) = &self.display {
            writeln!(
                out,
                "Desktop resolution: {} x {}",
                display.desktop.width, display.desktop.height
            )?;
            writeln!(
                out,
                "Virtual desktop resolution: {} x {}",
                display.virtual_desktop.width, display.virtual_desktop.height
            )?;
        }

        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "Command line: {}", self.command_line)?;
        writeln!(out, "{SEPARATOR}")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProbeError;
    use pretty_assertions::assert_eq;

    fn sample_report() -> SystemReport {
        SystemReport {
            pid: 4242,
            simd: SimdFeatures {
                sse: true,
                sse2: true,
                sse3: false,
                mmx: true,
                three_d_now: false,
            },
            os_version: Some("OS version: 6.8.0-41-generic".to_string()),
            display: Some(DisplayMetrics {
                desktop: Extent {
                    width: 1920,
                    height: 1080,
                },
                virtual_desktop: Extent {
                    width: 3840,
                    height: 2160,
                },
            }),
            command_line: "probe--flagvalue".to_string(),
        }
    }

    fn render(report: &SystemReport) -> String {
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_the_fixed_line_sequence() {
        let expected = "PID: 4242\n\
                        SIMD: SSE=2 , 3DNow=0 , MMX=1\n\
                        OS version: 6.8.0-41-generic\n\
                        Desktop resolution: 1920 x 1080\n\
                        Virtual desktop resolution: 3840 x 2160\n\
                        -----------------------------------------------------------\n\
                        Command line: probe--flagvalue\n\
                        -----------------------------------------------------------\n";
        assert_eq!(render(&sample_report()), expected);
    }

    #[test]
    fn separator_is_fifty_nine_dashes() {
        assert_eq!(SEPARATOR.len(), 59);
        assert!(SEPARATOR.bytes().all(|b| b == b'-'));
    }

    #[test]
    fn missing_os_version_drops_only_its_line() {
        let mut report = sample_report();
        report.os_version = None;

        let rendered = render(&report);
        let with_os = render(&sample_report());

        assert!(!rendered.contains("OS version"));
        assert_eq!(rendered.lines().count(), with_os.lines().count() - 1);
        // Every other line survives unchanged and in order.
        let mut remaining = rendered.lines();
        for line in with_os.lines().filter(|l| !l.starts_with("OS version")) {
            assert_eq!(remaining.next(), Some(line));
        }
    }

    #[test]
    fn missing_display_drops_both_resolution_lines() {
        let mut report = sample_report();
        report.display = None;

        let rendered = render(&report);
        assert!(!rendered.contains("Desktop resolution"));
        assert!(!rendered.contains("Virtual desktop resolution"));
        assert_eq!(rendered.lines().count(), 6);
    }

    #[test]
    fn independent_sums_are_not_a_bounding_box() {
        let total = Extent::component_sum([
            Extent {
                width: 800,
                height: 600,
            },
            Extent {
                width: 1024,
                height: 768,
            },
        ]);
        assert_eq!(
            total,
            Extent {
                width: 1824,
                height: 1368,
            }
        );
    }

    #[test]
    fn no_displays_sum_to_zero() {
        assert_eq!(
            Extent::component_sum([]),
            Extent {
                width: 0,
                height: 0,
            }
        );
    }

    #[test]
    fn collect_contains_every_provider_failure() {
        struct FailingPlatform;

        impl Platform for FailingPlatform {
            fn identity(&self) -> i64 {
                7
            }

            fn os_version(&self) -> Result<String, ProbeError> {
                Err(ProbeError::Subsystem("down".to_string()))
            }

            fn display_metrics(&self) -> Result<DisplayMetrics, ProbeError> {
                Err(ProbeError::Display("down".to_string()))
            }

            fn command_line(&self) -> String {
                "probe".to_string()
            }
        }

        let report = SystemReport::collect(&FailingPlatform);
        assert_eq!(report.pid, 7);
        assert!(report.os_version.is_none());
        assert!(report.display.is_none());
        assert_eq!(report.command_line, "probe");

        // PID, SIMD, separator, command line, separator.
        assert_eq!(render(&report).lines().count(), 5);
    }
}
