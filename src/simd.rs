use crate::SimdFeatures;

// CPUID leaf 1 feature bits.
const LEAF1_EDX_MMX: u32 = 1 << 23;
const LEAF1_EDX_SSE: u32 = 1 << 25;
const LEAF1_EDX_SSE2: u32 = 1 << 26;
const LEAF1_ECX_SSE3: u32 = 1 << 0;
// Extended leaf 0x8000_0001 EDX bit.
const EXT1_EDX_3DNOW: u32 = 1 << 31;

impl SimdFeatures {
    /// Queries the hardware once and records each capability flag.
    ///
    /// Absence of a feature is a valid, silent outcome, never an error.
    /// On non-x86 targets every flag is false.
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            return Self::detect_cpuid();
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        {
            Self::default()
        }
    }

    /// Reads the SSE/MMX bits from CPUID leaf 1 and the 3DNow bit from
    /// extended leaf 0x8000_0001, guarded by the extended max-leaf probe.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    fn detect_cpuid() -> Self {
        #[cfg(target_arch = "x86")]
        use core::arch::x86::__cpuid;
        #[cfg(target_arch = "x86_64")]
        use core::arch::x86_64::__cpuid;

        unsafe {
            let leaf1 = __cpuid(1);

            let ext_max = __cpuid(0x8000_0000).eax;
            let ext1_edx = if ext_max >= 0x8000_0001 {
                __cpuid(0x8000_0001).edx
            } else {
                0
            };

            Self {
                sse: leaf1.edx & LEAF1_EDX_SSE != 0,
                sse2: leaf1.edx & LEAF1_EDX_SSE2 != 0,
                sse3: leaf1.ecx & LEAF1_ECX_SSE3 != 0,
                mmx: leaf1.edx & LEAF1_EDX_MMX != 0,
                three_d_now: ext1_edx & EXT1_EDX_3DNOW != 0,
            }
        }
    }

    /// Highest supported SSE generation.
    ///
    /// SSE3 wins over every lower flag, then SSE2, then plain SSE;
    /// 0 means no SSE generation at all. MMX and 3DNow do not enter
    /// the ranking.
    pub fn sse_tier(&self) -> u8 {
        if self.sse3 {
            3
        } else if self.sse2 {
            2
        } else if self.sse {
            1
        } else {
            0
        }
    }
}
