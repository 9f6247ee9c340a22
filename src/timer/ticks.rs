//! Hardware cycle counter reads.
//!
//! | Target   | `read_ticks`   | `read_ticks_ordered`   |
//! |----------|----------------|------------------------|
//! | x86_64   | `rdtsc`        | `rdtscp`               |
//! | aarch64  | `cntvct_el0`   | `isb` + `cntvct_el0`   |
//! | other    | ns since anchor | ns since anchor       |
//!
//! Ticks are not a fixed time unit. They only make sense as a delta on the
//! same core.

/// Read the cycle counter.
#[inline]
pub fn read_ticks() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        // SAFETY: rdtsc has no preconditions on x86_64.
        unsafe { core::arch::x86_64::_rdtsc() }
    }

    #[cfg(target_arch = "aarch64")]
    {
        let ticks: u64;
        // SAFETY: cntvct_el0 is readable from EL0 on every supported OS.
        unsafe {
            core::arch::asm!("mrs {}, cntvct_el0", out(reg) ticks, options(nomem, nostack));
        }
        ticks
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        fallback::read()
    }
}

/// Read the cycle counter after all earlier instructions have retired.
///
/// Slower than [`read_ticks`], but it cannot be hoisted above the code being
/// measured.
#[inline]
pub fn read_ticks_ordered() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        let mut aux = 0u32;
        // SAFETY: rdtscp is available on every x86_64 CPU made since 2006.
        unsafe { core::arch::x86_64::__rdtscp(&mut aux) }
    }

    #[cfg(target_arch = "aarch64")]
    {
        let ticks: u64;
        // SAFETY: see read_ticks.
        unsafe {
            core::arch::asm!("isb", "mrs {}, cntvct_el0", out(reg) ticks, options(nostack));
        }
        ticks
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        fallback::read()
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
mod fallback {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ANCHOR: OnceLock<Instant> = OnceLock::new();

    pub fn read() -> u64 {
        let anchor = ANCHOR.get_or_init(Instant::now);
        anchor.elapsed().as_nanos() as u64
    }
}
