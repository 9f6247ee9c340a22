use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info};

use tick_timer::{busy_wait_overruns, profile, Timer, TimerOptions};

const BUSY_WAIT_TICKS: u64 = 10_000;
const BUSY_WAIT_LOOPS: u64 = 100_000;
const SLEEP_TARGET: Duration = Duration::from_millis(250);

/// Sleep until an absolute deadline, re-sleeping on early wake.
fn sleep_until(deadline: Instant) {
    loop {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep(deadline - now);
    }
}

fn explicit_cycles(options: TimerOptions) {
    let stdout = std::io::stdout();

    let mut t1 = Timer::with_options("T1", stdout.lock(), options);
    let mut t2 = Timer::with_options("T2", stdout.lock(), options);
    let mut t3 = Timer::with_options("T3", stdout.lock(), options);

    t1.start("START-POINT-A").stop("STOP-POINT-A");

    t2.start("START-POINT-B");
    t2.stop("STOP-POINT-B");

    t3.start("START-POINT-C").stop_and_report("STOP-POINT-C");

    // t1 and t2 are reported on drop; t4 and t5 are stopped and reported on
    // drop, which also measures the scope teardown.
    let mut t4 = Timer::with_options("T4", stdout.lock(), options);
    t4.start("START-POINT-D");

    let mut t5 = Timer::with_options("T5", stdout.lock(), options);
    t5.start("");
}

fn captured_report(options: TimerOptions) -> Result<()> {
    let mut log = Vec::new();
    {
        let mut timer = Timer::with_options("SLEEP", &mut log, options);
        timer.start("START-POINT-A");
        sleep_until(Instant::now() + SLEEP_TARGET);
        timer.stop("STOP-POINT-A").report();

        debug!("\n{}", timer);
        info!(
            "slept {:?}: {} ticks, {} msec",
            SLEEP_TARGET, timer.stop_lapsed_ticks(), timer.stop_lapsed_millis()
        );

        let squares = profile!(timer, "SQUARES-START", "SQUARES-STOP", {
            (0..1_000u64).map(|i| i * i).sum::<u64>()
        });
        debug!("sum of squares {}", squares);

        timer.profile("SPIN-START", "SPIN-STOP", || std::hint::black_box(fib(24)));
    }

    let mut stdout = std::io::stdout();
    writeln!(stdout, "--------------").context("writing separator")?;
    stdout.write_all(&log).context("writing captured reports")?;
    writeln!(stdout, "--------------").context("writing separator")?;

    Ok(())
}

fn fib(n: u64) -> u64 {
    if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
}

fn misuse(options: TimerOptions) {
    let mut timer = Timer::with_options("MISUSE", std::io::stdout(), options);

    timer.report().stop("STOP-BEFORE-START").start("START-POINT");
    timer.start("DOUBLE-START");
    timer.stop_and_report("STOP-POINT");
    timer.report();
}

fn overruns(options: TimerOptions) {
    let mut timer = Timer::with_options("BUSY", std::io::sink(), options);
    let overruns = busy_wait_overruns(&mut timer, BUSY_WAIT_TICKS, BUSY_WAIT_LOOPS);

    println!(
        "overrun average: {} ticks over {} loops",
        overruns.average(), overruns.counted()
    );
}

fn main() -> Result<()> {
    env_logger::init();
    debug!("Logger initialized");

    let options = TimerOptions::from_env();
    debug!("Timer options: {:?}", options);

    explicit_cycles(options);
    captured_report(options)?;
    misuse(options);
    overruns(options);

    Ok(())
}
