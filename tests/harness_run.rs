use cpu_microbench::{BenchConfig, Harness, ManualClock, MonotonicClock, Stage};

fn config_in(dir: &tempfile::TempDir) -> BenchConfig {
    BenchConfig {
        image_path: dir.path().join("mandelbrot_test.ppm"),
        ..BenchConfig::default()
    }
}

#[test]
fn full_run_report_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let image_path = config.image_path.clone();

    // Frozen clock: every elapsed time is exactly zero
    let harness = Harness::new(config, ManualClock::new(0.0, 0.0));
    let mut out = Vec::new();
    let summary = harness.run(&mut out).unwrap();
    assert!(summary.all_succeeded());

    let expected = format!(
        "CPU micro-benchmark start\n\
         SIEVE_LIMIT=100000 MAT_SIZE=140 MAN=400x300\n\
         [1/3] Running sieve up to 100000 ...\n\
         Found 9592 primes up to 100000 (0.000 s)\n\
         [2/3] Matrix multiply 140x140 ...\n\
         Matrix multiply checksum (sample): 31993.274800\n\
         Matrix multiply took 0.000 s (measured 0.000 s)\n\
         [3/3] Generating Mandelbrot PPM (400x300) ...\n\
         Mandelbrot wrote {} (0.000 s)\n\
         All tasks done. Summary:\n \
         primes=9592, mat_time=0.000 s, mandelbrot_time=0.000 s\n",
        image_path.display()
    );
    assert_eq!(String::from_utf8(out).unwrap(), expected);

    let image = std::fs::read(&image_path).unwrap();
    assert_eq!(image.len(), "P6\n400 300\n255\n".len() + 400 * 300 * 3);
}

#[test]
fn stepping_clock_reports_stage_times() {
    let dir = tempfile::tempdir().unwrap();
    let config = BenchConfig {
        matrix_size: 8,
        image_width: 16,
        image_height: 12,
        ..config_in(&dir)
    };
    let harness = Harness::new(config, ManualClock::new(0.0, 1.0));
    let mut out = Vec::new();
    let summary = harness.run(&mut out).unwrap();

    // Sieve: two readings -> 1 s
    assert_eq!(summary.timings.sieve_secs, Some(1.0));
    // Matrix kernel times the multiply only: 1 s.
    // The stage bracket also spans the kernel's two readings: 3 s.
    assert_eq!(summary.matrix.as_ref().unwrap().elapsed_secs, 1.0);
    assert_eq!(summary.timings.matrix_stage_secs, Some(3.0));
    assert_eq!(summary.mandelbrot.as_ref().unwrap().elapsed_secs, 1.0);
    assert_eq!(summary.timings.mandelbrot_secs, Some(3.0));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Matrix multiply took 1.000 s (measured 3.000 s)"));
    assert!(text.ends_with(" primes=9592, mat_time=1.000 s, mandelbrot_time=3.000 s\n"));
}

#[test]
fn failing_stage_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let config = BenchConfig {
        matrix_size: 16,
        image_width: 8,
        image_height: 8,
        // The directory itself cannot be opened as an output file
        image_path: dir.path().to_path_buf(),
        ..BenchConfig::default()
    };
    let harness = Harness::new(config, MonotonicClock::new());
    let mut out = Vec::new();
    let summary = harness.run(&mut out).unwrap();

    assert_eq!(*summary.primes.as_ref().unwrap(), 9592);
    assert!(summary.matrix.as_ref().unwrap().elapsed_secs >= 0.0);
    assert!(summary.timings.sieve_secs.unwrap() >= 0.0);
    assert_eq!(summary.failed_stages(), vec![Stage::Mandelbrot]);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines[8].starts_with("Mandelbrot failed: "));
    assert!(lines[10].ends_with("mandelbrot_time=n/a"));
}
