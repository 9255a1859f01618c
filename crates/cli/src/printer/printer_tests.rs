use super::*;

fn sample_report() -> RunReport {
    let config = BatcherConfig::new(50, Duration::from_millis(10)).expect("valid config");
    let stats = BatcherStats {
        submitted: 1000,
        batches: 20,
        processed: 1000,
        failed: 3,
        size_triggered: 19,
        timer_triggered: 0,
        manual_triggered: 0,
        shutdown_triggered: 1,
    };
    RunReport::new("a fast job", &config, &stats, Duration::from_millis(12))
}

#[test]
fn report_copies_config_and_stats() {
    let r = sample_report();
    assert_eq!(r.batch_size, 50);
    assert_eq!(r.interval_ms, 10);
    assert_eq!(r.jobs, 1000);
    assert_eq!(r.batches, 20);
    assert!((r.mean_batch_len - 50.0).abs() < f64::EPSILON);
    assert!((r.elapsed_ms - 12.0).abs() < 1e-9);
}

#[test]
fn huge_interval_saturates_instead_of_wrapping() {
    let config = BatcherConfig {
        batch_size: 1,
        batch_interval: Duration::from_secs(u64::MAX),
    };
    let r = RunReport::new("idle", &config, &BatcherStats::default(), Duration::ZERO);
    assert_eq!(r.interval_ms, u64::MAX);
}

#[test]
fn human_printer_writes_header_and_row() {
    let mut buf = Vec::new();
    {
        let mut printer = HumanPrinter::new(&mut buf);
        printer.begin().expect("header");
        printer.print_report(&sample_report()).expect("row");
    }

    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("SCENARIO"));
    assert!(lines[2].starts_with("a fast job"));
    assert!(lines[2].contains("10ms"));
}

#[test]
fn json_printer_emits_one_object_per_line() {
    let mut buf = Vec::new();
    {
        let mut printer = JsonPrinter::new(&mut buf);
        printer.begin().expect("begin");
        printer.print_report(&sample_report()).expect("row");
        printer.print_report(&sample_report()).expect("row");
    }

    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    let value: serde_json::Value = serde_json::from_str(lines[0]).expect("valid json");
    assert_eq!(value["label"], "a fast job");
    assert_eq!(value["batch_size"], 50);
    assert_eq!(value["failed"], 3);
    assert_eq!(value["shutdown_triggered"], 1);
}
