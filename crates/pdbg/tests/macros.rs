use std::fmt;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use pdbg::CallOptions;
use pdbg::Printer;
use pdbg::pd;
use pdbg::pdi;
use pdbg_macros::pdbg_test;

// The default debugger is shared by all tests in this file, so every test
// prints through its own printer and only selects runs per call site.

fn collecting_printer() -> (Printer, Arc<Mutex<Vec<String>>>) {
    let output = Arc::new(Mutex::new(Vec::new()));
    let collected = output.clone();
    (
        Printer::custom(move |text| collected.lock().push(text.to_string())),
        output,
    )
}

struct Greeter {
    name: String,
}

impl Greeter {
    fn hello(&self, printer: &Printer) -> usize {
        pd!(self.name.len(); CallOptions::new().printer(printer.clone()))
    }
}

#[pdbg_test]
fn test_pd_prints_location_expression_and_value() {
    let (printer, output) = collecting_printer();
    let greeter = Greeter {
        name: "world".to_string(),
    };

    assert_eq!(greeter.hello(&printer), 5);

    let output = output.lock();
    assert_eq!(output.len(), 1);
    let lines: Vec<&str> = output[0].lines().collect();
    assert!(lines[0].starts_with("[PD] "));
    assert!(lines[0].contains("macros.rs:"));
    assert!(lines[0].ends_with(" in Greeter::hello"));
    assert_eq!(lines[1], "   > self.name.len()");
    assert_eq!(lines[2], "  => 5");
}

#[pdbg_test]
fn test_pd_run_at_per_call_site() {
    let (printer, output) = collecting_printer();

    let values: Vec<u32> = (1..=5)
        .map(|value| pd!(value * 10; CallOptions::new().printer(printer.clone()).run_at([2, 4])))
        .collect();

    assert_eq!(values, vec![10, 20, 30, 40, 50]);
    let output = output.lock();
    assert_eq!(output.len(), 2);
    assert!(output[0].contains("(run:2)"));
    assert!(output[0].ends_with("=> 20"));
    assert!(output[1].contains("(run:4)"));
    assert!(output[1].ends_with("=> 40"));
}

#[pdbg_test]
fn test_pd_range_selector() {
    let (printer, output) = collecting_printer();

    for value in 0..6 {
        pd!(value; CallOptions::new().printer(printer.clone()).run_at(3..=4));
    }

    let output = output.lock();
    let values: Vec<&str> = output.iter().filter_map(|text| text.lines().last()).collect();
    assert_eq!(values, vec!["  => 2", "  => 3"]);
}

#[pdbg_test]
fn test_pdi_returns_print_out() {
    let point = (1, 2);
    let text = pdi!(point; CallOptions::new().announcer("[I]"));

    assert!(text.starts_with("[I] "));
    assert!(text.contains("   > point"));
    assert!(text.ends_with("  => (1, 2)"));
}

#[pdbg_test]
fn test_pdi_skipped_run_is_empty() {
    let texts: Vec<String> = (0..3).map(|value| pdi!(value; CallOptions::new().run_at(2))).collect();

    assert!(texts[0].is_empty());
    assert!(texts[1].ends_with("=> 1"));
    assert!(texts[2].is_empty());
}

#[pdbg_test]
fn test_pdi_options_and_multiline_value() {
    let text = pdi!(vec![1, 2]; CallOptions::new()
        .print_engine(pdbg::PrintEngine::PrettyDebug)
        .wrapper(true)
        .announcer("[V]"));

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "*".repeat(80));
    assert!(lines[1].starts_with("[V] "));
    assert_eq!(lines[2], "   > vec![1, 2]");
    assert_eq!(&lines[3..6], ["  => [", "         1,", "         2,"]);
    assert_eq!(lines.last().copied(), Some("*".repeat(80).as_str()));
}

#[pdbg_test]
fn test_pd_literal_skips_expression() {
    let text = pdi!("ready");
    assert!(!text.contains("   > "));
    assert!(text.ends_with("  => \"ready\""));
}

#[pdbg_test]
fn test_pd_multiple_values() {
    let (a, b) = pd!(1 + 1, "two");
    assert_eq!(a, 2);
    assert_eq!(b, "two");

    let (x, y) = (5, 2);
    let text = pdi!(x + 1, y);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "   > x + 1, y");
    assert_eq!(lines[2], "  => (6, 2)");
}

#[pdbg_test]
fn test_pdi_location_only() {
    let location = pdi!();
    assert!(location.contains("in test_pdi_location_only"));
    assert_eq!(location.lines().count(), 1);
}

#[pdbg_test]
fn test_two_calls_on_one_line() {
    let (first, second) = (pdi!(1 + 1), pdi!(2 * 3));
    assert!(first.contains("   > 1 + 1\n"));
    assert!(second.contains("   > 2 * 3\n"));
}

/// Prints a value itself while it is being printed.
struct Nested;

impl fmt::Debug for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = pdi!(40 + 2);
        write!(f, "Nested({})", inner.lines().count())
    }
}

#[pdbg_test]
fn test_value_may_use_pd_while_printed() {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let _ = sender.send(pdi!(Nested));
    });

    let text = receiver
        .recv_timeout(Duration::from_secs(10))
        .expect("A nested pdi! should not block");
    assert!(text.ends_with("  => Nested(3)"));
}

#[pdbg_test]
fn test_printer_may_use_pd() {
    let nested = Arc::new(Mutex::new(String::new()));
    let collected = nested.clone();
    let printer = Printer::custom(move |_| *collected.lock() = pdi!("from printer"));

    pd!(1; CallOptions::new().printer(printer));
    assert!(nested.lock().ends_with("  => \"from printer\""));
}
