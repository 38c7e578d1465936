//! End-to-end tests driving the binary over stdin.

use assert_cmd::Command;
use predicates::prelude::*;

const SAMPLE: &str = "\
goos: darwin
goarch: arm64
pkg: github.com/noot/ring-go
BenchmarkSign2_Decred-10          795     1550968 ns/op     5013 B/op      84 allocs/op
BenchmarkSign2_Ethereum-10       1934      620000 ns/op     3021 B/op      41 allocs/op
BenchmarkVerify2_Decred-10        900     1200000 ns/op     4000 B/op      60 allocs/op
BenchmarkVerify2_Ethereum-10     2400      480000 ns/op     2500 B/op      30 allocs/op
BenchmarkSign4_Decred-10          400     3100000 ns/op    10000 B/op     160 allocs/op
BenchmarkSign4_Ethereum-10        960     1250000 ns/op     6100 B/op      82 allocs/op
PASS
ok  \tgithub.com/noot/ring-go\t12.345s
";

fn bin() -> Command {
    Command::cargo_bin("ringsig-bench-report").unwrap()
}

#[test]
fn empty_input_fails_with_no_data_hint() {
    bin()
        .arg("stdin")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No benchmark data found"));
}

#[test]
fn log_only_input_fails_with_no_data_hint() {
    bin()
        .arg("stdin")
        .write_stdin("goos: linux\nPASS\nok\tpkg\t1.0s\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No benchmark data found"));
}

#[test]
fn compare_report_from_stdin() {
    bin()
        .arg("stdin")
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("SIGN PERFORMANCE")
                .and(predicate::str::contains("VERIFY PERFORMANCE"))
                .and(predicate::str::contains("60% faster"))
                .and(predicate::str::contains("1.6 ms")),
        );
}

#[test]
fn full_report_lists_all_backends() {
    bin()
        .args(["stdin", "--mode", "full"])
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Ring size 2:")
                .and(predicate::str::contains("Ring size 4:"))
                .and(predicate::str::contains("Decred"))
                .and(predicate::str::contains("Ethereum"))
                .and(predicate::str::contains("allocs/op")),
        );
}

#[test]
fn custom_baseline_and_candidate() {
    let input = "\
BenchmarkSign2_Secp256k1-10  100  800000 ns/op
BenchmarkSign2_Ed25519-10    100  400000 ns/op
";
    bin()
        .args(["stdin", "--baseline", "Secp256k1", "--candidate", "Ed25519"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("50% faster"));
}

#[test]
fn marker_lines_attribute_unlabeled_results() {
    let input = "\
# backend: Decred
BenchmarkSign2-10  795  1550968 ns/op
# backend: Ethereum
BenchmarkSign2-10  1934  620000 ns/op
";
    bin()
        .arg("stdin")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("60% faster"));
}

#[test]
fn missing_candidate_renders_na() {
    let input = "BenchmarkSign2_Decred-10  795  1550968 ns/op\n";
    bin()
        .arg("stdin")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("N/A"));
}
