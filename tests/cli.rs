//! End-to-end tests for the command-line surface.
//!
//! These exercise only paths that need no network: usage output, argument
//! validation, and failures that must occur before any probe is sent.

use assert_cmd::Command;
use predicates::prelude::*;

fn netmon() -> Command {
    Command::cargo_bin("netmon").expect("binary builds")
}

#[test]
fn no_subcommand_prints_usage_and_exits_zero() {
    netmon()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_all_subcommands() {
    netmon()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ping")
                .and(predicate::str::contains("dns"))
                .and(predicate::str::contains("scan"))
                .and(predicate::str::contains("traceroute")),
        );
}

#[test]
fn reversed_range_fails_before_any_attempt() {
    netmon()
        .args(["scan", "localhost", "-p", "100-1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid port range"));
}

#[test]
fn out_of_bounds_range_rejected() {
    netmon()
        .args(["scan", "localhost", "-p", "1-70000"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("out of valid range"));
}

#[test]
fn non_numeric_range_rejected() {
    netmon()
        .args(["scan", "localhost", "-p", "web-ports"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid port range"));
}

#[test]
fn zero_port_rejected() {
    netmon()
        .args(["scan", "localhost", "-p", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("out of valid range"));
}

#[test]
fn zero_ping_count_rejected_at_parse_time() {
    netmon()
        .args(["ping", "localhost", "-c", "0"])
        .assert()
        .failure();
}

#[test]
fn zero_scan_timeout_rejected_at_parse_time() {
    netmon()
        .args(["scan", "localhost", "-t", "0"])
        .assert()
        .failure();
}

#[test]
fn zero_max_hops_rejected_at_parse_time() {
    netmon()
        .args(["traceroute", "localhost", "-m", "0"])
        .assert()
        .failure();
}

#[test]
fn reverse_lookup_of_hostname_is_an_error() {
    netmon()
        .args(["dns", "definitely.not.an.ip", "--reverse"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to resolve"));
}

#[test]
fn trace_alias_is_accepted() {
    // Parse must succeed; resolution of the empty-ish host fails later.
    netmon()
        .args(["trace", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maximum number of hops"));
}
