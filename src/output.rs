use owo_colors::OwoColorize;

use crate::engine::{RunReport, format_entry};

/// Consistent, colored user-facing messages. Colors only when stdout is a TTY.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {msg}");
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {msg}");
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {msg}");
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {msg}");
    }
}

/// A plain line without prefix, for output users may script against.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// Final succeeded/failed listing plus the totals line.
pub fn print_report(report: &RunReport) {
    if !is_tty() {
        print_user(&report.render());
        return;
    }
    println!("{}", "[---succeeded---]".green().bold());
    for entry in report.succeeded() {
        println!("{}", format_entry(entry));
    }
    println!("{}", "[---failed---]".red().bold());
    for entry in report.failed() {
        println!("{}", format_entry(entry).red());
    }
    if report.interrupted {
        print_warn("Interrupted; remaining paths were not processed");
    }
    if report.is_clean() {
        print_success(&report.summary_line());
    } else {
        print_warn(&report.summary_line());
    }
}
