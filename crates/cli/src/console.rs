//! Terminal output. Everything the user reads goes through here.

#![allow(clippy::print_stdout)]

use recicla_client::{Notice, NoticeLevel, Notifier};

/// Prints notices as they are raised.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        println!("[{tag}] {}: {}", notice.title, notice.message);
    }
}

pub fn heading(text: &str) {
    println!("{text}");
    println!("{}", "-".repeat(text.chars().count()));
}

pub fn line(text: impl std::fmt::Display) {
    println!("{text}");
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{label:>14}: {value}");
}

pub fn blank() {
    println!();
}
